//! Charla is a terminal chat client for OpenRouter free-tier models.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns session state: the model catalog, the transcript,
//!   configuration, and command-intent application.
//! - [`commands`] implements the pure slash-command parser used by the chat
//!   loop.
//! - [`api`] defines the wire payloads and the OpenRouter gateway behind a
//!   trait seam.
//! - [`ui`] renders messages, runs the interactive read loop, and owns the
//!   full-terminal model-picker overlay.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;
