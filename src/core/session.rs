//! Session state and command-intent application.
//!
//! The chat loop parses input into a [`Command`] and hands it here; this
//! module owns the catalog/transcript effects and tells the loop what to do
//! next. Keeping the effects out of the terminal code makes every command
//! path testable without a TTY.

use tracing::warn;

use crate::api::ChatGateway;
use crate::commands::{help_text, Command};
use crate::core::catalog::ModelCatalog;
use crate::core::transcript::Transcript;

/// What the chat loop should do after a command was applied.
pub enum CommandOutcome {
    /// Break out of the read loop.
    Exit,
    /// Print this text and keep looping.
    Reply(String),
    /// Run the interactive model picker (or its degraded fallback).
    OpenPicker,
}

pub struct ChatSession {
    pub catalog: ModelCatalog,
    pub transcript: Transcript,
}

impl ChatSession {
    pub fn new() -> Self {
        ChatSession {
            catalog: ModelCatalog::new(),
            transcript: Transcript::new(),
        }
    }

    /// Apply a parsed command and report the resulting action.
    pub fn apply(&mut self, command: Command) -> CommandOutcome {
        match command {
            Command::Quit => CommandOutcome::Exit,
            Command::Help => CommandOutcome::Reply(help_text().to_string()),
            Command::ListModels => CommandOutcome::Reply(self.model_listing()),
            Command::NewChat => {
                self.transcript.reset();
                CommandOutcome::Reply("Chat history cleared.".to_string())
            }
            Command::SwitchModel(None) => CommandOutcome::OpenPicker,
            Command::SwitchModel(Some(name)) => match self.catalog.set_model(&name) {
                Ok(()) => CommandOutcome::Reply(format!(
                    "Switched model to {}",
                    self.catalog.current()
                )),
                Err(err) => CommandOutcome::Reply(err.to_string()),
            },
            Command::Unknown(name) => {
                CommandOutcome::Reply(format!("Unknown command: /{name}. Type /help."))
            }
            Command::Empty => {
                CommandOutcome::Reply("Empty command. Type /help for options.".to_string())
            }
        }
    }

    /// Flat catalog listing with a marker on the current model. Used by
    /// `/list` and by the picker's non-interactive fallback.
    pub fn model_listing(&self) -> String {
        let mut listing = String::from("Available models:");
        for model in self.catalog.list() {
            let marker = if model == self.catalog.current() {
                "->"
            } else {
                "  "
            };
            listing.push_str(&format!("\n{marker} {model}"));
        }
        listing.push_str("\nUse /switch <name> to change models, or /switch to pick one.");
        listing
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Re-fetch the model catalogue and fold it into the catalog.
///
/// Never fails: a refresh that errors out or comes back empty leaves the
/// catalog as it was, so model switching keeps working offline. Returns the
/// user-visible notices the caller should print (or queue, at startup).
pub async fn refresh_catalog(gateway: &dyn ChatGateway, catalog: &mut ModelCatalog) -> Vec<String> {
    match gateway.list_models().await {
        Err(err) => {
            warn!(error = %err, "model catalogue refresh failed, keeping cached list");
            vec![format!(
                "Warning: Could not refresh the free model catalogue: {err}"
            )]
        }
        Ok(models) if models.is_empty() => {
            warn!("model catalogue refresh returned no free models");
            vec!["Warning: OpenRouter did not return any free models.".to_string()]
        }
        Ok(models) => {
            if catalog.replace(models) {
                vec![format!(
                    "Notice: Switched to {} (requested model unavailable).",
                    catalog.current()
                )]
            } else {
                Vec::new()
            }
        }
    }
}
