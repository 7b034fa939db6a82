//! The main read/route/act/render loop.
//!
//! One logical stream of control: either this loop is reading a line, the
//! picker overlay owns the terminal, or a gateway call is in flight behind
//! the thinking indicator. Nothing here runs concurrently with anything
//! else, so the session state needs no locking.

use std::error::Error;
use std::io::{self, IsTerminal};
use std::time::Duration;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::api::{ApiError, ChatGateway, OpenRouterClient};
use crate::commands::{parse_command, Command};
use crate::core::config::Config;
use crate::core::session::{refresh_catalog, ChatSession, CommandOutcome};
use crate::ui::overlay;
use crate::ui::render::Renderer;

pub async fn run_chat(
    config: Config,
    initial_model: Option<String>,
    plain: bool,
    fullscreen: Option<bool>,
) -> Result<(), Box<dyn Error>> {
    let client = OpenRouterClient::new(config)?;
    let renderer = Renderer::new(plain);
    let mut session = ChatSession::new();

    // An unknown --model is a configuration problem, fatal before the loop.
    if let Some(model) = initial_model {
        session.catalog.set_model(&model)?;
    }

    // The overlay needs a real terminal; --no-fullscreen forces the flat
    // listing, and --fullscreen cannot conjure a TTY that isn't there.
    let interactive = io::stdout().is_terminal();
    let overlay_enabled = fullscreen.unwrap_or(renderer.is_rich()) && interactive;

    let startup_notices = refresh_catalog(&client, &mut session.catalog).await;

    let mut editor = DefaultEditor::new()?;
    renderer.status(session.catalog.current(), "Ready");
    for notice in &startup_notices {
        renderer.notice(notice);
    }

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(&line);

                match parse_command(&line) {
                    Some(command) => {
                        let was_switch = matches!(command, Command::SwitchModel(_));
                        match session.apply(command) {
                            CommandOutcome::Exit => break,
                            CommandOutcome::Reply(text) => {
                                renderer.info(&text);
                                if was_switch {
                                    renderer.status(session.catalog.current(), "Ready");
                                }
                            }
                            CommandOutcome::OpenPicker => {
                                open_model_picker(&client, &mut session, &renderer, overlay_enabled)
                                    .await;
                                renderer.status(session.catalog.current(), "Ready");
                            }
                        }
                    }
                    None => exchange_message(&client, &mut session, &renderer, &line).await,
                }
            }
            Err(ReadlineError::Interrupted) => {
                renderer.notice("Input cancelled. Type /quit to exit.");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                renderer.error(&format!("Input error: {err}"));
                break;
            }
        }
    }

    Ok(())
}

/// Refresh the catalogue, then run the overlay (or its degraded fallback)
/// and commit a confirmed selection. A refresh failure only produces a
/// notice; the picker still opens on whatever catalog is in memory.
async fn open_model_picker(
    gateway: &dyn ChatGateway,
    session: &mut ChatSession,
    renderer: &Renderer,
    overlay_enabled: bool,
) {
    for notice in refresh_catalog(gateway, &mut session.catalog).await {
        renderer.notice(&notice);
    }

    if session.catalog.is_empty() {
        renderer.error("No models available to display.");
        return;
    }

    if !overlay_enabled {
        // Degraded mode: print the listing and treat it as a cancellation.
        renderer.info(&session.model_listing());
        return;
    }

    match overlay::pick_model(&session.catalog) {
        Ok(Some(model)) => {
            // The id came from the catalog's own view, but membership is
            // still enforced in exactly one place.
            if let Err(err) = session.catalog.set_model(&model) {
                renderer.error(&err.to_string());
            }
        }
        Ok(None) => {}
        Err(err) => renderer.error(&format!("Model picker error: {err}")),
    }
}

/// One chat turn: append + render the user line, await the reply behind the
/// indicator, then append + render it. On failure the user turn stays in the
/// transcript so a retry or rephrase keeps its context.
async fn exchange_message(
    gateway: &dyn ChatGateway,
    session: &mut ChatSession,
    renderer: &Renderer,
    content: &str,
) {
    session.transcript.push_user(content);
    renderer.user_message(content);

    match send_with_indicator(gateway, session, renderer).await {
        Ok(reply) => {
            session.transcript.push_assistant(reply.as_str());
            renderer.assistant_message(&reply);
        }
        Err(err) => renderer.error(&format!("Error: {err}")),
    }
}

async fn send_with_indicator(
    gateway: &dyn ChatGateway,
    session: &ChatSession,
    renderer: &Renderer,
) -> Result<String, ApiError> {
    let mut request = gateway.send_chat(session.transcript.to_wire(), session.catalog.current());

    if !renderer.is_rich() {
        return request.await;
    }

    let mut ticker = tokio::time::interval(Duration::from_millis(200));
    let mut tick = 0usize;
    let result = loop {
        tokio::select! {
            result = &mut request => break result,
            _ = ticker.tick() => {
                renderer.thinking_frame(tick);
                tick += 1;
            }
        }
    };
    renderer.clear_thinking();
    result
}
