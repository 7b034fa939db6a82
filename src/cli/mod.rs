//! Command-line interface parsing and dispatch.

pub mod model_list;

use std::error::Error;

use clap::Parser;

use crate::cli::model_list::print_free_models;
use crate::core::config::Config;
use crate::ui::chat_loop::run_chat;

#[derive(Parser)]
#[command(name = "charla")]
#[command(version)]
#[command(about = "Chat with OpenRouter free-tier models from your terminal")]
#[command(
    long_about = "Charla is an interactive terminal chat client for OpenRouter's \
free-tier models. Messages are relayed to the chat-completions API and the \
reply is rendered inline; slash commands switch models and manage the \
session.\n\n\
Environment Variables:\n\
  OPENROUTER_API_KEY    Your OpenRouter API key (required for chat)\n\
  OPENROUTER_BASE_URL   Custom API base URL (optional)\n\n\
Commands:\n\
  /switch [name]        Switch models (no argument opens the picker)\n\
  /list                 List available free models\n\
  /new                  Start a new chat\n\
  /help                 Show all commands\n\
  /quit                 Exit"
)]
pub struct Args {
    /// Select the initial model
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Display all available free-tier models and exit
    #[arg(long)]
    pub list_models: bool,

    /// Disable rich formatting for minimal/plain output
    #[arg(long)]
    pub plain: bool,

    /// Override the request timeout in seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Provide the OpenRouter API key explicitly (overrides the environment)
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Force the full-screen model picker on
    #[arg(long, conflicts_with = "no_fullscreen")]
    pub fullscreen: bool,

    /// Disable the full-screen model picker
    #[arg(long)]
    pub no_fullscreen: bool,
}

impl Args {
    /// Three-way full-screen preference: forced on, forced off, or auto.
    pub fn fullscreen_preference(&self) -> Option<bool> {
        if self.fullscreen {
            Some(true)
        } else if self.no_fullscreen {
            Some(false)
        } else {
            None
        }
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let args = Args::parse();

    if args.list_models {
        let config = Config::for_listing(args.api_key, args.timeout);
        print_free_models(&config).await;
        return Ok(());
    }

    let config = Config::resolve(args.api_key.clone(), args.timeout)?;
    let fullscreen_preference = args.fullscreen_preference();
    run_chat(config, args.model, args.plain, fullscreen_preference).await
}

/// Diagnostics are opt-in: without RUST_LOG the REPL output stays clean.
fn init_tracing() {
    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_timeout_is_a_usage_error() {
        let result = Args::try_parse_from(["charla", "--timeout", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn positive_timeout_parses() {
        let args = Args::try_parse_from(["charla", "--timeout", "30"]).unwrap();
        assert_eq!(args.timeout, Some(30));
    }

    #[test]
    fn fullscreen_flags_are_mutually_exclusive() {
        assert!(Args::try_parse_from(["charla", "--fullscreen", "--no-fullscreen"]).is_err());
    }

    #[test]
    fn fullscreen_preference_is_three_way() {
        let auto = Args::try_parse_from(["charla"]).unwrap();
        assert_eq!(auto.fullscreen_preference(), None);

        let on = Args::try_parse_from(["charla", "--fullscreen"]).unwrap();
        assert_eq!(on.fullscreen_preference(), Some(true));

        let off = Args::try_parse_from(["charla", "--no-fullscreen"]).unwrap();
        assert_eq!(off.fullscreen_preference(), Some(false));
    }

    #[test]
    fn model_flag_takes_a_value() {
        let args = Args::try_parse_from(["charla", "-m", "Google/Gemma-2-9B"]).unwrap();
        assert_eq!(args.model.as_deref(), Some("Google/Gemma-2-9B"));
    }
}
