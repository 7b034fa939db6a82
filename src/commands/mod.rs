//! Slash-command parsing for the chat loop.
//!
//! Parsing is pure: no I/O and no state mutation. The session applies the
//! effects implied by the returned intent.

/// A parsed slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Exit the application.
    Quit,

    /// Show the built-in help text.
    Help,

    /// Print the catalog with the current model marked.
    ListModels,

    /// Switch models. `None` opens the interactive picker; `Some(name)`
    /// switches directly and reports a validation error inline.
    SwitchModel(Option<String>),

    /// Reset the transcript to a fresh system message.
    NewChat,

    /// A `/something` the dispatch table does not know.
    Unknown(String),

    /// A bare `/` with nothing after it.
    Empty,
}

/// Parses user input for slash commands.
///
/// Returns `Some(Command)` when the line starts with the command marker, or
/// `None` when it should be treated as a regular chat message.
pub fn parse_command(input: &str) -> Option<Command> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let mut parts = input[1..].trim().splitn(2, char::is_whitespace);
    let command = match parts.next() {
        Some(name) if !name.is_empty() => name.to_lowercase(),
        _ => return Some(Command::Empty),
    };
    let argument = parts
        .next()
        .map(|rest| rest.trim())
        .filter(|rest| !rest.is_empty())
        .map(str::to_string);

    let parsed = match command.as_str() {
        "quit" | "exit" => Command::Quit,
        "help" => Command::Help,
        "list" => Command::ListModels,
        "switch" | "model" => Command::SwitchModel(argument),
        "new" | "clear" => Command::NewChat,
        _ => Command::Unknown(command),
    };
    Some(parsed)
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /switch [name]   Switch models (no argument opens the picker)
  /model [name]    Same as /switch
  /list            List available free models
  /new, /clear     Start a new chat
  /help            Show this help message
  /quit, /exit     Exit the application"#
}
