//! Message rendering for the line-based chat view.
//!
//! Rich output uses ANSI styling; `--plain` (or a non-terminal stdout)
//! drops to unstyled text suitable for piping.

use std::io::{self, IsTerminal, Write};

use ratatui::crossterm::style::Stylize;

/// Pulse symbols for the transient request indicator.
pub const THINKING_FRAMES: [&str; 3] = ["○", "◐", "●"];

pub struct Renderer {
    rich: bool,
}

impl Renderer {
    pub fn new(plain: bool) -> Self {
        Renderer {
            rich: !plain && io::stdout().is_terminal(),
        }
    }

    pub fn is_rich(&self) -> bool {
        self.rich
    }

    /// One-line session status, shown at startup and after model switches.
    pub fn status(&self, model: &str, status: &str) {
        let line = format!("Model: {model} | Status: {status}");
        if self.rich {
            println!("{}", line.cyan());
        } else {
            println!("{line}");
        }
    }

    pub fn user_message(&self, content: &str) {
        let stamp = timestamp();
        if self.rich {
            println!("[{stamp}] {}: {content}", "You".blue().bold());
        } else {
            println!("[{stamp}] You: {content}");
        }
    }

    pub fn assistant_message(&self, content: &str) {
        let stamp = timestamp();
        if self.rich {
            println!("[{stamp}] {}: {content}", "AI".cyan().bold());
        } else {
            println!("[{stamp}] AI: {content}");
        }
    }

    pub fn info(&self, text: &str) {
        println!("{text}");
    }

    /// Warnings and notices; yellow in rich mode.
    pub fn notice(&self, text: &str) {
        if self.rich {
            println!("{}", text.yellow().bold());
        } else {
            println!("{text}");
        }
    }

    pub fn error(&self, text: &str) {
        if self.rich {
            println!("{}", text.red().bold());
        } else {
            println!("{text}");
        }
    }

    /// Redraw the in-place request indicator. Only called in rich mode; the
    /// plain path stays silent while waiting, like any piped program would.
    pub fn thinking_frame(&self, tick: usize) {
        let symbol = THINKING_FRAMES[tick % THINKING_FRAMES.len()];
        print!("\r{} Thinking...", symbol.cyan());
        let _ = io::stdout().flush();
    }

    /// Erase the indicator line before printing the reply.
    pub fn clear_thinking(&self) {
        print!("\r               \r");
        let _ = io::stdout().flush();
    }
}

fn timestamp() -> String {
    chrono::Local::now().format("%H:%M").to_string()
}
