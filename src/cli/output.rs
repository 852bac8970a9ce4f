//! CLI output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::auth::{Role, Session};
use crate::dispatch::{Level, Notice, Notifier};

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Shows dispatcher notices on the terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            Level::Info => info(&notice.message),
            Level::Warning => warn(&notice.message),
            Level::Error => error(&notice.message),
        }
    }
}

/// Shorten a token for display
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}…{}", head, tail)
}

/// Print a table of the three role sessions
pub fn print_session_table(sessions: &[(Role, Session)]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Role").fg(Color::Cyan),
            Cell::new("Status").fg(Color::Cyan),
            Cell::new("Name").fg(Color::Cyan),
            Cell::new("Token").fg(Color::Cyan),
        ]);

    for (role, session) in sessions {
        let (status, color) = if session.is_authenticated() {
            ("logged in", Color::Green)
        } else {
            ("logged out", Color::Red)
        };

        table.add_row(vec![
            Cell::new(role.as_str()),
            Cell::new(status).fg(color),
            Cell::new(session.display_name().unwrap_or("-")),
            Cell::new(if session.is_authenticated() {
                mask_token(&session.token)
            } else {
                "-".to_string()
            }),
        ]);
    }

    println!("{table}");
}
