//! Chat mode UI components.

use std::path::Path;

use crate::ui::Style;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn print_header() {
    println!(
        "{} {} - Persona Chat",
        Style::header("banter"),
        Style::version(format!("v{VERSION}"))
    );
    println!();
}

/// Prints one bot turn, prefixed with the persona's name.
pub fn print_bot_turn(name: &str, text: &str) {
    println!("{} {text}", Style::speaker(format!("{name}:")));
    println!();
}

/// Prints one user turn when replaying a resumed conversation.
pub fn print_user_turn(text: &str) {
    println!("{} {text}", Style::label("You:"));
    println!();
}

pub fn print_resumed(stem: &str) {
    println!(
        "{} Loaded conversation {}",
        Style::success("✓"),
        Style::value(stem)
    );
    println!();
}

pub fn print_saved(path: &Path) {
    println!(
        "{} Conversation saved to {}",
        Style::success("✓"),
        Style::secondary(path.display())
    );
}

pub fn print_error(message: &str) {
    eprintln!("{} {message}", Style::error("Error:"));
    eprintln!();
}
