//! Terminal styling for CLI messages and rendered reports

use colored::Colorize;
use crossterm::style::Color;
use std::io::{self, IsTerminal, Write};

/// Print an error message to stderr
pub fn error(msg: &str) {
    eprintln!("{} {}", "error:".red().bold(), msg);
}

/// Print a warning message to stderr
pub fn warning(msg: &str) {
    eprintln!("{} {}", "warning:".yellow().bold(), msg);
}

pub fn success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

/// Print a hint message to stderr (dimmed)
pub fn hint(msg: &str) {
    eprintln!("{} {}", "hint:".dimmed(), msg.dimmed());
}

pub fn status(msg: &str) {
    println!("{} {}", "→".green(), msg);
}

pub fn path(p: &std::path::Path) -> String {
    p.display().to_string().bright_white().to_string()
}

/// Indented label-value pair for summaries
pub fn metric(label: &str, value: impl std::fmt::Display) -> String {
    format!("  {}: {}", label.dimmed(), value.to_string().green())
}

pub fn section(title: &str) {
    println!("\n{}", title.bold());
}

pub fn url(u: &str) -> String {
    u.bright_blue().underline().to_string()
}

/// Render markdown with termimad on a TTY, plain text otherwise.
pub fn render_markdown(markdown: &str, output: &mut dyn Write) -> io::Result<()> {
    if io::stdout().is_terminal() {
        write!(output, "{}", report_skin().term_text(markdown))
    } else {
        write!(output, "{}", markdown)
    }
}

fn report_skin() -> termimad::MadSkin {
    use termimad::{MadSkin, StyledChar};

    let mut skin = MadSkin::default();
    skin.set_headers_fg(Color::Green);
    skin.bold.set_fg(Color::White);
    skin.italic.set_fg(Color::DarkGrey);
    skin.inline_code.set_fg(Color::Yellow);
    skin.bullet = StyledChar::from_fg_char(Color::Green, '•');
    skin.horizontal_rule = StyledChar::from_fg_char(Color::DarkGrey, '─');
    skin
}
