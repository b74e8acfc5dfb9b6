//! Terminal output helpers.

use std::fmt::Display;
use std::io::{self, Write as _};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

const BAR_CHAR: &str = "▎";

/// A spinner shown on stderr while waiting for the model. It's cleared when
/// dropped.
pub struct Spinner(ProgressBar);

impl Spinner {
    /// Starts a spinner with the given message.
    pub fn start(message: &str) -> Self {
        let style = ProgressStyle::with_template("{spinner} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
        let progress_bar = ProgressBar::new_spinner();
        progress_bar.set_style(style);
        progress_bar.set_message(message.to_owned());
        progress_bar.enable_steady_tick(Duration::from_millis(100));
        Self(progress_bar)
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.0.finish_and_clear();
    }
}

/// Prints a heading before a block of model output.
pub fn print_heading(heading: &str) {
    println!("\n{}{}\n", BAR_CHAR.bright_cyan(), heading.bold());
}

/// Prints a streamed token right away.
pub fn print_token(token: &str) {
    let mut stdout = io::stdout().lock();
    // Nothing sensible to do if the terminal is gone.
    let _ = stdout.write_all(token.as_bytes());
    let _ = stdout.flush();
}

/// Prints an informational line.
pub fn print_info(message: impl Display) {
    println!("\n{}{message}", BAR_CHAR.bright_cyan());
}

/// Prints a success line.
pub fn print_success(message: impl Display) {
    println!("\n{}✅ {message}", BAR_CHAR.bright_green());
}

/// Prints a warning line.
pub fn print_warning(message: impl Display) {
    println!("\n{}⚠️  {message}", BAR_CHAR.bright_yellow());
}

/// Prints an error to stderr.
pub fn print_error(message: impl Display) {
    eprintln!(
        "\n{}❌ {}",
        BAR_CHAR.bright_red(),
        message.to_string().bright_red()
    );
}
