use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while a completion request is in flight.
///
/// Clears itself on drop, so the bot's reply prints on a clean line even
/// when the request path returns early.
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    /// Starts the "Thinking..." spinner.
    #[allow(clippy::unwrap_used)]
    pub fn thinking() -> Self {
        let bar = ProgressBar::new_spinner();
        // unwrap is safe: template string is a compile-time constant
        bar.set_style(
            ProgressStyle::default_spinner()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
                .template("{spinner} {msg}")
                .unwrap(),
        );
        bar.set_message("Thinking...");
        bar.enable_steady_tick(Duration::from_millis(80));

        Self { bar }
    }

    /// Stops the spinner and clears it from the terminal.
    pub fn stop(&self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}
