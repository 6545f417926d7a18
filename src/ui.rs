//! Terminal output for interactive sessions: a spinner while a turn runs,
//! styled output when it completes.
//!
//! Uses `indicatif` for the progress spinner and `console` for colors.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::controller::TurnOutput;

/// Visual indicator for one in-flight turn.
pub struct TurnProgress {
    pb: ProgressBar,
    cyan: Style,
    red: Style,
    dim: Style,
}

impl TurnProgress {
    /// Start the spinner for a turn.
    pub fn start() -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("invalid template"),
        );
        pb.set_message("crafting...");
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            cyan: Style::new().cyan().bold(),
            red: Style::new().red().bold(),
            dim: Style::new().dim(),
        }
    }

    /// Finish the spinner and print the turn output with its state banner.
    pub fn complete(&self, output: &TurnOutput) {
        self.pb.finish_and_clear();
        println!(
            "{} {}",
            self.cyan.apply_to("»"),
            self.dim.apply_to(&output.state_description)
        );
        println!("{}", output.visible_output);
    }

    /// Finish the spinner and print a failed turn.
    pub fn fail(&self, err: &dyn std::error::Error) {
        self.pb.finish_and_clear();
        eprintln!("{} turn failed: {err}", self.red.apply_to("✗"));
    }
}
