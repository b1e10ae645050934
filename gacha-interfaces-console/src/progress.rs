use std::time::Duration;

use gacha_application::SessionPhase;
use indicatif::{ProgressBar, ProgressStyle};

use crate::options::DisplayOptions;

// The last entry is shown once the spinner finishes.
const TICK_STRINGS: [&str; 11] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", " "];

const SPINNER_TEMPLATE: &str = "{spinner:.cyan} {wide_msg}";
const PLAIN_SPINNER_TEMPLATE: &str = "{spinner} {wide_msg}";
const STEADY_TICK_MS: u64 = 80;

pub fn phase_message(phase: SessionPhase) -> &'static str {
    match phase {
        SessionPhase::LocateLog => "waiting for the game client",
        SessionPhase::ExtractCredentials => "open the in-game convene history",
        SessionPhase::FetchRecords => "fetching records",
    }
}

pub fn status_message(phase: SessionPhase, attempt: u32) -> String {
    if attempt > 0 {
        format!("{} (attempt {})", phase_message(phase), attempt)
    } else {
        phase_message(phase).to_string()
    }
}

pub fn spinner_style(options: &DisplayOptions) -> ProgressStyle {
    let template = if options.enable_color {
        SPINNER_TEMPLATE
    } else {
        PLAIN_SPINNER_TEMPLATE
    };
    ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&TICK_STRINGS)
}

/// Stderr spinner ticking on its own thread. Hidden when stderr is not a
/// terminal.
pub fn new_spinner(options: &DisplayOptions) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(spinner_style(options));
    pb.enable_steady_tick(Duration::from_millis(STEADY_TICK_MS));
    pb
}
