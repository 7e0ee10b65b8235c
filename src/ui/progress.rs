use crate::timer::FocusTimer;
use crate::ui::{theme, Icons};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

/// Countdown bar for the focus timer.
///
/// Shows the remaining share of the session, draining toward zero.
pub struct TimerBar {
    pb: ProgressBar,
}

impl TimerBar {
    pub fn new(timer: &FocusTimer) -> Self {
        let pb = if console::Term::stdout().is_term() {
            ProgressBar::new(u64::from(timer.total_seconds()))
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) = ProgressStyle::with_template("{prefix} {bar:40} {msg}") {
            pb.set_style(style.progress_chars("█▉░"));
        }
        pb.set_prefix(format!(
            "{} {}",
            Icons::HOURGLASS,
            timer.mode().label().style(theme().mode(timer.mode()))
        ));
        let bar = Self { pb };
        bar.update(timer);
        bar
    }

    pub fn update(&self, timer: &FocusTimer) {
        self.pb.set_length(u64::from(timer.total_seconds()));
        self.pb.set_position(u64::from(timer.remaining_seconds()));
        self.pb.set_message(timer.display());
    }

    pub fn finish(&self, message: &str) {
        self.pb.finish_with_message(message.to_string());
    }

    pub fn abandon(&self) {
        self.pb.abandon();
    }
}
