use owo_colors::Style;
use std::sync::OnceLock;

use crate::timer::TimerMode;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Styles for every kind of output line. Plain is all defaults.
#[derive(Debug, Clone, Default)]
pub struct Theme {
    pub header: Style,
    pub success: Style,
    pub error: Style,
    pub warn: Style,
    pub info: Style,
    pub dim: Style,
    pub muted: Style,
    pub done: Style,
    pub focus: Style,
    pub short_break: Style,
    pub long_break: Style,
}

impl Theme {
    pub fn detect() -> Self {
        if !console::Term::stdout().is_term() {
            return Self::plain();
        }
        Self::colored()
    }

    pub fn colored() -> Self {
        Self {
            header: Style::new().cyan().bold(),
            success: Style::new().green().bold(),
            error: Style::new().red().bold(),
            warn: Style::new().yellow().bold(),
            info: Style::new().magenta(),
            dim: Style::new().white().dimmed(),
            muted: Style::new().bright_black(),
            done: Style::new().bright_black().strikethrough(),
            focus: Style::new().truecolor(255, 153, 0).bold(),
            short_break: Style::new().truecolor(51, 153, 255).bold(),
            long_break: Style::new().truecolor(153, 51, 255).bold(),
        }
    }

    pub fn plain() -> Self {
        Self::default()
    }

    /// Accent used for a timer mode
    pub fn mode(&self, mode: TimerMode) -> Style {
        match mode {
            TimerMode::Focus => self.focus.clone(),
            TimerMode::ShortBreak => self.short_break.clone(),
            TimerMode::LongBreak => self.long_break.clone(),
        }
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}
