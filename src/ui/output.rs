use crate::companion::Stage;
use crate::quest::{HistoryRecord, Task};
use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

const XP_BAR_WIDTH: usize = 20;

pub fn header(text: &str) {
    println!("{} {}", Icons::SCROLL, text.style(theme().header.clone()));
}

pub fn status(icon: &str, label: &str, value: &str) {
    println!("{} {}: {}", icon, label.style(theme().dim.clone()), value);
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().success.clone()));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(theme().error.clone()));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(theme().warn.clone()));
}

pub fn info(label: &str, value: &str) {
    println!(
        "{} {}: {}",
        Icons::INFO.style(theme().info.clone()),
        label.style(theme().dim.clone()),
        value
    );
}

pub fn section(title: &str) {
    println!();
    println!("━{}━", title.style(theme().header.clone()));
}

pub fn muted(text: &str) -> String {
    text.style(theme().muted.clone()).to_string()
}

/// Text progress bar, e.g. `[██████░░░░] 30 / 50 XP`
pub fn xp_bar(stage: &Stage, xp: u32) -> String {
    let progress = stage.progress(xp);
    let filled = ((progress.fraction * XP_BAR_WIDTH as f64).round() as usize).min(XP_BAR_WIDTH);
    format!(
        "[{}{}] {}",
        "█".repeat(filled).style(theme().success.clone()),
        "░".repeat(XP_BAR_WIDTH - filled).style(theme().muted.clone()),
        progress.text
    )
}

/// Companion emoji, stage label and XP bar
pub fn companion(stage: &Stage, xp: u32) {
    println!();
    println!("   {}", stage.emoji);
    println!(
        "   {} {}",
        stage.status_line(xp).style(theme().header.clone()),
        muted(&format!("(stage {})", stage.index))
    );
    println!("   {}", xp_bar(stage, xp));
}

pub fn task_line(task: &Task) {
    let text = if task.is_done {
        task.text.style(theme().done.clone()).to_string()
    } else {
        task.text.clone()
    };
    println!("  {} {} {}", task.checkbox(), muted(&format!("#{}", task.id)), text);
}

pub fn history_summary(record: &HistoryRecord) {
    println!(
        "{} {} | Final XP: {}",
        record.status.icon(),
        record.status.as_str().to_uppercase().style(theme().header.clone()),
        record.final_xp
    );
}

pub fn timing(elapsed: &str) {
    println!("{} {}", Icons::CLOCK.style(theme().dim.clone()), elapsed);
}

pub fn summary_row(label: &str, value: &str) {
    println!("  {} {}", label.style(theme().dim.clone()), value);
}
