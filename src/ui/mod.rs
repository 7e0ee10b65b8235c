pub mod icons;
pub mod output;
pub mod progress;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{
    companion, error, header, history_summary, info, muted, section, status, success,
    summary_row, task_line, timing, warn, xp_bar,
};
pub use progress::TimerBar;
pub use table::{history_table, quest_table, stats_table, TableBuilder};
pub use theme::{theme, Theme};
