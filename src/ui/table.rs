use chrono::Local;
use tabled::{settings::Style, Table, Tabled};

use crate::quest::{HistoryRecord, QuestSummary};

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Tabled)]
struct QuestRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "")]
    icon: &'static str,
    #[tabled(rename = "Quest")]
    name: String,
    #[tabled(rename = "XP")]
    xp: u32,
}

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "")]
    icon: &'static str,
    #[tabled(rename = "Quest")]
    name: String,
    #[tabled(rename = "Ended")]
    ended: String,
    #[tabled(rename = "Final XP")]
    final_xp: u32,
}

pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn stats_table(stats: &[(&str, &str)]) -> String {
    let mut builder = TableBuilder::new();
    for (label, value) in stats {
        builder.add_row(label, value);
    }
    builder.build()
}

pub fn quest_table(quests: &[QuestSummary]) -> String {
    let rows = quests.iter().map(|q| QuestRow {
        id: q.id,
        icon: q.companion_type.icon(),
        name: q.name.clone(),
        xp: q.xp,
    });
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn history_table(records: &[HistoryRecord]) -> String {
    let rows = records.iter().map(|h| HistoryRow {
        id: h.id,
        icon: h.status.icon(),
        name: h.name.clone(),
        ended: h.end_date.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
        final_xp: h.final_xp,
    });
    Table::new(rows).with(Style::rounded()).to_string()
}
