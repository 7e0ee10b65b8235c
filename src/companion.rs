//! Companion stages - how a quest's companion looks at a given XP
//!
//! Every companion passes through four stages at fixed XP thresholds.
//! Stages are derived on demand and never persisted.

use crate::quest::CompanionType;
use serde::Serialize;

/// XP needed to reach each stage, lowest first.
pub const STAGE_THRESHOLDS: [u32; 4] = [0, 20, 50, 90];

const DRAGON_STAGES: [(&str, &str); 4] = [
    ("🥚", "Egg"),
    ("🐣", "Hatchling"),
    ("🐲", "Young"),
    ("🐉", "Ancient"),
];

const TREE_STAGES: [(&str, &str); 4] = [
    ("🌱", "Seed"),
    ("🌿", "Sapling"),
    ("🪴", "Tree"),
    ("🌳", "Elder Tree"),
];

/// Threshold of the stage after the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NextThreshold {
    At(u32),
    /// The companion is fully grown.
    Max,
}

/// A resolved companion stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stage {
    pub emoji: &'static str,
    pub label: &'static str,
    /// 1-based stage number
    pub index: usize,
    /// XP at which this stage starts
    pub threshold: u32,
    pub next: NextThreshold,
}

/// Progress bar contents for a companion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XpProgress {
    /// Fill ratio in `0.0..=1.0`
    pub fraction: f64,
    pub text: String,
}

/// Resolve the companion stage for `xp`.
///
/// Picks the highest threshold not above `xp`; defined for every `xp`.
pub fn resolve_stage(companion: CompanionType, xp: u32) -> Stage {
    let table = match companion {
        CompanionType::Dragon => &DRAGON_STAGES,
        CompanionType::Tree => &TREE_STAGES,
    };

    let position = STAGE_THRESHOLDS
        .iter()
        .rposition(|&threshold| xp >= threshold)
        .unwrap_or(0);

    let next = STAGE_THRESHOLDS
        .get(position + 1)
        .map_or(NextThreshold::Max, |&t| NextThreshold::At(t));

    let (emoji, label) = table[position];
    Stage {
        emoji,
        label,
        index: position + 1,
        threshold: STAGE_THRESHOLDS[position],
        next,
    }
}

impl Stage {
    pub fn is_max(&self) -> bool {
        self.next == NextThreshold::Max
    }

    /// Progress toward the next stage, saturated at the top stage
    pub fn progress(&self, xp: u32) -> XpProgress {
        match self.next {
            NextThreshold::Max => XpProgress {
                fraction: 1.0,
                text: "MAX LEVEL".to_string(),
            },
            NextThreshold::At(next) => XpProgress {
                fraction: (xp as f64 / next as f64).min(1.0),
                text: format!("{} / {} XP", xp, next),
            },
        }
    }

    pub fn status_line(&self, xp: u32) -> String {
        format!("{} (XP: {})", self.label, xp)
    }
}
