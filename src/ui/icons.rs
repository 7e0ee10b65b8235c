pub struct Icons;

impl Icons {
    pub const SCROLL: &str = "📜";
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const WARN: &str = "⚠️";
    pub const INFO: &str = "ℹ️";
    pub const CLOCK: &str = "⏱️";
    pub const BELL: &str = "🔔";
    pub const ABACUS: &str = "🧮";
    pub const HOURGLASS: &str = "⏳";
}
