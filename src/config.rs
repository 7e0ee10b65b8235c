use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Database file name, shared with earlier desktop releases
pub const DATABASE_FILE_NAME: &str = "quest_db.sqlite";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FocusQuestConfig {
    pub database: Option<String>,
    #[serde(default)]
    pub timer: TimerConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    pub focus_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            focus_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
        }
    }
}

/// Longest mode length whose duration in seconds still fits a `u32`
pub const MAX_TIMER_MINUTES: u32 = u32::MAX / 60;

impl TimerConfig {
    /// Reject mode lengths of zero or too many minutes to count in seconds
    pub fn validate(&self) -> anyhow::Result<()> {
        for (key, minutes) in [
            ("focus_minutes", self.focus_minutes),
            ("short_break_minutes", self.short_break_minutes),
            ("long_break_minutes", self.long_break_minutes),
        ] {
            if minutes == 0 || minutes > MAX_TIMER_MINUTES {
                anyhow::bail!(
                    "timer.{} must be between 1 and {}, got {}",
                    key,
                    MAX_TIMER_MINUTES,
                    minutes
                );
            }
        }
        Ok(())
    }
}

impl FocusQuestConfig {
    /// Database path from the config, or the per-user default
    pub fn database_path(&self) -> PathBuf {
        self.database
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path)
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("focusquest.toml")
}

/// `<user data dir>/quest_db.sqlite`, falling back to the working directory
pub fn default_database_path() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| default_database_path_in(dirs.data_dir()))
        .unwrap_or_else(|| PathBuf::from(DATABASE_FILE_NAME))
}

pub fn default_database_path_in(base: &Path) -> PathBuf {
    base.join(DATABASE_FILE_NAME)
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<FocusQuestConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: FocusQuestConfig = toml::from_str(&contents)?;
    config.timer.validate()?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &FocusQuestConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config(Some(&dir.path().join("absent.toml"))).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_partial_timer_section_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("focusquest.toml");
        std::fs::write(&path, "database = \"quests.db\"\n\n[timer]\nfocus_minutes = 50\n").unwrap();

        let config = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(config.database_path(), PathBuf::from("quests.db"));
        assert_eq!(config.timer.focus_minutes, 50);
        assert_eq!(config.timer.short_break_minutes, 5);
        assert_eq!(config.timer.long_break_minutes, 15);
    }

    #[test]
    fn test_timer_minutes_out_of_range_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("focusquest.toml");

        std::fs::write(&path, "[timer]\nfocus_minutes = 100000000\n").unwrap();
        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("timer.focus_minutes"));

        std::fs::write(&path, "[timer]\nshort_break_minutes = 0\n").unwrap();
        assert!(load_config(Some(&path)).is_err());

        let largest = TimerConfig {
            long_break_minutes: MAX_TIMER_MINUTES,
            ..TimerConfig::default()
        };
        assert!(largest.validate().is_ok());
    }

    #[test]
    fn test_write_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("focusquest.toml");
        let config = FocusQuestConfig::default();

        write_config(&path, &config, false).unwrap();
        assert!(write_config(&path, &config, false).is_err());
        write_config(&path, &config, true).unwrap();

        let reloaded = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(reloaded.timer, TimerConfig::default());
        assert!(reloaded.database.is_none());
    }

    #[test]
    fn test_ensure_db_dir_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nested").join(DATABASE_FILE_NAME);
        ensure_db_dir(&db).unwrap();
        assert!(db.parent().unwrap().exists());
        assert_eq!(default_database_path_in(dir.path()), dir.path().join(DATABASE_FILE_NAME));
    }
}
