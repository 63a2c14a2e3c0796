use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app_dirs::AppDirs;
use crate::persist::StoreError;
use crate::session::RoundSettings;

/// User-facing text. `{score}`, `{time}` and `{version}` are substituted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Messages {
    pub score: String,
    pub time_left: String,
    pub game_over: String,
    pub about_title: String,
    pub about_body: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            score: "Your score: {score}".to_string(),
            time_left: "Time left: {time}".to_string(),
            game_over: "Time's up! Your score was: {score}".to_string(),
            about_title: "Timefighter {version}".to_string(),
            about_body: "Tap the button as many times as you can before the clock runs out. \
                         The first tap starts the round."
                .to_string(),
        }
    }
}

impl Messages {
    pub fn score_text(&self, score: u32) -> String {
        self.score.replace("{score}", &score.to_string())
    }

    pub fn time_left_text(&self, secs: u32) -> String {
        self.time_left.replace("{time}", &secs.to_string())
    }

    pub fn game_over_text(&self, final_score: u32) -> String {
        self.game_over.replace("{score}", &final_score.to_string())
    }

    pub fn about_title_text(&self) -> String {
        self.about_title
            .replace("{version}", env!("CARGO_PKG_VERSION"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub round_secs: u32,
    pub tick_interval_ms: u64,
    pub messages: Messages,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            round_secs: 10,
            tick_interval_ms: 1000,
            messages: Messages::default(),
        }
    }
}

impl Config {
    pub fn round_settings(&self) -> RoundSettings {
        RoundSettings::new(
            self.round_secs,
            Duration::from_millis(self.tick_interval_ms.max(1)),
        )
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<(), StoreError>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "ignoring malformed config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("config.json"));
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        assert_eq!(cfg, store.load());
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("nope").join("config.json"));
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn malformed_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, b"{ not json").unwrap();
        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, br#"{ "round_secs": 60 }"#).unwrap();

        let cfg = FileConfigStore::with_path(&path).load();
        assert_eq!(cfg.round_secs, 60);
        assert_eq!(cfg.tick_interval_ms, 1000);
        assert_eq!(cfg.messages, Messages::default());
    }

    #[test]
    fn round_settings_from_config() {
        let cfg = Config {
            round_secs: 60,
            tick_interval_ms: 0,
            ..Config::default()
        };
        let settings = cfg.round_settings();
        assert_eq!(settings.initial_secs, 60);
        assert_eq!(settings.tick_interval, Duration::from_millis(1));
    }

    #[test]
    fn messages_substitute_placeholders() {
        let m = Messages::default();
        assert_eq!(m.score_text(3), "Your score: 3");
        assert_eq!(m.time_left_text(7), "Time left: 7");
        assert_eq!(m.game_over_text(12), "Time's up! Your score was: 12");
        assert!(m.about_title_text().contains(env!("CARGO_PKG_VERSION")));
    }
}
