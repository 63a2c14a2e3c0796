use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn project() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "timefighter")
    }

    fn state_dir() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("timefighter")
        } else if let Some(pd) = Self::project() {
            pd.data_local_dir().to_path_buf()
        } else {
            PathBuf::from(".")
        }
    }

    pub fn config_path() -> PathBuf {
        match Self::project() {
            Some(pd) => pd.config_dir().join("config.json"),
            None => PathBuf::from("timefighter_config.json"),
        }
    }

    /// Where an interrupted round is parked until the next launch
    pub fn saved_round_path() -> PathBuf {
        Self::state_dir().join("saved_round.json")
    }

    pub fn log_path() -> PathBuf {
        Self::state_dir().join("timefighter.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_have_expected_names() {
        assert!(AppDirs::config_path().ends_with("config.json"));
        assert!(AppDirs::saved_round_path().ends_with("saved_round.json"));
        assert!(AppDirs::log_path().ends_with("timefighter.log"));
        assert_eq!(
            AppDirs::saved_round_path().parent(),
            AppDirs::log_path().parent()
        );
    }
}
