use std::path::PathBuf;

/// Environment variable that overrides the on-disk data directory.
pub const DATA_DIR_ENV: &str = "SGPA_DATA_DIR";

/// Default data directory, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = ".sgpa";

/// Where the durable records live and which keys they are stored under.
///
/// The key names match the layout used by the browser build, so a directory
/// exported from local storage (one `<key>.json` file per record) loads as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Directory holding one JSON file per record (file backend only)
    pub data_dir: PathBuf,

    /// Key of the subject catalog record
    pub subjects_key: String,

    /// Key of the result history record
    pub history_key: String,

    /// Key of the theme preference record
    pub theme_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            subjects_key: "subjects".to_string(),
            history_key: "grade_history".to_string(),
            theme_key: "theme".to_string(),
        }
    }
}

impl StorageConfig {
    /// Default keys, with `data_dir` taken from `SGPA_DATA_DIR` when set and non-empty.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            let dir = dir.trim();
            if !dir.is_empty() {
                config.data_dir = PathBuf::from(dir);
            }
        }
        config
    }

    /// Same keys, different directory.
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }
}
