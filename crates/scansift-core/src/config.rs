use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::decision::{DEFAULT_HIGH_THRESHOLD, DEFAULT_LOW_THRESHOLD};

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Folder holding the JPG and TIF subfolders.
    pub parent_folder: Option<PathBuf>,
    pub jpg_subdir: String,
    pub tif_subdir: String,
    pub low_threshold: f64,
    pub high_threshold: f64,
    /// Files decoded at once; 1 keeps the run strictly sequential.
    pub workers: usize,
    /// Glob patterns on file names treated as absent.
    pub ignore_patterns: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            parent_folder: None,
            jpg_subdir: "JPG".to_string(),
            tif_subdir: "TIF".to_string(),
            low_threshold: DEFAULT_LOW_THRESHOLD,
            high_threshold: DEFAULT_HIGH_THRESHOLD,
            workers: 1,
            ignore_patterns: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn jpg_dir(&self, parent: &Path) -> PathBuf {
        parent.join(&self.jpg_subdir)
    }

    pub fn tif_dir(&self, parent: &Path) -> PathBuf {
        parent.join(&self.tif_subdir)
    }
}

/// Load `Config.toml` (or `path`) if present, then `SCANSIFT_*` environment
/// variables on top.
pub fn load_configuration(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let file = match path {
        Some(path) => ConfigFile::from(path).required(true),
        None => ConfigFile::with_name("Config").required(false),
    };

    let builder = Config::builder()
        .add_source(file)
        .add_source(
            Environment::with_prefix("SCANSIFT")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("ignore_patterns"),
        )
        .build()?;
    builder.try_deserialize::<AppConfig>()
}
