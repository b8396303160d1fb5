use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::data::regency::DEFAULT_REGENCY_LIMIT;
use crate::data::series::DEFAULT_TOP_N;

/// Optional config file looked up in the working directory.
pub const CONFIG_FILE: &str = "dashboard.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parsing {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Startup settings. Every field has a default so a partial file is fine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Workbook with the three dashboard sheets.
    pub source_path: PathBuf,
    /// Bars shown in the ranked bar charts.
    pub top_n: usize,
    /// Rows shown in the regency drill-down.
    pub regency_limit: usize,
    /// Initial window `[width, height]`.
    pub window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from("data_python.xlsx"),
            top_n: DEFAULT_TOP_N,
            regency_limit: DEFAULT_REGENCY_LIMIT,
            window_size: [1280.0, 860.0],
        }
    }
}

impl DashboardConfig {
    /// Parse a config file. A missing file gives the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Config file (falling back to defaults on error) with the first CLI
    /// argument, if any, overriding `source_path`.
    pub fn from_env_args(mut args: impl Iterator<Item = String>) -> Self {
        let mut config = Self::from_file(Path::new(CONFIG_FILE)).unwrap_or_else(|e| {
            log::error!("Ignoring config: {e}");
            Self::default()
        });
        if let Some(path) = args.nth(1) {
            config.source_path = PathBuf::from(path);
        }
        config
    }
}
