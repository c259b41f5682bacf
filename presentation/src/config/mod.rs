//! Display and chat settings resolved from flags and the config file

use sales_intel_domain::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How dispatch results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            color: true,
        }
    }
}

impl OutputConfig {
    /// `--output` wins over the file's `[output] format`.
    pub fn resolve(
        flag: Option<crate::OutputFormat>,
        file_format: Option<OutputFormat>,
        color: bool,
    ) -> Self {
        Self {
            format: flag.map(Into::into).or(file_format).unwrap_or_default(),
            color,
        }
    }
}

/// Chat-mode settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplConfig {
    /// Spinner while a dispatch runs
    pub show_progress: bool,
    pub history_file: Option<String>,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            history_file: None,
        }
    }
}

impl ReplConfig {
    /// Configured history file, else `<data dir>/sales-intel/history.txt`
    pub fn history_path(&self) -> Option<PathBuf> {
        match &self.history_file {
            Some(path) => Some(PathBuf::from(path)),
            None => dirs::data_dir().map(|p| p.join("sales-intel").join("history.txt")),
        }
    }
}
