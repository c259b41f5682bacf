//! Configuration file loading for sales-intel
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `SALES_INTEL_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./sales-intel.toml` or `./.sales-intel.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/sales-intel/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    DEFAULT_SEARCH_ENDPOINT, FileConfig, FileDispatchConfig, FileLoggingConfig, FileOpenAiConfig,
    FileOutputConfig, FilePlaybackConfig, FileReplConfig, FileSearchConfig, KNOWN_VOICES,
};
pub use loader::ConfigLoader;
