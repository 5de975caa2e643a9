//! Configuration file loading for docchat
//!
//! This module handles file I/O and merging of configuration from multiple
//! sources. The priority order (highest to lowest):
//!
//! 1. CLI flags (applied by the binary)
//! 2. `DOCCHAT_` environment variables (`__` separates sections)
//! 3. `--config <path>` specified file
//! 4. Project root: `./docchat.toml` or `./.docchat.toml`
//! 5. XDG config: `$XDG_CONFIG_HOME/docchat/config.toml`
//! 6. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileConnectionConfig, FileLoggingConfig, FileReplConfig,
    FileUploadConfig,
};
pub use loader::ConfigLoader;
