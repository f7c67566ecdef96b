//! SDK configuration loading
//!
//! Reads `engram.config.json` from the working directory (or an explicit
//! path). An absent file is not an error: every section falls back to
//! its defaults, with both services enabled.

use crate::error::Result;
use config::FileFormat;
use serde::Deserialize;
use std::path::Path;

/// Default config file name, resolved against the working directory
pub const DEFAULT_CONFIG_FILE: &str = "engram.config.json";

/// Top-level SDK configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngramConfig {
    pub storage: StorageSection,
    pub state: StateSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    pub enabled: bool,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StateSection {
    pub enabled: bool,
    pub llm_mode: bool,
    pub flux: FluxSection,
}

impl Default for StateSection {
    fn default() -> Self {
        Self {
            enabled: true,
            llm_mode: false,
            flux: FluxSection::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FluxSection {
    pub enabled: bool,
}

impl EngramConfig {
    /// Load configuration from `path`, or the default file when `None`
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        if !path.exists() {
            return Ok(Self::default());
        }

        let settings = config::Config::builder()
            .add_source(config::File::from(path).format(FileFormat::Json))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}
