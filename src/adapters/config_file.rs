//! JSON file configuration adapter.
//!
//! Implements [`ConfigPort`] over a single pretty-printed JSON document.
//! Saves go to a sibling temp file first and are renamed into place, so a
//! crash mid-write never leaves a truncated config behind.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::ControllerConfig;
use crate::error::Error;

/// Adapter persisting [`ControllerConfig`] as JSON at a fixed path.
#[derive(Debug, Clone)]
pub struct JsonConfigFile {
    path: PathBuf,
}

impl JsonConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Map a failed [`ControllerConfig::validate`] onto the port error.
fn validation_error(e: Error) -> ConfigError {
    match e {
        Error::Config(msg) => ConfigError::ValidationFailed(msg),
        _ => ConfigError::ValidationFailed("invalid config"),
    }
}

impl ConfigPort for JsonConfigFile {
    fn load(&self) -> Result<ControllerConfig, ConfigError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(ConfigError::NotFound),
            Err(e) => {
                warn!("JsonConfigFile: read {} failed: {}", self.path.display(), e);
                return Err(ConfigError::IoError);
            }
        };
        let config: ControllerConfig = serde_json::from_str(&text).map_err(|e| {
            warn!("JsonConfigFile: {} is not a valid config: {}", self.path.display(), e);
            ConfigError::Corrupted
        })?;
        config.validate().map_err(validation_error)?;
        info!("JsonConfigFile: loaded {}", self.path.display());
        Ok(config)
    }

    fn save(&self, config: &ControllerConfig) -> Result<(), ConfigError> {
        config.validate().map_err(validation_error)?;

        let json = serde_json::to_string_pretty(config).map_err(|_| ConfigError::IoError)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .and_then(|()| fs::rename(&tmp, &self.path))
            .map_err(|e| {
                warn!("JsonConfigFile: write {} failed: {}", self.path.display(), e);
                ConfigError::IoError
            })?;
        info!("JsonConfigFile: saved {}", self.path.display());
        Ok(())
    }
}
