//! Configuration service implementation.
//!
//! Loads `MentorshipConfig` from `config.toml`, writing the defaults on
//! first use so operators have a file to edit.

use crate::storage::AtomicTomlFile;
use mentorship_core::config::MentorshipConfig;
use mentorship_core::error::Result;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Loads and caches the engine configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    config: Arc<RwLock<Option<MentorshipConfig>>>,
}

impl ConfigService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the configuration, loading it from disk if not cached.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be parsed or does not validate,
    /// or if the default file cannot be written.
    pub fn get_config(&self) -> Result<MentorshipConfig> {
        if let Ok(read_lock) = self.config.read() {
            if let Some(cached) = read_lock.as_ref() {
                return Ok(cached.clone());
            }
        }

        let loaded = self.load_config()?;

        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    fn load_config(&self) -> Result<MentorshipConfig> {
        let file = AtomicTomlFile::<MentorshipConfig>::new(self.path.clone());

        match file.load()? {
            Some(config) => {
                config.validate()?;
                tracing::debug!(path = %self.path.display(), "loaded configuration");
                Ok(config)
            }
            None => {
                let config = MentorshipConfig::default();
                file.save(&config)?;
                tracing::info!(path = %self.path.display(), "wrote default configuration");
                Ok(config)
            }
        }
    }
}
