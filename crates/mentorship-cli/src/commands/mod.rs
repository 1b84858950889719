pub mod engine;
pub mod people;
pub mod query;

use anyhow::{Context as _, Result};
use mentorship_application::MentorshipService;
use mentorship_core::clock::SystemClock;
use mentorship_infrastructure::{ConfigService, MentorshipPaths, TomlRecordStore};
use std::path::PathBuf;
use std::sync::Arc;

/// Everything a command needs: the wired service and where it reads from.
pub struct Context {
    pub service: MentorshipService,
    pub config_path: PathBuf,
    pub store_dir: PathBuf,
}

impl Context {
    pub fn open(data_dir: Option<PathBuf>, config: Option<PathBuf>) -> Result<Self> {
        let paths = MentorshipPaths::new(data_dir);
        let config_path = match config {
            Some(path) => path,
            None => paths.config_file()?,
        };
        let store_dir = paths.store_dir()?;

        let config = ConfigService::new(&config_path)
            .get_config()
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
        let store = TomlRecordStore::new(&store_dir)
            .with_context(|| format!("Failed to open store at {}", store_dir.display()))?;
        tracing::debug!(config = %config_path.display(), store = %store_dir.display(), "context ready");

        let service = MentorshipService::new(config, Arc::new(store), Arc::new(SystemClock))?;
        Ok(Self {
            service,
            config_path,
            store_dir,
        })
    }
}

pub fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
