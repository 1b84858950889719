//! Path management for mentorship configuration and data files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/mentorship/        # Config directory
//! └── config.toml              # Engine configuration
//!
//! ~/.local/share/mentorship/   # Data directory
//! └── store/                   # TomlRecordStore collections
//! ```
//!
//! Both roots can be replaced with an explicit base directory, which is what
//! the CLI's `--data-dir` flag and the tests use.

use std::path::PathBuf;

const APP_DIR: &str = "mentorship";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for mentorship_core::MentorshipError {
    fn from(e: PathError) -> Self {
        mentorship_core::MentorshipError::config(e.to_string())
    }
}

/// Resolves where configuration and data live.
#[derive(Debug, Clone, Default)]
pub struct MentorshipPaths {
    base_dir: Option<PathBuf>,
}

impl MentorshipPaths {
    /// `None` uses the platform directories from `dirs`.
    pub fn new(base_dir: Option<PathBuf>) -> Self {
        Self { base_dir }
    }

    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base_dir {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base_dir {
            Some(base) => Ok(base.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    pub fn store_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("store"))
    }
}
