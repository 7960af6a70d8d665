//! Storage location configuration
//!
//! Production and test runs use different cache directories so UI test runs
//! never touch an operator's real data.

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::error::Result;
use crate::{DATABASE_FILENAME, PRODUCTION_CACHE_DIR, TEST_CACHE_DIR, TEST_MODE_ARGUMENT};

/// Which cache directory to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    #[default]
    Production,
    Test,
}

impl StorageMode {
    /// `Test` when the process was started with the UI-testing argument
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if args.into_iter().any(|arg| arg.as_ref() == TEST_MODE_ARGUMENT) {
            StorageMode::Test
        } else {
            StorageMode::Production
        }
    }

    /// Directory name below the base directory
    pub fn cache_dir(&self) -> &'static str {
        match self {
            StorageMode::Production => PRODUCTION_CACHE_DIR,
            StorageMode::Test => TEST_CACHE_DIR,
        }
    }
}

/// Where the encrypted cache file lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Application support directory
    pub base_dir: PathBuf,
    /// Production or test cache directory
    pub mode: StorageMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            mode: StorageMode::Production,
        }
    }
}

impl StoreConfig {
    pub fn new(base_dir: impl Into<PathBuf>, mode: StorageMode) -> Self {
        Self {
            base_dir: base_dir.into(),
            mode,
        }
    }

    /// Default base directory, mode picked from the process arguments
    pub fn from_env() -> Self {
        Self {
            base_dir: default_base_dir(),
            mode: StorageMode::from_args(std::env::args()),
        }
    }

    /// Test-mode configuration rooted at `dir`, for isolated stores
    pub fn isolated(dir: &Path) -> Self {
        Self::new(dir, StorageMode::Test)
    }

    /// `{base_dir}/{cache_dir}`
    pub fn cache_dir(&self) -> PathBuf {
        self.base_dir.join(self.mode.cache_dir())
    }

    /// `{base_dir}/{cache_dir}/ditto_encrypted.db`
    pub fn database_path(&self) -> PathBuf {
        self.cache_dir().join(DATABASE_FILENAME)
    }

    /// Create the cache directory if needed and return the database path
    pub fn prepare_database_path(&self) -> Result<PathBuf> {
        std::fs::create_dir_all(self.cache_dir())?;
        Ok(self.database_path())
    }
}

/// Application support directory, or the working directory when the
/// platform has none.
fn default_base_dir() -> PathBuf {
    dirs::data_dir().unwrap_or_else(|| PathBuf::from("."))
}
