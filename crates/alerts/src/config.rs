//! Credentials file storage.

use rates_core::Credentials;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to write config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// JSON file holding the bot token and chat ID.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub const DEFAULT_PATH: &'static str = "config.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load stored credentials.
    ///
    /// Returns None when the file is missing, unreadable, not valid JSON, or
    /// lacks a non-empty token or chat ID.
    pub fn load(&self) -> Option<Credentials> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Config file {:?} not found", self.path);
                return None;
            }
            Err(e) => {
                warn!("Could not read config file {:?}: {}", self.path, e);
                return None;
            }
        };

        match serde_json::from_str::<Credentials>(&content) {
            Ok(creds) => {
                let creds = creds.validated();
                if creds.is_none() {
                    warn!("Config file {:?} has an empty token or chat ID", self.path);
                }
                creds
            }
            Err(e) => {
                warn!("Config file {:?} is invalid: {}", self.path, e);
                None
            }
        }
    }

    /// Overwrite the file with `creds`.
    pub fn save(&self, creds: &Credentials) -> Result<(), StoreError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        creds.serialize(&mut serializer)?;

        fs::write(&self.path, buf)?;

        info!("Config saved to {:?}", self.path);
        Ok(())
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PATH)
    }
}
