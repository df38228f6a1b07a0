//! Persisted forced-environment override.

use std::path::{Path, PathBuf};

use super::{ConfigError, Environment, Result};

const OVERRIDE_FILE: &str = "environment";

/// File holding an environment forced with `finanzas env force`.
///
/// The override survives across runs until `finanzas env reset` removes it.
#[derive(Debug, Clone)]
pub struct OverrideStore {
    path: PathBuf,
}

impl OverrideStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under `FINANZAS_CONFIG_DIR`, else the user config directory.
    pub fn default_location() -> Result<Self> {
        let dir = std::env::var_os("FINANZAS_CONFIG_DIR")
            .map(PathBuf::from)
            .or_else(|| directories::BaseDirs::new().map(|b| b.config_dir().join("finanzas")))
            .ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::new(dir.join(OVERRIDE_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the forced environment, if any.
    pub fn load(&self) -> Result<Option<Environment>> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(None),
            Ok(text) => text.parse().map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Persists `environment` as the forced environment.
    pub fn force(&self, environment: Environment) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&self.path, environment.as_str())?;
        Ok(())
    }

    /// Removes the override. Returns false if none was set.
    pub fn reset(&self) -> Result<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
