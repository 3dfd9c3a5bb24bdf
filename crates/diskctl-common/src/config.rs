//! Configuration model for diskctl.
//!
//! Values are layered: built-in defaults, then an optional JSON file, then
//! environment variables and command-line flags (applied by the CLI).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DiskctlError, Result};

/// Root configuration for a diskctl invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiskctlConfig {
    /// Directory holding the `blkio.throttle.*` control files.
    ///
    /// Either the blkio hierarchy root or any group below it.
    pub cgroup_root: PathBuf,
    /// Directory listing whole block devices (normally `/sys/block`).
    pub sysfs_block_root: PathBuf,
}

impl Default for DiskctlConfig {
    fn default() -> Self {
        Self {
            cgroup_root: PathBuf::from(crate::constants::DEFAULT_CGROUP_ROOT),
            sysfs_block_root: PathBuf::from(crate::constants::DEFAULT_SYSFS_BLOCK_ROOT),
        }
    }
}

impl DiskctlConfig {
    /// Loads a configuration file, filling absent keys with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`DiskctlError::Config`] if the file cannot be read and
    /// [`DiskctlError::ConfigParse`] if it is not valid JSON for this model.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| DiskctlError::Config {
            message: format!("cannot read {}: {e}", path.display()),
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|e| DiskctlError::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that both roots are usable paths.
    ///
    /// # Errors
    ///
    /// Returns [`DiskctlError::Config`] if a root is empty.
    pub fn validate(&self) -> Result<()> {
        if self.cgroup_root.as_os_str().is_empty() {
            return Err(DiskctlError::Config {
                message: "cgroup_root must not be empty".into(),
            });
        }
        if self.sysfs_block_root.as_os_str().is_empty() {
            return Err(DiskctlError::Config {
                message: "sysfs_block_root must not be empty".into(),
            });
        }
        Ok(())
    }
}
