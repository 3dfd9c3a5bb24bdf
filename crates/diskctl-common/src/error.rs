//! Unified error types for the diskctl workspace.
//!
//! Every failure is terminal for an invocation. The CLI maps each variant to
//! a process exit code through [`DiskctlError::exit_code`].

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum DiskctlError {
    /// Command-line arguments are missing or inconsistent.
    #[error("{message}")]
    Usage {
        /// Description of the usage problem.
        message: String,
    },

    /// No disk-type block device carries the requested name.
    #[error("disk not found: {name}")]
    DeviceNotFound {
        /// Device name as given by the caller.
        name: String,
        /// Disks that do exist, for the hint printed after the error.
        available: Vec<String>,
    },

    /// The I/O direction is not one of `read`, `write`, `rw`.
    #[error("Invalid io type: {value}")]
    InvalidDirection {
        /// Rejected value.
        value: String,
    },

    /// The action is not one of `hang`, `throttle`, `recover`, `show`.
    #[error("Invalid action type: {value}")]
    InvalidAction {
        /// Rejected value.
        value: String,
    },

    /// An IOPS or bandwidth value is not a non-negative integer.
    #[error("invalid value for {flag}: {value} (expected a non-negative integer or \"unlimited\")")]
    InvalidLimit {
        /// Flag the value was supplied through.
        flag: &'static str,
        /// Rejected value.
        value: String,
    },

    /// A device identifier is not of the form `MAJ:MIN`.
    #[error("invalid device identifier: {value:?}")]
    InvalidDeviceId {
        /// Rejected value.
        value: String,
    },

    /// Reading or writing a cgroup control file failed.
    #[error("failed to {op} {path}: {source}")]
    ControlFile {
        /// Operation attempted (`read` or `write`).
        op: &'static str,
        /// Control file that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Reading the block-device topology from sysfs failed.
    #[error("I/O error at {path}: {source}")]
    Topology {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// A configuration file could not be parsed.
    #[error("invalid configuration file {path}: {source}")]
    ConfigParse {
        /// Configuration file that failed to parse.
        path: PathBuf,
        /// Underlying deserialization error.
        source: serde_json::Error,
    },
}

impl DiskctlError {
    /// Returns the process exit code for this error.
    ///
    /// I/O failures propagate the OS error number so callers can tell
    /// e.g. `EACCES` from `ENOENT`; everything else exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ControlFile { source, .. } | Self::Topology { source, .. } => source
                .raw_os_error()
                .filter(|code| *code > 0 && *code < 256)
                .unwrap_or(1),
            _ => 1,
        }
    }

    /// Whether the usage text should accompany this error.
    pub const fn is_usage(&self) -> bool {
        matches!(
            self,
            Self::Usage { .. }
                | Self::InvalidDirection { .. }
                | Self::InvalidAction { .. }
                | Self::InvalidLimit { .. }
        )
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, DiskctlError>;
