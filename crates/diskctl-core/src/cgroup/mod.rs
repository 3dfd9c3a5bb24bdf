//! Cgroup blkio throttle management.
//!
//! [`BlkioCgroup`] is a handle on one blkio cgroup directory. File access goes
//! through the [`ControlFiles`] trait so the kernel interface can be swapped
//! for an in-memory table in tests.

pub mod io;

use std::path::{Path, PathBuf};

use diskctl_common::error::{DiskctlError, Result};
use diskctl_common::types::{DeviceId, Limit, Operation};

use self::io::{ControlKind, ThrottleRule, control_file_name, parse_rules};

/// Access to cgroup control files.
pub trait ControlFiles {
    /// Reads the full contents of a control file.
    ///
    /// # Errors
    ///
    /// Returns [`DiskctlError::ControlFile`] if the file cannot be read.
    fn read(&self, path: &Path) -> Result<String>;

    /// Writes one rule to a control file.
    ///
    /// # Errors
    ///
    /// Returns [`DiskctlError::ControlFile`] if the write fails.
    fn write(&self, path: &Path, rule: &ThrottleRule) -> Result<()>;
}

/// The cgroup filesystem mounted by the kernel.
///
/// Writes are a single `write(2)` of the rule; the kernel merges it into the
/// device table.
#[derive(Debug, Clone, Copy, Default)]
pub struct CgroupFs;

impl ControlFiles for CgroupFs {
    fn read(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).map_err(|e| DiskctlError::ControlFile {
            op: "read",
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn write(&self, path: &Path, rule: &ThrottleRule) -> Result<()> {
        std::fs::write(path, rule.to_line()).map_err(|e| DiskctlError::ControlFile {
            op: "write",
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Handle to a blkio cgroup directory.
#[derive(Debug, Clone)]
pub struct BlkioCgroup<F = CgroupFs> {
    /// Directory holding the `blkio.throttle.*` files.
    path: PathBuf,
    files: F,
}

impl BlkioCgroup<CgroupFs> {
    /// Opens the blkio cgroup at `path` on the kernel's cgroup filesystem.
    ///
    /// The directory is not checked; a wrong path surfaces as a
    /// [`DiskctlError::ControlFile`] on first access.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::with_files(path, CgroupFs)
    }
}

impl<F: ControlFiles> BlkioCgroup<F> {
    /// Opens the blkio cgroup at `path` using the given file access.
    #[must_use]
    pub fn with_files(path: impl Into<PathBuf>, files: F) -> Self {
        Self {
            path: path.into(),
            files,
        }
    }

    /// Returns the file access backing this handle.
    #[must_use]
    pub const fn files(&self) -> &F {
        &self.files
    }

    /// Returns the full path of a throttle control file.
    #[must_use]
    pub fn control_path(&self, op: Operation, kind: ControlKind) -> PathBuf {
        self.path.join(control_file_name(op, kind))
    }

    /// Sets the limit for `device` in one control file.
    ///
    /// # Errors
    ///
    /// Returns [`DiskctlError::ControlFile`] if the write fails.
    pub fn set(&self, op: Operation, kind: ControlKind, device: DeviceId, limit: Limit) -> Result<()> {
        let path = self.control_path(op, kind);
        let rule = ThrottleRule {
            device,
            value: limit.as_raw(),
        };
        self.files.write(&path, &rule)?;
        tracing::info!(%device, %op, %kind, value = rule.value, "throttle limit written");
        Ok(())
    }

    /// Reads the limit for `device` from one control file.
    ///
    /// An absent row, or a row with value 0, is [`Limit::Unlimited`].
    ///
    /// # Errors
    ///
    /// Returns [`DiskctlError::ControlFile`] if the read fails.
    pub fn get(&self, op: Operation, kind: ControlKind, device: DeviceId) -> Result<Limit> {
        let path = self.control_path(op, kind);
        let text = self.files.read(&path)?;
        let limit = parse_rules(&text)
            .into_iter()
            .rev()
            .find(|rule| rule.device == device)
            .map_or(Limit::Unlimited, |rule| Limit::from_raw(rule.value));
        tracing::debug!(%device, %op, %kind, %limit, "throttle limit read");
        Ok(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_path_joins_file_name() {
        let cgroup = BlkioCgroup::open("/sys/fs/cgroup/blkio/db");
        assert_eq!(
            cgroup.control_path(Operation::Write, ControlKind::Bps),
            PathBuf::from("/sys/fs/cgroup/blkio/db/blkio.throttle.write_bps_device")
        );
    }

    #[test]
    fn set_writes_single_row() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cgroup = BlkioCgroup::open(dir.path());
        cgroup
            .set(Operation::Read, ControlKind::Iops, DeviceId::new(8, 0), Limit::Max(200))
            .expect("set");
        let written = std::fs::read_to_string(dir.path().join("blkio.throttle.read_iops_device"))
            .expect("read back");
        assert_eq!(written, "8:0 200\n");
    }

    #[test]
    fn get_finds_row_for_device() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("blkio.throttle.write_bps_device"),
            "8:0 1048576\n253:0 4096\n",
        )
        .expect("write");
        let cgroup = BlkioCgroup::open(dir.path());
        let limit = cgroup
            .get(Operation::Write, ControlKind::Bps, DeviceId::new(253, 0))
            .expect("get");
        assert_eq!(limit, Limit::Max(4096));
    }

    #[test]
    fn get_absent_row_is_unlimited() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("blkio.throttle.read_bps_device"), "8:0 10\n")
            .expect("write");
        let cgroup = BlkioCgroup::open(dir.path());
        let limit = cgroup
            .get(Operation::Read, ControlKind::Bps, DeviceId::new(8, 16))
            .expect("get");
        assert_eq!(limit, Limit::Unlimited);
    }

    #[test]
    fn get_missing_file_is_control_file_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cgroup = BlkioCgroup::open(dir.path());
        let err = cgroup
            .get(Operation::Read, ControlKind::Iops, DeviceId::new(8, 0))
            .expect_err("missing file");
        assert!(matches!(err, DiskctlError::ControlFile { op: "read", .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn set_into_missing_directory_fails_with_path() {
        let cgroup = BlkioCgroup::open("/nonexistent/cgroup/blkio");
        let err = cgroup
            .set(Operation::Write, ControlKind::Iops, DeviceId::new(8, 0), Limit::Max(1))
            .expect_err("missing dir");
        match err {
            DiskctlError::ControlFile { op, path, .. } => {
                assert_eq!(op, "write");
                assert!(path.ends_with("blkio.throttle.write_iops_device"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
