//! Block-device topology read straight from sysfs.
//!
//! Every whole block device appears as `/sys/block/<name>` with a `dev`
//! attribute holding its `major:minor` pair. Partitions are not listed there,
//! so looking a name up under this root already restricts the search to whole
//! devices; [`DeviceKind`] further narrows it to the ones `lsblk` calls disks.

use std::io;
use std::path::{Path, PathBuf};

use diskctl_common::error::{DiskctlError, Result};
use diskctl_common::types::{DeviceId, DeviceRef};

/// SCSI peripheral type of a CD/DVD drive (`device/type`).
const SCSI_TYPE_ROM: u32 = 5;

/// Kind of a whole block device, as `lsblk` reports it in its TYPE column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    /// A physical or virtual disk, including `zram` and `ram` devices.
    Disk,
    /// Loop device.
    Loop,
    /// Device-mapper target (LVM, crypt, multipath).
    DeviceMapper,
    /// Software RAID array.
    Raid,
    /// Optical drive.
    Rom,
}

impl DeviceKind {
    /// Classifies the device whose sysfs directory is `dir`.
    ///
    /// Follows the attributes the kernel exposes: a `dm`, `md` or `loop`
    /// subdirectory, or a SCSI `device/type` of 5. Anything else is a disk.
    #[must_use]
    pub fn detect(dir: &Path) -> Self {
        if dir.join("dm").is_dir() {
            Self::DeviceMapper
        } else if dir.join("md").is_dir() {
            Self::Raid
        } else if dir.join("loop").is_dir() {
            Self::Loop
        } else if std::fs::read_to_string(dir.join("device").join("type"))
            .ok()
            .and_then(|t| t.trim().parse::<u32>().ok())
            == Some(SCSI_TYPE_ROM)
        {
            Self::Rom
        } else {
            Self::Disk
        }
    }
}

/// View of the block devices known to the kernel.
#[derive(Debug, Clone)]
pub struct BlockTopology {
    root: PathBuf,
}

impl BlockTopology {
    /// Opens the topology rooted at a sysfs block directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolves a disk name (`sda` or `/dev/sda`) to its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DiskctlError::DeviceNotFound`] if no disk carries the name,
    /// [`DiskctlError::Topology`] if sysfs cannot be read, and
    /// [`DiskctlError::InvalidDeviceId`] if the `dev` attribute is malformed.
    pub fn resolve(&self, name: &str) -> Result<DeviceRef> {
        let short = name.strip_prefix("/dev/").unwrap_or(name);
        let not_found = || DiskctlError::DeviceNotFound {
            name: name.to_string(),
            available: Vec::new(),
        };
        if short.is_empty() || short.contains('/') || short == "." || short == ".." {
            return Err(not_found());
        }

        let dir = self.root.join(short);
        let dev_path = dir.join("dev");
        let raw = match std::fs::read_to_string(&dev_path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(not_found()),
            Err(e) => {
                return Err(DiskctlError::Topology {
                    path: dev_path,
                    source: e,
                });
            }
        };

        let kind = DeviceKind::detect(&dir);
        if kind != DeviceKind::Disk {
            tracing::debug!(device = short, ?kind, "not a disk-type device");
            return Err(not_found());
        }
        let id: DeviceId = raw.parse()?;
        tracing::debug!(device = short, %id, "device resolved");
        Ok(DeviceRef::new(short, id))
    }

    /// Lists every disk-type device, sorted by name.
    ///
    /// Entries that do not resolve to a disk are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`DiskctlError::Topology`] if the root cannot be listed.
    pub fn disks(&self) -> Result<Vec<DeviceRef>> {
        let entries = std::fs::read_dir(&self.root).map_err(|e| DiskctlError::Topology {
            path: self.root.clone(),
            source: e,
        })?;

        let mut disks: Vec<DeviceRef> = entries
            .filter_map(std::result::Result::ok)
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter_map(|name| self.resolve(&name).ok())
            .collect();
        disks.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(disks)
    }
}
