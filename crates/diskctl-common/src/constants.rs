//! System-wide constants and default paths.

/// Default cgroup v1 blkio hierarchy mount point.
pub const DEFAULT_CGROUP_ROOT: &str = "/sys/fs/cgroup/blkio";

/// Default sysfs directory listing whole block devices.
pub const DEFAULT_SYSFS_BLOCK_ROOT: &str = "/sys/block";

/// Prefix shared by every blkio throttle control file.
pub const THROTTLE_FILE_PREFIX: &str = "blkio.throttle.";

/// Suffix of the per-device IOPS control files.
pub const IOPS_FILE_SUFFIX: &str = "_iops_device";

/// Suffix of the per-device bandwidth control files.
pub const BPS_FILE_SUFFIX: &str = "_bps_device";

/// Exit status note appended to `--help`.
pub const EXIT_STATUS_HELP: &str = "Exit status: 0 on success and for --help/--version; 1 for \
missing or invalid parameters (usage is printed) and unknown disks; the OS error number when a \
control file or sysfs entry cannot be accessed.";

/// Message for a `throttle` request that names neither limit.
pub const THROTTLE_NEEDS_LIMIT: &str = "throttle needs at least one of -i (iops) or -b (bandwidth)";

/// Value written for both IOPS and bandwidth when hanging a device.
pub const HANG_LIMIT: u64 = 1;

/// Raw control-file value meaning "no limit".
pub const UNLIMITED_RAW: u64 = 0;

/// Label shown in reports for an absent or zero limit.
pub const UNLIMITED_LABEL: &str = "Infinite";

/// Width of every column in the `show` report.
pub const REPORT_COLUMN_WIDTH: usize = 15;

/// Header labels of the `show` report, in column order.
pub const REPORT_HEADER: [&str; 4] = ["Device", "Operation", "IOPS", "Bandwidth(Bytes)"];

/// Environment variable naming an optional JSON configuration file.
pub const CONFIG_ENV: &str = "DISKCTL_CONFIG";

/// Environment variable overriding the cgroup root.
pub const CGROUP_ROOT_ENV: &str = "DISKCTL_CGROUP_ROOT";

/// Environment variable overriding the sysfs block root.
pub const SYSFS_ROOT_ENV: &str = "DISKCTL_SYSFS_ROOT";

/// Binary name for the CLI.
pub const BIN_NAME: &str = "diskctl";
