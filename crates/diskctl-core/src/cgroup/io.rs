//! Format of the cgroup v1 blkio throttle control files.
//!
//! Each file holds one `"<major>:<minor> <value>"` row per throttled device.
//! Writing a single row replaces or inserts that device's entry; a value of 0
//! removes the limit.

use std::fmt;

use diskctl_common::constants::{BPS_FILE_SUFFIX, IOPS_FILE_SUFFIX, THROTTLE_FILE_PREFIX};
use diskctl_common::types::{DeviceId, Operation};

/// Which rate a control file limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    /// I/O operations per second.
    Iops,
    /// Bytes per second.
    Bps,
}

impl fmt::Display for ControlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iops => write!(f, "iops"),
            Self::Bps => write!(f, "bps"),
        }
    }
}

/// Returns the control file name for an operation and rate kind.
///
/// e.g. `blkio.throttle.read_iops_device`.
#[must_use]
pub fn control_file_name(op: Operation, kind: ControlKind) -> String {
    let suffix = match kind {
        ControlKind::Iops => IOPS_FILE_SUFFIX,
        ControlKind::Bps => BPS_FILE_SUFFIX,
    };
    format!("{THROTTLE_FILE_PREFIX}{}{suffix}", op.as_str())
}

/// One row of a throttle control file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleRule {
    /// Device the rule applies to.
    pub device: DeviceId,
    /// Raw limit value; 0 means unlimited.
    pub value: u64,
}

impl ThrottleRule {
    /// Serializes the rule as written to the kernel, newline included.
    #[must_use]
    pub fn to_line(&self) -> String {
        format!("{} {}\n", self.device, self.value)
    }
}

/// Parses the contents of a control file.
///
/// Malformed rows are skipped.
#[must_use]
pub fn parse_rules(text: &str) -> Vec<ThrottleRule> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let rule = parse_rule(line);
            if rule.is_none() {
                tracing::debug!(line, "skipping malformed throttle row");
            }
            rule
        })
        .collect()
}

fn parse_rule(line: &str) -> Option<ThrottleRule> {
    let mut fields = line.split_whitespace();
    let device = fields.next()?.parse().ok()?;
    let value = fields.next()?.parse().ok()?;
    if fields.next().is_some() {
        return None;
    }
    Some(ThrottleRule { device, value })
}
