//! Domain primitive types used across the diskctl workspace.

use std::fmt;
use std::str::FromStr;

use crate::constants::{HANG_LIMIT, UNLIMITED_LABEL, UNLIMITED_RAW};
use crate::error::DiskctlError;

/// Kernel-assigned `major:minor` pair identifying a block device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceId {
    /// Major number (driver).
    pub major: u32,
    /// Minor number (instance).
    pub minor: u32,
}

impl DeviceId {
    /// Creates an identifier from its two numbers.
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl FromStr for DeviceId {
    type Err = DiskctlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DiskctlError::InvalidDeviceId {
            value: s.to_string(),
        };
        let (major, minor) = s.trim().split_once(':').ok_or_else(invalid)?;
        Ok(Self {
            major: major.parse().map_err(|_| invalid())?,
            minor: minor.parse().map_err(|_| invalid())?,
        })
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.major, self.minor)
    }
}

/// A block device name bound to its resolved identifier.
///
/// Built once by the topology resolver and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRef {
    name: String,
    id: DeviceId,
}

impl DeviceRef {
    /// Binds a device name to its identifier.
    #[must_use]
    pub fn new(name: impl Into<String>, id: DeviceId) -> Self {
        Self {
            name: name.into(),
            id,
        }
    }

    /// Returns the kernel device name (e.g. `sda`).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the `major:minor` identifier.
    #[must_use]
    pub const fn id(&self) -> DeviceId {
        self.id
    }
}

impl fmt::Display for DeviceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// A single concrete I/O direction, as named in control-file paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Reads from the device.
    Read,
    /// Writes to the device.
    Write,
}

impl Operation {
    /// Returns the lowercase name used in file names and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The direction(s) an action applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IoDirection {
    /// Read only.
    Read,
    /// Write only.
    Write,
    /// Read and write.
    Both,
}

impl IoDirection {
    /// Returns the concrete operations covered, reads first.
    #[must_use]
    pub const fn operations(self) -> &'static [Operation] {
        match self {
            Self::Read => &[Operation::Read],
            Self::Write => &[Operation::Write],
            Self::Both => &[Operation::Read, Operation::Write],
        }
    }
}

impl FromStr for IoDirection {
    type Err = DiskctlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            "rw" | "both" | "read&write" => Ok(Self::Both),
            other => Err(DiskctlError::InvalidDirection {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for IoDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
            Self::Both => write!(f, "rw"),
        }
    }
}

/// What to do with the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Throttle I/O down to one operation and one byte per second.
    Hang,
    /// Apply caller-supplied limits.
    Throttle,
    /// Remove all limits.
    Recover,
    /// Report the current limits.
    Show,
}

impl Action {
    /// Whether the action writes to control files.
    #[must_use]
    pub const fn is_mutating(self) -> bool {
        !matches!(self, Self::Show)
    }
}

impl FromStr for Action {
    type Err = DiskctlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hang" => Ok(Self::Hang),
            "throttle" => Ok(Self::Throttle),
            "recover" => Ok(Self::Recover),
            "show" => Ok(Self::Show),
            other => Err(DiskctlError::InvalidAction {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hang => write!(f, "hang"),
            Self::Throttle => write!(f, "throttle"),
            Self::Recover => write!(f, "recover"),
            Self::Show => write!(f, "show"),
        }
    }
}

/// A rate limit: either a ceiling or no limit at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Limit {
    /// No limit (raw value 0).
    Unlimited,
    /// At most this many operations or bytes per second. Never zero.
    Max(u64),
}

impl Limit {
    /// Interprets a raw control-file value, where 0 means unlimited.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        if raw == UNLIMITED_RAW {
            Self::Unlimited
        } else {
            Self::Max(raw)
        }
    }

    /// Returns the value written to a control file.
    #[must_use]
    pub const fn as_raw(self) -> u64 {
        match self {
            Self::Unlimited => UNLIMITED_RAW,
            Self::Max(n) => n,
        }
    }

    /// Parses a user-supplied value for the given flag.
    ///
    /// Accepts a non-negative decimal integer or `unlimited`/`infinite`.
    ///
    /// # Errors
    ///
    /// Returns [`DiskctlError::InvalidLimit`] for anything else, including
    /// negative and fractional numbers.
    pub fn parse_for(flag: &'static str, value: &str) -> Result<Self, DiskctlError> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("unlimited") || trimmed.eq_ignore_ascii_case(UNLIMITED_LABEL)
        {
            return Ok(Self::Unlimited);
        }
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DiskctlError::InvalidLimit {
                flag,
                value: value.to_string(),
            });
        }
        trimmed
            .parse::<u64>()
            .map(Self::from_raw)
            .map_err(|_| DiskctlError::InvalidLimit {
                flag,
                value: value.to_string(),
            })
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unlimited => f.write_str(UNLIMITED_LABEL),
            Self::Max(n) => write!(f, "{n}"),
        }
    }
}

/// IOPS and bandwidth limits for one request. `None` leaves a file untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThrottleLimits {
    /// I/O operations per second.
    pub iops: Option<Limit>,
    /// Bytes per second.
    pub bps: Option<Limit>,
}

impl ThrottleLimits {
    /// Limits that reduce the device to a trickle.
    #[must_use]
    pub const fn hang() -> Self {
        Self {
            iops: Some(Limit::Max(HANG_LIMIT)),
            bps: Some(Limit::Max(HANG_LIMIT)),
        }
    }

    /// Limits that remove any throttling.
    #[must_use]
    pub const fn recover() -> Self {
        Self {
            iops: Some(Limit::Unlimited),
            bps: Some(Limit::Unlimited),
        }
    }

    /// Whether neither limit is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.iops.is_none() && self.bps.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_id_parses_major_minor() {
        let id: DeviceId = "253:0".parse().expect("parse");
        assert_eq!(id, DeviceId::new(253, 0));
        assert_eq!(id.to_string(), "253:0");
    }

    #[test]
    fn device_id_trims_trailing_newline() {
        let id: DeviceId = "8:16\n".parse().expect("parse");
        assert_eq!(id, DeviceId::new(8, 16));
    }

    #[test]
    fn device_id_rejects_garbage() {
        assert!("8".parse::<DeviceId>().is_err());
        assert!("a:b".parse::<DeviceId>().is_err());
        assert!("".parse::<DeviceId>().is_err());
    }

    #[test]
    fn direction_parses_all_spellings() {
        assert_eq!("read".parse::<IoDirection>().ok(), Some(IoDirection::Read));
        assert_eq!("write".parse::<IoDirection>().ok(), Some(IoDirection::Write));
        assert_eq!("rw".parse::<IoDirection>().ok(), Some(IoDirection::Both));
        assert_eq!(
            "read&write".parse::<IoDirection>().ok(),
            Some(IoDirection::Both)
        );
    }

    #[test]
    fn direction_rejects_unknown_value() {
        let err = "sideways".parse::<IoDirection>().unwrap_err();
        assert!(matches!(err, DiskctlError::InvalidDirection { value } if value == "sideways"));
    }

    #[test]
    fn both_direction_covers_read_then_write() {
        assert_eq!(
            IoDirection::Both.operations(),
            &[Operation::Read, Operation::Write]
        );
        assert_eq!(IoDirection::Write.operations(), &[Operation::Write]);
    }

    #[test]
    fn action_rejects_pause() {
        let err = "pause".parse::<Action>().unwrap_err();
        assert!(matches!(err, DiskctlError::InvalidAction { value } if value == "pause"));
    }

    #[test]
    fn action_is_case_sensitive() {
        assert!("Hang".parse::<Action>().is_err());
        assert_eq!("hang".parse::<Action>().ok(), Some(Action::Hang));
    }

    #[test]
    fn only_show_is_read_only() {
        assert!(!Action::Show.is_mutating());
        assert!(Action::Hang.is_mutating());
        assert!(Action::Throttle.is_mutating());
        assert!(Action::Recover.is_mutating());
    }

    #[test]
    fn limit_zero_is_unlimited() {
        assert_eq!(Limit::from_raw(0), Limit::Unlimited);
        assert_eq!(Limit::Unlimited.as_raw(), 0);
        assert_eq!(Limit::Unlimited.to_string(), "Infinite");
    }

    #[test]
    fn limit_parses_numbers_and_words() {
        assert_eq!(Limit::parse_for("-i", "500").ok(), Some(Limit::Max(500)));
        assert_eq!(Limit::parse_for("-i", "0").ok(), Some(Limit::Unlimited));
        assert_eq!(
            Limit::parse_for("-b", "Unlimited").ok(),
            Some(Limit::Unlimited)
        );
        assert_eq!(
            Limit::parse_for("-b", "infinite").ok(),
            Some(Limit::Unlimited)
        );
    }

    #[test]
    fn limit_rejects_negative_fractional_and_text() {
        for bad in ["-1", "1.5", "fast", "", "+3", "99999999999999999999999"] {
            let err = Limit::parse_for("-i", bad).unwrap_err();
            assert!(
                matches!(err, DiskctlError::InvalidLimit { flag: "-i", .. }),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn hang_and_recover_limits() {
        assert_eq!(ThrottleLimits::hang().iops, Some(Limit::Max(1)));
        assert_eq!(ThrottleLimits::hang().bps, Some(Limit::Max(1)));
        assert_eq!(ThrottleLimits::recover().iops.map(Limit::as_raw), Some(0));
        assert!(ThrottleLimits::default().is_empty());
    }
}
