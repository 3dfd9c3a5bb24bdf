//! Device I/O controller: applies one action to one device.
//!
//! Each invocation is a single-shot dispatch over [`Action`]. Mutating actions
//! write the iops file then the bps file for every selected direction, read
//! direction first, and stop at the first failure.

use diskctl_common::constants::THROTTLE_NEEDS_LIMIT;
use diskctl_common::error::{DiskctlError, Result};
use diskctl_common::types::{Action, DeviceRef, IoDirection, Limit, Operation, ThrottleLimits};

use crate::cgroup::io::ControlKind;
use crate::cgroup::{BlkioCgroup, ControlFiles};
use crate::report::{ReportRow, ThrottleReport};

/// A validated request for one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    /// Direction(s) to act on. Ignored by `show`, which reports both.
    pub direction: IoDirection,
    /// Action to perform.
    pub action: Action,
    /// Caller-supplied limits; only consulted by `throttle`.
    pub limits: ThrottleLimits,
}

/// A control-file write performed by an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedLimit {
    /// Direction written.
    pub op: Operation,
    /// Rate kind written.
    pub kind: ControlKind,
    /// Value written.
    pub limit: Limit,
}

/// Result of a successful action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Limits written by `hang`, `throttle` or `recover`, in write order.
    Applied(Vec<AppliedLimit>),
    /// Current limits read by `show`.
    Report(ThrottleReport),
}

/// Applies throttle actions for one resolved device.
#[derive(Debug)]
pub struct DeviceController<F> {
    device: DeviceRef,
    cgroup: BlkioCgroup<F>,
}

impl<F: ControlFiles> DeviceController<F> {
    /// Creates a controller for a device inside a blkio cgroup.
    pub const fn new(device: DeviceRef, cgroup: BlkioCgroup<F>) -> Self {
        Self { device, cgroup }
    }

    /// Returns the device this controller acts on.
    pub const fn device(&self) -> &DeviceRef {
        &self.device
    }

    /// Returns the cgroup this controller writes to.
    pub const fn cgroup(&self) -> &BlkioCgroup<F> {
        &self.cgroup
    }

    /// Runs the requested action.
    ///
    /// # Errors
    ///
    /// Returns [`DiskctlError::Usage`] for a `throttle` request without any
    /// limit, and [`DiskctlError::ControlFile`] for the first failing file
    /// access. Nothing is written after a failure.
    pub fn process(&self, request: &Request) -> Result<Outcome> {
        tracing::debug!(
            device = %self.device,
            action = %request.action,
            direction = %request.direction,
            "processing request"
        );
        match request.action {
            Action::Hang => self.hang(request.direction).map(Outcome::Applied),
            Action::Throttle => self
                .throttle(request.direction, request.limits)
                .map(Outcome::Applied),
            Action::Recover => self.recover(request.direction).map(Outcome::Applied),
            Action::Show => self.show().map(Outcome::Report),
        }
    }

    /// Limits the selected direction(s) to one operation and one byte per second.
    ///
    /// # Errors
    ///
    /// Returns [`DiskctlError::ControlFile`] if a write fails.
    pub fn hang(&self, direction: IoDirection) -> Result<Vec<AppliedLimit>> {
        tracing::info!(device = %self.device, %direction, "hanging device I/O");
        self.apply(direction, ThrottleLimits::hang())
    }

    /// Writes only the supplied limits for the selected direction(s).
    ///
    /// # Errors
    ///
    /// Returns [`DiskctlError::Usage`] if `limits` is empty and
    /// [`DiskctlError::ControlFile`] if a write fails.
    pub fn throttle(
        &self,
        direction: IoDirection,
        limits: ThrottleLimits,
    ) -> Result<Vec<AppliedLimit>> {
        if limits.is_empty() {
            return Err(DiskctlError::Usage {
                message: THROTTLE_NEEDS_LIMIT.into(),
            });
        }
        tracing::info!(device = %self.device, %direction, ?limits, "throttling device I/O");
        self.apply(direction, limits)
    }

    /// Removes iops and bandwidth limits for the selected direction(s).
    ///
    /// # Errors
    ///
    /// Returns [`DiskctlError::ControlFile`] if a write fails.
    pub fn recover(&self, direction: IoDirection) -> Result<Vec<AppliedLimit>> {
        tracing::info!(device = %self.device, %direction, "recovering device I/O");
        self.apply(direction, ThrottleLimits::recover())
    }

    /// Reads the current limits for both directions.
    ///
    /// # Errors
    ///
    /// Returns [`DiskctlError::ControlFile`] if a read fails.
    pub fn show(&self) -> Result<ThrottleReport> {
        let read = self.row(Operation::Read)?;
        let write = self.row(Operation::Write)?;
        Ok(ThrottleReport {
            device: self.device.name().to_string(),
            rows: [read, write],
        })
    }

    fn row(&self, op: Operation) -> Result<ReportRow> {
        let id = self.device.id();
        Ok(ReportRow {
            op,
            iops: self.cgroup.get(op, ControlKind::Iops, id)?,
            bps: self.cgroup.get(op, ControlKind::Bps, id)?,
        })
    }

    fn apply(&self, direction: IoDirection, limits: ThrottleLimits) -> Result<Vec<AppliedLimit>> {
        let id = self.device.id();
        let mut applied = Vec::new();
        for &op in direction.operations() {
            for (kind, limit) in [(ControlKind::Iops, limits.iops), (ControlKind::Bps, limits.bps)] {
                let Some(limit) = limit else { continue };
                self.cgroup.set(op, kind, id, limit)?;
                applied.push(AppliedLimit { op, kind, limit });
            }
        }
        Ok(applied)
    }
}
