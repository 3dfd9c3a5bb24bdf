//! # diskctl-core
//!
//! Block I/O throttling primitives for diskctl.
//!
//! This crate provides:
//! - **Topology**: resolving a disk name to its `major:minor` identifier by
//!   reading sysfs directly.
//! - **Cgroup blkio**: reading and writing the
//!   `blkio.throttle.{read,write}_{iops,bps}_device` control files.
//! - **Controller**: the hang, throttle, recover and show actions.
//! - **Report**: the fixed-width table printed by `show`.

pub mod cgroup;
pub mod controller;
pub mod device;
pub mod report;
