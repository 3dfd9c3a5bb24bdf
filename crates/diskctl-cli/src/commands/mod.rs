//! CLI definition and dispatch.

pub mod args;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use diskctl_common::config::DiskctlConfig;
use diskctl_common::constants::{
    BIN_NAME, CGROUP_ROOT_ENV, CONFIG_ENV, EXIT_STATUS_HELP, SYSFS_ROOT_ENV,
};
use diskctl_common::error::DiskctlError;
use diskctl_core::cgroup::BlkioCgroup;
use diskctl_core::controller::{DeviceController, Outcome};
use diskctl_core::device::BlockTopology;

/// Configure cgroup blkio throttling (IOPS and bandwidth) for one disk.
#[derive(Parser, Debug)]
#[command(name = BIN_NAME, version, about, long_about = None, after_help = EXIT_STATUS_HELP)]
pub struct Cli {
    /// Disk to take action on, e.g. sda, vdb (see `lsblk`).
    #[arg(short = 'd', long = "disk", value_name = "DISK")]
    pub disk: Option<String>,

    /// I/O type to take effect: read, write or rw.
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub io_type: Option<String>,

    /// Action: hang (block all I/O), throttle (set iops/bps), recover (remove
    /// limits) or show (print current limits).
    #[arg(short = 'a', long = "action", value_name = "ACTION")]
    pub action: Option<String>,

    /// IOPS limit, only used by `throttle`.
    #[arg(short = 'i', long = "iops", value_name = "IOPS", allow_hyphen_values = true)]
    pub iops: Option<String>,

    /// Bandwidth limit in bytes/s, only used by `throttle`.
    #[arg(short = 'b', long = "bps", value_name = "BYTES", allow_hyphen_values = true)]
    pub bps: Option<String>,

    /// Directory holding the blkio.throttle.* control files.
    #[arg(long, env = CGROUP_ROOT_ENV, value_name = "DIR")]
    pub cgroup_root: Option<PathBuf>,

    /// Directory listing block devices.
    #[arg(long, env = SYSFS_ROOT_ENV, value_name = "DIR")]
    pub sysfs_root: Option<PathBuf>,

    /// JSON configuration file.
    #[arg(long, env = CONFIG_ENV, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

/// Format of the diagnostic log written to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

impl Cli {
    /// Builds the effective configuration: file, then env/flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is unreadable or invalid.
    pub fn resolve_config(&self) -> Result<DiskctlConfig, DiskctlError> {
        let mut config = match &self.config {
            Some(path) => DiskctlConfig::load(path)?,
            None => DiskctlConfig::default(),
        };
        if let Some(root) = &self.cgroup_root {
            config.cgroup_root.clone_from(root);
        }
        if let Some(root) = &self.sysfs_root {
            config.sysfs_block_root.clone_from(root);
        }
        config.validate()?;
        tracing::debug!(?config, "configuration resolved");
        Ok(config)
    }
}

/// Validates the arguments, resolves the disk and runs the action.
///
/// Arguments are fully validated before the disk is looked up, and the
/// disk is looked up before any control file is touched.
///
/// # Errors
///
/// Returns an error wrapping a [`DiskctlError`] if any step fails.
pub fn execute(cli: &Cli) -> anyhow::Result<()> {
    let invocation = args::Invocation::from_cli(cli)?;
    let config = cli.resolve_config()?;

    let topology = BlockTopology::new(&config.sysfs_block_root);
    let device = topology.resolve(&invocation.disk).map_err(|e| match e {
        DiskctlError::DeviceNotFound { name, .. } => DiskctlError::DeviceNotFound {
            name,
            available: topology
                .disks()
                .unwrap_or_default()
                .iter()
                .map(ToString::to_string)
                .collect(),
        },
        other => other,
    })?;

    let controller = DeviceController::new(device, BlkioCgroup::open(&config.cgroup_root));
    let outcome = controller
        .process(&invocation.request)
        .with_context(|| {
            format!(
                "{} {} on {}",
                invocation.request.action,
                invocation.request.direction,
                controller.device()
            )
        })?;

    match outcome {
        Outcome::Report(report) => crate::output::print_report(&report)?,
        Outcome::Applied(applied) => {
            tracing::info!(
                device = %controller.device(),
                action = %invocation.request.action,
                writes = applied.len(),
                "action applied"
            );
        }
    }
    Ok(())
}
