//! Terminal output for the CLI.
//!
//! The `show` report goes to stdout; errors, usage text and hints go to
//! stderr.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::CommandFactory;
use diskctl_common::error::DiskctlError;
use diskctl_core::report::ThrottleReport;

use crate::commands::Cli;

/// Prints the `show` report on stdout.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub fn print_report(report: &ThrottleReport) -> io::Result<()> {
    let mut out = io::stdout().lock();
    write!(out, "{report}")?;
    out.flush()
}

/// Prints an error on stderr and returns the matching exit code.
pub fn report_error(err: &anyhow::Error) -> ExitCode {
    let _ = write_error(&mut io::stderr().lock(), err);
    ExitCode::from(exit_status(err))
}

/// Writes the error line, then what helps recover from it: the help text
/// for usage errors, the known disks for an unknown one.
fn write_error(out: &mut impl Write, err: &anyhow::Error) -> io::Result<()> {
    writeln!(out, "Error! {err:#}")?;
    match err.downcast_ref::<DiskctlError>() {
        Some(e) if e.is_usage() => writeln!(out, "{}", Cli::command().render_help()),
        Some(DiskctlError::DeviceNotFound { available, .. }) if !available.is_empty() => {
            writeln!(out, "Available disks: {}", available.join(", "))
        }
        _ => Ok(()),
    }
}

fn exit_status(err: &anyhow::Error) -> u8 {
    let code = err
        .downcast_ref::<DiskctlError>()
        .map_or(1, DiskctlError::exit_code);
    u8::try_from(code).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_status_follows_domain_error() {
        let usage: anyhow::Error = DiskctlError::InvalidAction {
            value: "pause".into(),
        }
        .into();
        assert_eq!(exit_status(&usage), 1);

        let denied: anyhow::Error = DiskctlError::ControlFile {
            op: "write",
            path: "/cg/blkio.throttle.read_iops_device".into(),
            source: io::Error::from_raw_os_error(13),
        }
        .into();
        assert_eq!(exit_status(&denied), 13);

        let wrapped = anyhow::Error::from(DiskctlError::ControlFile {
            op: "read",
            path: "/cg/blkio.throttle.write_bps_device".into(),
            source: io::Error::from_raw_os_error(2),
        })
        .context("show rw on sda (8:0)");
        assert_eq!(exit_status(&wrapped), 2);

        let other = anyhow::anyhow!("stdout closed");
        assert_eq!(exit_status(&other), 1);
    }

    fn rendered(err: DiskctlError) -> String {
        let mut out = Vec::new();
        write_error(&mut out, &err.into()).expect("write");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn disk_hint_follows_the_error_line() {
        let text = rendered(DiskctlError::DeviceNotFound {
            name: "sdq".into(),
            available: vec!["sda (8:0)".into(), "vda (253:0)".into()],
        });
        assert_eq!(
            text,
            "Error! disk not found: sdq\nAvailable disks: sda (8:0), vda (253:0)\n"
        );
    }

    #[test]
    fn no_hint_without_known_disks() {
        let text = rendered(DiskctlError::DeviceNotFound {
            name: "sdq".into(),
            available: Vec::new(),
        });
        assert_eq!(text, "Error! disk not found: sdq\n");
    }

    #[test]
    fn usage_errors_print_help_after_the_error() {
        let text = rendered(DiskctlError::InvalidAction {
            value: "pause".into(),
        });
        assert!(text.starts_with("Error! Invalid action type: pause\n"));
        assert!(text.contains("Usage:"));
    }
}
