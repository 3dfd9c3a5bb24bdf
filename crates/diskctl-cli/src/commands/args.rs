//! Validation of raw command-line values into a controller request.

use diskctl_common::constants::THROTTLE_NEEDS_LIMIT;
use diskctl_common::error::DiskctlError;
use diskctl_common::types::{Action, IoDirection, Limit, ThrottleLimits};
use diskctl_core::controller::Request;

use super::Cli;

const LACK_OF_PARAMETERS: &str = "Lack of parameters.";

/// A fully validated invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Disk name as given on the command line.
    pub disk: String,
    /// Request for the controller.
    pub request: Request,
}

impl Invocation {
    /// Validates the raw arguments.
    ///
    /// `-d` and `-a` are always required; `-t` is required for every action
    /// except `show`, which reports both directions.
    ///
    /// # Errors
    ///
    /// Returns [`DiskctlError::Usage`] for missing parameters,
    /// [`DiskctlError::InvalidAction`], [`DiskctlError::InvalidDirection`] or
    /// [`DiskctlError::InvalidLimit`] for malformed values.
    pub fn from_cli(cli: &Cli) -> Result<Self, DiskctlError> {
        let lack = || DiskctlError::Usage {
            message: LACK_OF_PARAMETERS.into(),
        };
        let disk = cli.disk.as_deref().filter(|d| !d.is_empty()).ok_or_else(lack)?;
        let action: Action = cli
            .action
            .as_deref()
            .filter(|a| !a.is_empty())
            .ok_or_else(lack)?
            .parse()?;

        let direction = match cli.io_type.as_deref().filter(|t| !t.is_empty()) {
            Some(t) => t.parse()?,
            None if action.is_mutating() => return Err(lack()),
            None => IoDirection::Both,
        };

        let limits = if action == Action::Throttle {
            let limits = ThrottleLimits {
                iops: cli.iops.as_deref().map(|v| Limit::parse_for("-i", v)).transpose()?,
                bps: cli.bps.as_deref().map(|v| Limit::parse_for("-b", v)).transpose()?,
            };
            if limits.is_empty() {
                return Err(DiskctlError::Usage {
                    message: THROTTLE_NEEDS_LIMIT.into(),
                });
            }
            limits
        } else {
            if cli.iops.is_some() || cli.bps.is_some() {
                tracing::warn!(%action, "-i/-b only apply to throttle, ignoring");
            }
            ThrottleLimits::default()
        };

        Ok(Self {
            disk: disk.to_string(),
            request: Request {
                direction,
                action,
                limits,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn parse(args: &[&str]) -> Result<Invocation, DiskctlError> {
        let cli = Cli::try_parse_from(std::iter::once("diskctl").chain(args.iter().copied()))
            .expect("clap parse");
        Invocation::from_cli(&cli)
    }

    fn assert_lack(result: Result<Invocation, DiskctlError>) {
        match result {
            Err(DiskctlError::Usage { message }) => assert_eq!(message, LACK_OF_PARAMETERS),
            other => panic!("expected lack of parameters, got {other:?}"),
        }
    }

    #[test]
    fn single_flag_is_lack_of_parameters() {
        assert_lack(parse(&["-d", "sda"]));
        assert_lack(parse(&["-a", "hang"]));
        assert_lack(parse(&["-t", "rw"]));
        assert_lack(parse(&[]));
    }

    #[test]
    fn mutating_action_requires_type() {
        assert_lack(parse(&["-d", "sda", "-a", "recover"]));
    }

    #[test]
    fn show_defaults_to_both_directions() {
        let inv = parse(&["-d", "sda", "-a", "show"]).expect("valid");
        assert_eq!(inv.request.action, Action::Show);
        assert_eq!(inv.request.direction, IoDirection::Both);
    }

    #[test]
    fn unknown_action_is_rejected() {
        let err = parse(&["-d", "sda", "-t", "rw", "-a", "pause"]).unwrap_err();
        assert!(matches!(err, DiskctlError::InvalidAction { ref value } if value == "pause"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn unknown_type_is_rejected() {
        let err = parse(&["-d", "sda", "-t", "both-ways", "-a", "hang"]).unwrap_err();
        assert!(matches!(err, DiskctlError::InvalidDirection { .. }));
    }

    #[test]
    fn throttle_collects_only_supplied_limits() {
        let inv = parse(&["-d", "vda", "-t", "write", "-a", "throttle", "-b", "1048576"])
            .expect("valid");
        assert_eq!(inv.disk, "vda");
        assert_eq!(inv.request.direction, IoDirection::Write);
        assert_eq!(inv.request.limits.iops, None);
        assert_eq!(inv.request.limits.bps, Some(Limit::Max(1_048_576)));
    }

    #[test]
    fn throttle_without_limits_is_usage_error() {
        let err = parse(&["-d", "vda", "-t", "rw", "-a", "throttle"]).unwrap_err();
        assert!(matches!(err, DiskctlError::Usage { ref message } if message == THROTTLE_NEEDS_LIMIT));
    }

    #[test]
    fn negative_iops_is_rejected() {
        let err = parse(&["-d", "vda", "-t", "rw", "-a", "throttle", "-i", "-5"]).unwrap_err();
        assert!(matches!(err, DiskctlError::InvalidLimit { flag: "-i", .. }));
    }

    #[test]
    fn limits_are_ignored_outside_throttle() {
        let inv = parse(&["-d", "vda", "-t", "rw", "-a", "hang", "-i", "junk"]).expect("valid");
        assert!(inv.request.limits.is_empty());
    }

    #[test]
    fn long_flags_match_short_ones() {
        let inv = parse(&["--disk", "sdb", "--type", "read", "--action", "throttle", "--iops", "10"])
            .expect("valid");
        assert_eq!(inv.disk, "sdb");
        assert_eq!(inv.request.limits.iops, Some(Limit::Max(10)));
    }
}
