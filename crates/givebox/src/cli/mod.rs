//! Command-line interface for givebox.
//!
//! This module provides the CLI structure for the `givebox` binary.

mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub use commands::{
    CampaignAddCommand, CampaignCommand, CampaignListCommand, CampaignUpdateCommand,
    ConfigCommand, DonateCommand, DonationCommand, DonationStatusArg, OutputFormat,
    PaymentMethodArg, SortArg, TransparencyCommand, VolunteerCommand, VolunteerListCommand,
    VolunteerSignupCommand,
};

/// givebox - Browse campaigns and record donations locally
///
/// Browse fundraising campaigns, make simulated donations, and review your
/// giving history, tax benefit and impact. Everything is kept in a local
/// database.
#[derive(Debug, Parser)]
#[command(name = "givebox")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse and manage campaigns
    #[command(subcommand)]
    Campaigns(CampaignCommand),

    /// Make a donation
    Donate(DonateCommand),

    /// Review recorded donations
    #[command(subcommand)]
    Donations(DonationCommand),

    /// Show the donor dashboard
    Dashboard(JsonFlag),

    /// Browse volunteer opportunities and sign up
    #[command(subcommand)]
    Volunteer(VolunteerCommand),

    /// Show the transparency ledger
    Transparency(TransparencyCommand),

    /// Estimate the 80G tax benefit for an amount
    Tax {
        /// Donation amount
        amount: u64,
    },

    /// Show what a donation buys
    Impact {
        /// Donation amount (shows the impact table when omitted)
        amount: Option<u64>,
    },

    /// Show store status
    Status(JsonFlag),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Clear all donations and restore the built-in campaigns
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// A lone `--json` switch.
#[derive(Debug, Args)]
pub struct JsonFlag {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }

    /// The file `config validate` should check, or `None` for any other
    /// command.
    ///
    /// `--file` wins over the global `--config`, which wins over the default
    /// config path.
    #[must_use]
    pub fn validation_target(&self) -> Option<PathBuf> {
        match &self.command {
            Command::Config(ConfigCommand::Validate { file }) => Some(
                file.clone()
                    .or_else(|| self.config.clone())
                    .unwrap_or_else(crate::config::Config::default_config_path),
            ),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn cli(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Status(JsonFlag { json: false }),
        }
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "givebox");
    }

    #[test]
    fn test_verbosity_levels() {
        use crate::logging::Verbosity;
        assert_eq!(cli(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli(3, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(cli(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(cli(2, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_campaigns_list() {
        let cli = Cli::try_parse_from([
            "givebox", "campaigns", "list", "--search", "water", "--sort", "urgent",
        ])
        .unwrap();
        let Command::Campaigns(CampaignCommand::List(list)) = cli.command else {
            panic!("expected campaigns list");
        };
        assert_eq!(list.search.as_deref(), Some("water"));
        assert_eq!(list.sort, SortArg::Urgent);
        assert_eq!(list.format, OutputFormat::Table);
    }

    #[test]
    fn test_parse_donate() {
        let cli = Cli::try_parse_from([
            "givebox", "donate", "-a", "2500", "-n", "Asha", "-e", "asha@example.org",
            "--campaign", "2", "--method", "card", "--anonymous",
        ])
        .unwrap();
        let Command::Donate(donate) = cli.command else {
            panic!("expected donate");
        };
        assert_eq!(donate.amount, 2_500);
        assert_eq!(donate.campaign.as_deref(), Some("2"));
        assert_eq!(donate.method, PaymentMethodArg::Card);
        assert!(donate.anonymous);
    }

    #[test]
    fn test_parse_donate_default_amount() {
        let cli =
            Cli::try_parse_from(["givebox", "donate", "-n", "Asha", "-e", "a@b.co"]).unwrap();
        let Command::Donate(donate) = cli.command else {
            panic!("expected donate");
        };
        assert_eq!(donate.amount, crate::donation::DEFAULT_AMOUNT);
        assert_eq!(donate.method, PaymentMethodArg::Upi);
    }

    #[test]
    fn test_parse_donation_status() {
        let cli =
            Cli::try_parse_from(["givebox", "donations", "status", "DN1", "failed"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Donations(DonationCommand::Status {
                status: DonationStatusArg::Failed,
                ..
            })
        ));
    }

    #[test]
    fn test_parse_update_rejects_conflicting_dates() {
        let result = Cli::try_parse_from([
            "givebox", "campaigns", "update", "1", "--end-date", "2025-01-01",
            "--clear-end-date",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_tax_and_impact() {
        let cli = Cli::try_parse_from(["givebox", "tax", "1000"]).unwrap();
        assert!(matches!(cli.command, Command::Tax { amount: 1_000 }));

        let cli = Cli::try_parse_from(["givebox", "impact"]).unwrap();
        assert!(matches!(cli.command, Command::Impact { amount: None }));
    }

    #[test]
    fn test_parse_with_config() {
        let cli = Cli::try_parse_from(["givebox", "-c", "/custom/config.toml", "status"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_with_verbose_and_quiet() {
        let cli = Cli::try_parse_from(["givebox", "-v", "dashboard"]).unwrap();
        assert_eq!(cli.verbose, 1);

        let cli = Cli::try_parse_from(["givebox", "-q", "status"]).unwrap();
        assert!(cli.quiet);
    }

    #[test]
    fn test_parse_volunteer_list() {
        let cli = Cli::try_parse_from([
            "givebox", "volunteer", "list", "--skill", "teaching", "--urgent", "-l", "Pune",
        ])
        .unwrap();
        let Command::Volunteer(VolunteerCommand::List(list)) = cli.command else {
            panic!("expected volunteer list");
        };
        assert_eq!(list.skill.as_deref(), Some("teaching"));
        assert_eq!(list.location.as_deref(), Some("Pune"));
        assert!(list.urgent);
        assert!(!list.open);
    }

    #[test]
    fn test_parse_volunteer_signup() {
        let cli = Cli::try_parse_from([
            "givebox", "volunteer", "signup", "3", "-n", "Meera", "-e", "meera@example.org",
        ])
        .unwrap();
        let Command::Volunteer(VolunteerCommand::Signup(signup)) = cli.command else {
            panic!("expected volunteer signup");
        };
        assert_eq!(signup.id, 3);
        assert_eq!(signup.form().email, "meera@example.org");

        let missing_email =
            Cli::try_parse_from(["givebox", "volunteer", "signup", "3", "-n", "Meera"]);
        assert!(missing_email.is_err());
    }

    #[test]
    fn test_validation_target() {
        let cli = Cli::try_parse_from(["givebox", "-c", "/etc/bad.toml", "config", "validate"])
            .unwrap();
        assert_eq!(cli.validation_target(), Some(PathBuf::from("/etc/bad.toml")));

        let cli = Cli::try_parse_from([
            "givebox", "-c", "/etc/bad.toml", "config", "validate", "--file", "/tmp/other.toml",
        ])
        .unwrap();
        assert_eq!(cli.validation_target(), Some(PathBuf::from("/tmp/other.toml")));

        let cli = Cli::try_parse_from(["givebox", "config", "validate"]).unwrap();
        assert_eq!(
            cli.validation_target(),
            Some(crate::config::Config::default_config_path())
        );

        let cli = Cli::try_parse_from(["givebox", "-c", "/etc/bad.toml", "config", "show"]).unwrap();
        assert_eq!(cli.validation_target(), None);
    }

    #[test]
    fn test_parse_reset() {
        let cli = Cli::try_parse_from(["givebox", "reset", "--yes"]).unwrap();
        assert!(matches!(cli.command, Command::Reset { yes: true }));
    }
}
