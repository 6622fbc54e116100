//! CLI command definitions.
//!
//! This module defines the arguments of every `guestlog` subcommand.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::record::{SignInRequest, VisitReason};

/// Sign-in command arguments.
#[derive(Debug, Args)]
pub struct SignInCommand {
    /// Guest's first name
    #[arg(long = "first", value_name = "NAME")]
    pub first_name: String,

    /// Guest's last name
    #[arg(long = "last", value_name = "NAME")]
    pub last_name: String,

    /// Organization or institution
    #[arg(short, long)]
    pub agency: String,

    /// Reason for the visit
    #[arg(short, long, value_enum)]
    pub reason: ReasonArg,

    /// Details when the reason is "other"
    #[arg(short, long, default_value = "")]
    pub details: String,

    /// Print the new record as JSON
    #[arg(short, long)]
    pub json: bool,
}

impl SignInCommand {
    /// Build the ledger request from the parsed arguments.
    #[must_use]
    pub fn to_request(&self) -> SignInRequest {
        SignInRequest {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            agency: self.agency.clone(),
            reason: self.reason.into(),
            other_details: self.details.clone(),
        }
    }
}

/// Sign-out command arguments.
#[derive(Debug, Args)]
pub struct SignOutCommand {
    /// Full name used at sign-in (words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub name: Vec<String>,

    /// Print the closed record as JSON
    #[arg(short, long)]
    pub json: bool,
}

impl SignOutCommand {
    /// The full name as one string.
    #[must_use]
    pub fn full_name(&self) -> String {
        self.name.join(" ")
    }
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Only show visits whose name, agency, reason or details contain this text
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Only show guests currently signed in
    #[arg(short, long)]
    pub open: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Export command arguments.
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Write the CSV to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Clear command arguments.
#[derive(Debug, Args)]
pub struct ClearCommand {
    /// Confirm deleting every visit
    #[arg(short, long)]
    pub yes: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Visit reason argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReasonArg {
    /// Scheduled meeting
    Meeting,
    /// Delivery or pickup
    Delivery,
    /// Job interview
    Interview,
    /// Something else (requires --details)
    Other,
}

impl From<ReasonArg> for VisitReason {
    fn from(arg: ReasonArg) -> Self {
        match arg {
            ReasonArg::Meeting => Self::Meeting,
            ReasonArg::Delivery => Self::Delivery,
            ReasonArg::Interview => Self::Interview,
            ReasonArg::Other => Self::Other,
        }
    }
}

/// Output format for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns
    #[default]
    Table,
    /// JSON array
    Json,
    /// CSV in export format
    Csv,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_arg_conversion() {
        assert_eq!(VisitReason::from(ReasonArg::Meeting), VisitReason::Meeting);
        assert_eq!(VisitReason::from(ReasonArg::Delivery), VisitReason::Delivery);
        assert_eq!(VisitReason::from(ReasonArg::Interview), VisitReason::Interview);
        assert_eq!(VisitReason::from(ReasonArg::Other), VisitReason::Other);
    }

    #[test]
    fn test_sign_in_to_request() {
        let cmd = SignInCommand {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            agency: "Acme".to_string(),
            reason: ReasonArg::Other,
            details: "Audit".to_string(),
            json: false,
        };
        let request = cmd.to_request();
        assert_eq!(request.reason, VisitReason::Other);
        assert_eq!(request.other_details, "Audit");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_sign_out_full_name() {
        let cmd = SignOutCommand {
            name: vec!["Jane".to_string(), "Doe".to_string()],
            json: false,
        };
        assert_eq!(cmd.full_name(), "Jane Doe");
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }
}
