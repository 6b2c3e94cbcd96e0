// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! CLI argument definitions using clap.

use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

/// RK - Declarative record validation
///
/// Validates JSON and YAML records against rule documents.
#[derive(Parser, Debug)]
#[command(name = "rk")]
#[command(author = "Eshan Roy")]
#[command(version)]
#[command(about = "Validate records against declarative rule documents", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// The command to run
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Output format for machine-readable output
    #[arg(long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "RK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Output format for CI and scripting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text output (default)
    Text,
    /// JSON output for machine parsing
    Json,
}

/// Available commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Validate records against a rule set
    Validate(ValidateArgs),

    /// Load a rule set and list its rules
    Check(CheckArgs),

    /// Manage stored rule documents
    Rules(RulesArgs),

    /// Initialize rk configuration
    Init(InitArgs),

    /// Print version information
    Version,
}

/// Arguments for the validate command.
#[derive(Parser, Debug, Clone)]
#[command(group(ArgGroup::new("source").required(true).args(["rules", "kind"])))]
pub struct ValidateArgs {
    /// Record files (.json, .yml or .yaml)
    #[arg(required = true, value_name = "RECORD")]
    pub records: Vec<PathBuf>,

    /// Rule-set identifier to validate against
    #[arg(short, long, value_name = "ID")]
    pub rules: Option<String>,

    /// Record kind, mapped to a rule set through [registry]
    #[arg(short, long)]
    pub kind: Option<String>,
}

/// Arguments for the check command.
#[derive(Parser, Debug, Clone)]
pub struct CheckArgs {
    /// Rule-set identifier
    #[arg(value_name = "ID")]
    pub id: String,
}

/// Arguments for the rules command.
#[derive(Parser, Debug, Clone)]
pub struct RulesArgs {
    #[command(subcommand)]
    pub action: RulesAction,
}

/// Rule document actions.
#[derive(Subcommand, Debug, Clone)]
pub enum RulesAction {
    /// List stored rule documents
    List,

    /// Print a rule document
    Show {
        /// Document name
        name: String,
    },

    /// Store a rule document, replacing any existing one
    Save {
        /// Document name
        name: String,

        /// File to read the document from
        file: PathBuf,
    },

    /// Delete a rule document
    Delete {
        /// Document name
        name: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Arguments for the init command.
#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,
}
