//! CLI command definitions and dispatch for the `lexchat` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod config;
pub mod history;
pub mod key;
pub mod serve;

use clap::{Parser, Subcommand};

use lexchat_types::identity::OwnerId;

/// Legal-assistant chat proxy in front of an OpenAI-compatible endpoint.
#[derive(Parser)]
#[command(name = "lexchat", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Print only results and errors, without banners or decoration.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Also export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// `--json` wins over `--quiet`.
    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.quiet {
            OutputMode::Quiet
        } else {
            OutputMode::Styled
        }
    }
}

/// How commands render their results on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Styled,
    Json,
    /// Bare results: no banners, headings or colour.
    Quiet,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(long, default_value = "3000", env = "LEXCHAT_PORT")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1", env = "LEXCHAT_HOST")]
        host: String,
    },

    /// Manage API keys.
    Key {
        #[command(subcommand)]
        command: KeyCommand,
    },

    /// Print an owner's stored conversation, oldest first.
    History {
        /// Owner id the conversation belongs to.
        #[arg(long)]
        owner: OwnerId,

        /// Maximum number of messages to show.
        #[arg(long, default_value = "20")]
        limit: u32,
    },

    /// Show the effective configuration.
    Config,
}

#[derive(Subcommand)]
pub enum KeyCommand {
    /// Issue a new API key. The key is printed once and never stored.
    Create {
        /// Owner the key acts for; a new owner is created when omitted.
        #[arg(long)]
        owner: Option<OwnerId>,

        /// Label to remember the key by.
        #[arg(long, default_value = "default")]
        name: String,
    },
}
