// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use natura_client::api::DEFAULT_FEED_LIMIT;
use natura_core::RecordId;

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

const QUICKSTART_HELP: &str = "\
Get started:
  natura feed                      Latest observations
  natura species search heron      Find a species
  natura -u ada watch --user 1     Follow the feed live (password from NATURA_PASSWORD)";

#[derive(Parser, Debug)]
#[command(name = "natura")]
#[command(about = "Command-line client for the natura wildlife observation platform")]
#[command(after_help = QUICKSTART_HELP)]
pub struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/natura/config.toml)
    #[arg(long, global = true, env = "NATURA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Backend URL, overriding the config file
    #[arg(long, global = true, env = "NATURA_URL")]
    pub base_url: Option<String>,

    /// Log in as this user first; the password is read from NATURA_PASSWORD
    #[arg(long, short, global = true, env = "NATURA_USERNAME")]
    pub username: Option<String>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Page size and output format shared by listing commands.
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Maximum number of results
    #[arg(long, short = 'n', default_value_t = DEFAULT_FEED_LIMIT)]
    pub limit: usize,

    /// Output format (text, json)
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the latest observations
    Feed {
        #[command(flatten)]
        list: ListArgs,
    },

    /// Show one observation
    Show {
        /// Observation ID
        id: RecordId,

        /// Output format (text, json)
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a user's observations and statistics
    User {
        /// User ID
        id: RecordId,

        /// Output format (text, json)
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Browse the species catalogue
    #[command(subcommand)]
    Species(SpeciesCommand),

    /// Show the logged-in user
    Whoami,

    /// Follow the observation feed live
    #[command(after_help = "Examples:\n  \
        natura watch                     Print feed changes as they happen\n  \
        natura -u ada watch --user 1     Also print user 1's running totals\n  \
        natura watch --resync 300        Re-read the whole feed every 5 minutes")]
    Watch {
        /// Size of the initial snapshot
        #[arg(long, short = 'n', default_value_t = DEFAULT_FEED_LIMIT)]
        limit: usize,

        /// Print this user's statistics after every change
        #[arg(long)]
        user: Option<RecordId>,

        /// Re-read the full feed every N seconds to cover missed events
        #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
        resync: Option<u64>,
    },

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum SpeciesCommand {
    /// Most observed species
    Popular {
        #[command(flatten)]
        list: ListArgs,
    },

    /// Search species by name
    Search {
        /// Name or part of a name
        query: String,

        /// Also look up and import unknown species upstream
        #[arg(long)]
        find: bool,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Show one species
    Show {
        /// Species ID
        id: RecordId,

        /// Output format (text, json)
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Print the config file location
    Path,

    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
