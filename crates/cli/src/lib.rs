// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! natura - command-line client for the natura observation platform.
//!
//! Every command except `config` and `completion` opens a [`Session`]: an
//! HTTP client with transparent credential refresh plus, for `watch`, a
//! push channel riding the same cookies. `watch` keeps a reconciled copy of
//! the feed up to date from the snapshot and the event stream.

mod cli;
mod commands;
mod display;
pub mod error;
mod session;

pub use cli::{Cli, Command, ConfigCommand, ListArgs, OutputFormat, SpeciesCommand};
pub use error::{Error, Result};
pub use session::{Session, PASSWORD_ENV};

use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use natura_client::ClientConfig;

/// Run a parsed command line to completion.
pub async fn run(cli: Cli) -> Result<()> {
    let Cli {
        config,
        base_url,
        username,
        command,
        ..
    } = cli;

    match command {
        Command::Config(cmd) => commands::config::run(cmd, config.as_deref(), base_url.as_deref()),
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "natura", &mut std::io::stdout());
            Ok(())
        }
        command => {
            let client_config = load_config(config.as_deref(), base_url.as_deref())?;
            let session = Session::open(client_config, username.as_deref()).await?;
            run_online(&session, command).await
        }
    }
}

async fn run_online(session: &Session, command: Command) -> Result<()> {
    match command {
        Command::Feed { list } => commands::feed::list(session, &list).await,
        Command::Show { id, format } => commands::feed::show(session, id, format).await,
        Command::User { id, format } => commands::user::run(session, id, format).await,
        Command::Species(cmd) => commands::species::run(session, cmd).await,
        Command::Whoami => commands::whoami::run(session).await,
        Command::Watch {
            limit,
            user,
            resync,
        } => commands::watch::run(session, limit, user, resync).await,
        Command::Config(_) | Command::Completion { .. } => Ok(()),
    }
}

/// Load the config file and apply the command-line URL override.
pub(crate) fn load_config(path: Option<&Path>, base_url: Option<&str>) -> Result<ClientConfig> {
    let mut config = ClientConfig::load_or_default(path)?;
    if let Some(url) = base_url {
        config.base_url = url.to_string();
        config.validate()?;
    }
    Ok(config)
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
