// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::{Path, PathBuf};

use natura_client::ClientConfig;

use crate::cli::ConfigCommand;
use crate::error::{Error, Result};

/// Execute a config subcommand. None of these touch the network.
pub fn run(cmd: ConfigCommand, path: Option<&Path>, base_url: Option<&str>) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let config = crate::load_config(path, base_url)?;
            print!("{}", render(&config)?);
            Ok(())
        }
        ConfigCommand::Path => {
            println!("{}", resolve_path(path)?.display());
            Ok(())
        }
        ConfigCommand::Init { force } => {
            let path = resolve_path(path)?;
            init(&path, base_url, force)?;
            println!("Wrote {}", path.display());
            Ok(())
        }
    }
}

/// Explicit path, else the platform default.
pub(crate) fn resolve_path(path: Option<&Path>) -> Result<PathBuf> {
    path.map(Path::to_path_buf)
        .or_else(ClientConfig::default_path)
        .ok_or(Error::NoConfigDir)
}

pub(crate) fn render(config: &ClientConfig) -> Result<String> {
    Ok(toml::to_string_pretty(config)?)
}

/// Write a default config to `path`, keeping any URL override.
pub(crate) fn init(path: &Path, base_url: Option<&str>, force: bool) -> Result<ClientConfig> {
    if path.exists() && !force {
        return Err(Error::ConfigExists(path.to_path_buf()));
    }
    let mut config = ClientConfig::default();
    if let Some(url) = base_url {
        config.base_url = url.to_string();
        config.validate()?;
    }
    config.save(path)?;
    Ok(config)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
