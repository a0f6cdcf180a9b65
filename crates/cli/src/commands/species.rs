// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use natura_core::Species;

use crate::cli::{OutputFormat, SpeciesCommand};
use crate::display::{format_species_details, format_species_line};
use crate::error::Result;
use crate::session::Session;

use super::print_json;

/// Execute a species subcommand.
pub async fn run(session: &Session, cmd: SpeciesCommand) -> Result<()> {
    let api = session.species();
    match cmd {
        SpeciesCommand::Popular { list } => {
            let species = api.popular(list.limit).await?;
            print_list(&species, list.format)
        }
        SpeciesCommand::Search { query, find, list } => {
            let species = if find {
                api.find(&query, list.limit).await?
            } else {
                api.search(&query, list.limit).await?
            };
            if species.is_empty() && !find && list.format == OutputFormat::Text {
                println!("No species match '{}'. Try --find to look upstream.", query);
                return Ok(());
            }
            print_list(&species, list.format)
        }
        SpeciesCommand::Show { id, format } => {
            let species = api.get(id).await?;
            match format {
                OutputFormat::Text => {
                    for line in format_species_details(&species) {
                        println!("{}", line);
                    }
                    Ok(())
                }
                OutputFormat::Json => print_json(&serde_json::to_value(&species)?),
            }
        }
    }
}

fn print_list(species: &[Species], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            if species.is_empty() {
                println!("No species found.");
            }
            for s in species {
                println!("{}", format_species_line(s));
            }
            Ok(())
        }
        OutputFormat::Json => print_json(&serde_json::to_value(species)?),
    }
}
