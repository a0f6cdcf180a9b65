// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use natura_core::RecordId;

use crate::cli::{ListArgs, OutputFormat};
use crate::display::{format_observation_details, format_observation_line};
use crate::error::Result;
use crate::session::Session;

use super::print_json;

/// Print the latest observations, newest first.
pub async fn list(session: &Session, args: &ListArgs) -> Result<()> {
    let observations = session.observations().list(args.limit).await?;

    match args.format {
        OutputFormat::Text => {
            if observations.is_empty() {
                println!("No observations yet.");
            }
            for obs in &observations {
                println!("{}", format_observation_line(obs));
            }
            Ok(())
        }
        OutputFormat::Json => print_json(&serde_json::to_value(&observations)?),
    }
}

pub async fn show(session: &Session, id: RecordId, format: OutputFormat) -> Result<()> {
    let observation = session.observations().get(id).await?;

    match format {
        OutputFormat::Text => {
            for line in format_observation_details(&observation) {
                println!("{}", line);
            }
            Ok(())
        }
        OutputFormat::Json => print_json(&serde_json::to_value(&observation)?),
    }
}
