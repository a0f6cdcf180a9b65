// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use natura_core::{ObservationStats, RecordId};
use serde_json::json;

use crate::cli::OutputFormat;
use crate::display::{format_observation_line, format_stats, format_user_line};
use crate::error::Result;
use crate::session::Session;

use super::print_json;

/// Print a user's profile, totals, and observations.
pub async fn run(session: &Session, id: RecordId, format: OutputFormat) -> Result<()> {
    let user = session.users().get(id).await?;
    let observations = session.observations().list_for_user(id).await?;
    let stats = ObservationStats::for_user(&observations, id);

    match format {
        OutputFormat::Text => {
            println!("{}", format_user_line(&user));
            println!("  {}", format_stats(&stats));
            if !observations.is_empty() {
                println!();
            }
            for obs in &observations {
                println!("{}", format_observation_line(obs));
            }
            Ok(())
        }
        OutputFormat::Json => print_json(&json!({
            "user": user,
            "stats": stats,
            "observations": observations,
        })),
    }
}
