// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use natura_core::{Observation, ObservationStats, PushMessage, Species, User};

/// Name to show for an observation's species.
fn species_label(observation: &Observation) -> String {
    match observation.species {
        Some(ref species) => species.common_name.clone(),
        None => format!("species {}", observation.species_id),
    }
}

/// Name to show for an observation's author.
fn author_label(observation: &Observation) -> String {
    match observation.user {
        Some(ref user) => user.username.clone(),
        None => format!("user {}", observation.user_id),
    }
}

/// Format an observation for list display: `#5  Grey heron  2026-04-01  by ada`
pub fn format_observation_line(observation: &Observation) -> String {
    let mut line = format!("#{}  {}", observation.id, species_label(observation));
    if let Some(date) = observation.date_observed {
        line.push_str(&format!("  {}", date.format("%Y-%m-%d")));
    }
    line.push_str(&format!("  by {}", author_label(observation)));
    line
}

/// Format an observation with all known fields.
pub fn format_observation_details(observation: &Observation) -> Vec<String> {
    let mut lines = vec![format!(
        "Observation #{}: {}",
        observation.id,
        species_label(observation)
    )];
    if let Some(ref species) = observation.species {
        lines.push(format!("  Species: {}", format_species_line(species)));
    }
    lines.push(format!("  Observer: {}", author_label(observation)));
    if let Some(date) = observation.date_observed {
        lines.push(format!("  Observed: {}", date.format("%Y-%m-%d %H:%M")));
    }
    if let Some(date) = observation.date_posted {
        lines.push(format!("  Posted: {}", date.format("%Y-%m-%d %H:%M")));
    }
    if let (Some(lat), Some(lon)) = (observation.latitude, observation.longitude) {
        lines.push(format!("  Location: {:.5}, {:.5}", lat, lon));
    }
    if let Some(ref url) = observation.image_url {
        lines.push(format!("  Image: {}", url));
    }
    if let Some(ref body) = observation.body {
        if !body.is_empty() {
            lines.push(String::new());
            lines.extend(body.lines().map(|l| format!("    {}", l)));
        }
    }
    lines
}

/// Format a species: `#10  Grey heron (Ardea cinerea)`
pub fn format_species_line(species: &Species) -> String {
    format!(
        "#{}  {} ({})",
        species.id, species.common_name, species.scientific_name
    )
}

/// Format a species with its taxonomy.
pub fn format_species_details(species: &Species) -> Vec<String> {
    let mut lines = vec![format_species_line(species)];
    let ranks = [
        ("Phylum", &species.phylum),
        ("Class", &species.class),
        ("Order", &species.order),
        ("Family", &species.family),
    ];
    for (rank, value) in ranks {
        if let Some(value) = value {
            lines.push(format!("  {}: {}", rank, value));
        }
    }
    if let Some(ref description) = species.description {
        lines.push(String::new());
        lines.push(format!("    {}", description));
    }
    lines
}

pub fn format_user_line(user: &User) -> String {
    match user.email {
        Some(ref email) => format!("#{}  {} <{}>", user.id, user.username, email),
        None => format!("#{}  {}", user.id, user.username),
    }
}

/// `3 observations, 2 species`
pub fn format_stats(stats: &ObservationStats) -> String {
    let noun = if stats.total_observations == 1 {
        "observation"
    } else {
        "observations"
    };
    format!(
        "{} {}, {} species",
        stats.total_observations, noun, stats.unique_species_observed
    )
}

/// Format a push event, marked `+` created, `~` updated, `-` deleted.
pub fn format_event(message: &PushMessage<Observation>) -> String {
    match message {
        PushMessage::Created { record } => format!("+ {}", format_observation_line(record)),
        PushMessage::Updated { record } => format!("~ {}", format_observation_line(record)),
        PushMessage::Deleted { id } => format!("- #{}", id),
    }
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
