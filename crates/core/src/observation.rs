// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Domain records served by the observation platform.
//!
//! Field names follow the backend's camelCase JSON. Unknown fields are
//! ignored on decode so the client tolerates additive server changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::record::{Record, RecordId};

/// A registered user, as embedded in observations and returned by the auth
/// endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: RecordId,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<DateTime<Utc>>,
}

impl Record for User {
    fn id(&self) -> RecordId {
        self.id
    }
}

/// A species from the platform's taxonomy catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Species {
    pub id: RecordId,
    pub common_name: String,
    pub scientific_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phylum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Record for Species {
    fn id(&self) -> RecordId {
        self.id
    }
}

/// A single sighting of a species by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub id: RecordId,
    pub species_id: RecordId,
    pub user_id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_observed: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_posted: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Embedded species, when the endpoint expands it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species: Option<Species>,
    /// Embedded author, when the endpoint expands it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl Observation {
    /// Creates a bare observation with only the required fields set.
    pub fn new(id: RecordId, species_id: RecordId, user_id: RecordId) -> Self {
        Observation {
            id,
            species_id,
            user_id,
            body: None,
            date_observed: None,
            date_posted: None,
            latitude: None,
            longitude: None,
            image_url: None,
            species: None,
            user: None,
        }
    }
}

impl Record for Observation {
    fn id(&self) -> RecordId {
        self.id
    }
}

/// Request body for the JSON observation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewObservation {
    pub species_id: RecordId,
    #[serde(default)]
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_observed: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl NewObservation {
    pub fn new(species_id: RecordId) -> Self {
        NewObservation {
            species_id,
            body: String::new(),
            date_observed: None,
            latitude: None,
            longitude: None,
        }
    }

    /// Checks coordinates are inside WGS84 bounds.
    pub fn validate(&self) -> Result<()> {
        validate_coordinates(self.latitude, self.longitude)
    }
}

/// Partial update for an observation. Absent fields are left untouched by
/// the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_observed: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl ObservationPatch {
    /// Returns true if the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self == &ObservationPatch::default()
    }

    pub fn validate(&self) -> Result<()> {
        validate_coordinates(self.latitude, self.longitude)
    }
}

fn validate_coordinates(latitude: Option<f64>, longitude: Option<f64>) -> Result<()> {
    if let Some(value) = latitude {
        check_range("latitude", value, -90.0, 90.0)?;
    }
    if let Some(value) = longitude {
        check_range("longitude", value, -180.0, 180.0)?;
    }
    Ok(())
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<()> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidCoordinate {
            field,
            value,
            min,
            max,
        })
    }
}

/// Per-user counters derived from a feed of observations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationStats {
    pub total_observations: usize,
    pub unique_species_observed: usize,
}

impl ObservationStats {
    /// Counts the observations authored by `user_id` and the distinct
    /// species among them.
    pub fn for_user<'a, I>(observations: I, user_id: RecordId) -> Self
    where
        I: IntoIterator<Item = &'a Observation>,
    {
        let mut total = 0;
        let mut species = HashSet::new();
        for obs in observations.into_iter().filter(|o| o.user_id == user_id) {
            total += 1;
            species.insert(obs.species_id);
        }
        ObservationStats {
            total_observations: total,
            unique_species_observed: species.len(),
        }
    }
}

#[cfg(test)]
#[path = "observation_tests.rs"]
mod tests;
