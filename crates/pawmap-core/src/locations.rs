//! Dog-friendly location records and the YAML file they are loaded from.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Size class of a location's dog area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParkSize {
    Small,
    Medium,
    Large,
}

impl std::fmt::Display for ParkSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParkSize::Small => write!(f, "small"),
            ParkSize::Medium => write!(f, "medium"),
            ParkSize::Large => write!(f, "large"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Facility flags and amenities of a location.
///
/// Facility flags missing from the source default to `false`, so a record
/// that does not mention a facility never satisfies a filter requiring it.
/// The leash flag stays optional because `false` is itself a filterable value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationFeatures {
    #[serde(default)]
    pub night_lighting: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leash_required: Option<bool>,
    #[serde(default)]
    pub fenced_area: bool,
    #[serde(default)]
    pub waste_stations: bool,
    #[serde(default)]
    pub water_fountain: bool,
    #[serde(default)]
    pub parking: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<ParkSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface_type: Option<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
}

/// One candidate location. Treated as immutable by the filter evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub coordinates: Coordinates,
    /// Average visitor rating, `0.0..=5.0`.
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<String>,
    #[serde(default)]
    pub rules: Vec<String>,
    #[serde(default)]
    pub features: LocationFeatures,
    /// Distance from the caller's reference point in kilometres, precomputed
    /// by whoever supplies the record. Never derived from `coordinates` here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl LocationRecord {
    /// Returns a copy of the record carrying a precomputed distance.
    #[must_use]
    pub fn with_distance_km(mut self, distance_km: f64) -> Self {
        self.distance_km = Some(distance_km);
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationsFile {
    pub locations: Vec<LocationRecord>,
}

impl LocationsFile {
    /// Look up a location by its id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&LocationRecord> {
        self.locations.iter().find(|l| l.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

/// Load and validate the candidate locations from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_locations(path: &Path) -> Result<LocationsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LocationsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let locations_file: LocationsFile =
        serde_yaml::from_str(&content).map_err(ConfigError::LocationsFileParse)?;

    validate_locations(&locations_file)?;

    tracing::debug!(
        path = %path.display(),
        count = locations_file.locations.len(),
        "loaded locations"
    );

    Ok(locations_file)
}

/// Reject records the evaluator should never see.
///
/// # Errors
///
/// Returns `ConfigError::Validation` describing the first offending record.
pub fn validate_locations(locations_file: &LocationsFile) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for location in &locations_file.locations {
        if location.id.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "location '{}' has an empty id",
                location.name
            )));
        }

        if location.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "location '{}' has an empty name",
                location.id
            )));
        }

        if !seen_ids.insert(location.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate location id: '{}'",
                location.id
            )));
        }

        let Coordinates { lat, lng } = location.coordinates;
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(ConfigError::Validation(format!(
                "location '{}' has invalid latitude {lat}",
                location.id
            )));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(ConfigError::Validation(format!(
                "location '{}' has invalid longitude {lng}",
                location.id
            )));
        }

        if !location.rating.is_finite() || !(0.0..=5.0).contains(&location.rating) {
            return Err(ConfigError::Validation(format!(
                "location '{}' has invalid rating {}; must be between 0 and 5",
                location.id, location.rating
            )));
        }

        if let Some(distance) = location.distance_km {
            if !distance.is_finite() || distance < 0.0 {
                return Err(ConfigError::Validation(format!(
                    "location '{}' has invalid distance {distance}",
                    location.id
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "locations_test.rs"]
mod tests;
