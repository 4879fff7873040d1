//! Sparse filter model and the rule that selects matching locations.
//!
//! Every predicate in [`FilterOptions`] is optional. A predicate that is not
//! set imposes no constraint; all set predicates must hold for a record to be
//! kept. Evaluation is pure: records are borrowed, never mutated, and the
//! output preserves input order.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::locations::{LocationFeatures, LocationRecord, ParkSize};

/// Leash constraint. `None` in [`FilterOptions::leash_required`] means no
/// constraint at all, which is distinct from [`LeashRule::Optional`].
///
/// Serialized as a boolean: `true` for required, `false` for optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "bool", into = "bool")]
pub enum LeashRule {
    /// The location must require dogs on leash.
    Required,
    /// The location must explicitly allow dogs off leash.
    Optional,
}

impl LeashRule {
    /// The record leash flag this rule demands.
    #[must_use]
    pub fn expected_flag(self) -> bool {
        matches!(self, LeashRule::Required)
    }
}

impl From<bool> for LeashRule {
    fn from(required: bool) -> Self {
        if required {
            LeashRule::Required
        } else {
            LeashRule::Optional
        }
    }
}

impl From<LeashRule> for bool {
    fn from(rule: LeashRule) -> Self {
        rule.expected_flag()
    }
}

impl std::fmt::Display for LeashRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeashRule::Required => write!(f, "required"),
            LeashRule::Optional => write!(f, "optional"),
        }
    }
}

/// Preferred dog-area size. `Any` never constrains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizePreference {
    Small,
    Medium,
    Large,
    Any,
}

impl SizePreference {
    /// The exact size a record must have, or `None` for `Any`.
    #[must_use]
    pub fn as_park_size(self) -> Option<ParkSize> {
        match self {
            SizePreference::Small => Some(ParkSize::Small),
            SizePreference::Medium => Some(ParkSize::Medium),
            SizePreference::Large => Some(ParkSize::Large),
            SizePreference::Any => None,
        }
    }
}

impl FromStr for SizePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(SizePreference::Small),
            "medium" => Ok(SizePreference::Medium),
            "large" => Ok(SizePreference::Large),
            "any" => Ok(SizePreference::Any),
            other => Err(format!(
                "unknown size '{other}'; expected small, medium, large or any"
            )),
        }
    }
}

impl std::fmt::Display for SizePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SizePreference::Small => write!(f, "small"),
            SizePreference::Medium => write!(f, "medium"),
            SizePreference::Large => write!(f, "large"),
            SizePreference::Any => write!(f, "any"),
        }
    }
}

/// Facility predicates that only ever gate on "must be present".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facility {
    Lighting,
    FencedArea,
    WasteStations,
    WaterFountain,
    Parking,
}

impl Facility {
    pub const ALL: [Facility; 5] = [
        Facility::Lighting,
        Facility::FencedArea,
        Facility::WasteStations,
        Facility::WaterFountain,
        Facility::Parking,
    ];

    /// Wire name of the predicate in [`FilterOptions`].
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Facility::Lighting => "lightingRequired",
            Facility::FencedArea => "fencedAreaRequired",
            Facility::WasteStations => "wasteStationsRequired",
            Facility::WaterFountain => "waterFountainRequired",
            Facility::Parking => "parkingRequired",
        }
    }

    /// Whether the location offers this facility.
    #[must_use]
    pub fn is_available(self, features: &LocationFeatures) -> bool {
        match self {
            Facility::Lighting => features.night_lighting,
            Facility::FencedArea => features.fenced_area,
            Facility::WasteStations => features.waste_stations,
            Facility::WaterFountain => features.water_fountain,
            Facility::Parking => features.parking,
        }
    }
}

impl FromStr for Facility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Facility::ALL
            .into_iter()
            .find(|f| f.key() == s)
            .ok_or_else(|| format!("unknown facility '{s}'"))
    }
}

impl std::fmt::Display for Facility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Identifies a single predicate of [`FilterOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKey {
    Facility(Facility),
    Leash,
    MaxDistance,
    PreferredSize,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}

/// Sparse set of location filter predicates.
///
/// Facility fields hold `true` when the facility is required; `false` is the
/// same as the key being absent and is never serialized. Unknown keys are
/// ignored on input.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    #[serde(default, skip_serializing_if = "is_false")]
    pub lighting_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leash_required: Option<LeashRule>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub fenced_area_required: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub waste_stations_required: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub water_fountain_required: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub parking_required: bool,
    /// Kilometres. Only compared against a record's precomputed distance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_size: Option<SizePreference>,
}

impl FilterOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of requiring a facility.
    #[must_use]
    pub fn with_facility(mut self, facility: Facility) -> Self {
        *self.facility_slot(facility) = true;
        self
    }

    #[must_use]
    pub fn with_leash(mut self, rule: LeashRule) -> Self {
        self.leash_required = Some(rule);
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: SizePreference) -> Self {
        self.set_preferred_size(size);
        self
    }

    #[must_use]
    pub fn with_max_distance(mut self, km: f64) -> Self {
        self.set_max_distance(Some(km));
        self
    }

    #[must_use]
    pub fn requires(&self, facility: Facility) -> bool {
        match facility {
            Facility::Lighting => self.lighting_required,
            Facility::FencedArea => self.fenced_area_required,
            Facility::WasteStations => self.waste_stations_required,
            Facility::WaterFountain => self.water_fountain_required,
            Facility::Parking => self.parking_required,
        }
    }

    fn facility_slot(&mut self, facility: Facility) -> &mut bool {
        match facility {
            Facility::Lighting => &mut self.lighting_required,
            Facility::FencedArea => &mut self.fenced_area_required,
            Facility::WasteStations => &mut self.waste_stations_required,
            Facility::WaterFountain => &mut self.water_fountain_required,
            Facility::Parking => &mut self.parking_required,
        }
    }

    /// Flip a facility between required and absent. Turning it off removes
    /// the predicate; it never becomes a "must not have" constraint.
    pub fn toggle_facility(&mut self, facility: Facility) {
        let slot = self.facility_slot(facility);
        *slot = !*slot;
    }

    /// Quick toggle for the leash card: unset becomes required, anything
    /// else (required or optional) is removed.
    pub fn toggle_leash(&mut self) {
        self.leash_required = match self.leash_required {
            None => Some(LeashRule::Required),
            Some(_) => None,
        };
    }

    /// Explicit leash selection; `None` is "no requirement".
    pub fn set_leash(&mut self, rule: Option<LeashRule>) {
        self.leash_required = rule;
    }

    /// Select a size. `Any` removes the predicate.
    pub fn set_preferred_size(&mut self, size: SizePreference) {
        self.preferred_size = match size {
            SizePreference::Any => None,
            other => Some(other),
        };
    }

    /// Set or clear the distance bound. Negative or non-finite values clear it.
    pub fn set_max_distance(&mut self, km: Option<f64>) {
        self.max_distance = km.filter(|v| v.is_finite() && *v >= 0.0);
    }

    /// Whether a predicate currently constrains results.
    #[must_use]
    pub fn is_active(&self, key: FilterKey) -> bool {
        match key {
            FilterKey::Facility(facility) => self.requires(facility),
            FilterKey::Leash => self.leash_required.is_some(),
            FilterKey::MaxDistance => self.max_distance.is_some(),
            FilterKey::PreferredSize => self
                .preferred_size
                .and_then(SizePreference::as_park_size)
                .is_some(),
        }
    }

    /// Number of predicates that currently constrain results.
    #[must_use]
    pub fn active_count(&self) -> usize {
        let facilities = Facility::ALL
            .into_iter()
            .filter(|f| self.requires(*f))
            .count();
        let others = [FilterKey::Leash, FilterKey::MaxDistance, FilterKey::PreferredSize]
            .into_iter()
            .filter(|k| self.is_active(*k))
            .count();
        facilities + others
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    /// Remove every predicate.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether `record` satisfies every active predicate.
    #[must_use]
    pub fn matches(&self, record: &LocationRecord) -> bool {
        let features = &record.features;

        let facilities_ok = Facility::ALL
            .into_iter()
            .all(|f| !self.requires(f) || f.is_available(features));
        if !facilities_ok {
            return false;
        }

        if let Some(rule) = self.leash_required {
            // An unknown leash rule on the record satisfies neither choice.
            if features.leash_required != Some(rule.expected_flag()) {
                return false;
            }
        }

        if let Some(size) = self.preferred_size.and_then(SizePreference::as_park_size) {
            if features.size != Some(size) {
                return false;
            }
        }

        if let (Some(max), Some(distance)) = (self.max_distance, record.distance_km) {
            if distance > max {
                return false;
            }
        }

        true
    }
}

/// Iterate over the records satisfying `filters`, in input order.
pub fn matching<'a>(
    filters: &'a FilterOptions,
    records: &'a [LocationRecord],
) -> impl Iterator<Item = &'a LocationRecord> + 'a {
    records.iter().filter(move |r| filters.matches(r))
}

/// Return the records satisfying `filters`, in input order.
///
/// An empty filter set returns every record.
#[must_use]
pub fn evaluate(filters: &FilterOptions, records: &[LocationRecord]) -> Vec<LocationRecord> {
    let kept: Vec<LocationRecord> = matching(filters, records).cloned().collect();
    tracing::debug!(
        active = filters.active_count(),
        candidates = records.len(),
        matched = kept.len(),
        "evaluated location filters"
    );
    kept
}
