//! `locations` command handlers.
//!
//! Every handler loads the location file fresh, so edits to the YAML are
//! picked up on the next invocation.

use std::path::Path;

use clap::{Args, Subcommand, ValueEnum};
use pawmap_core::{
    evaluate, load_locations, Facility, FilterOptions, LeashRule, LocationRecord, SizePreference,
};

use crate::truncate;

/// Sub-commands available under `locations`.
#[derive(Debug, Subcommand)]
pub enum LocationsCommands {
    /// Print every location in the file
    List {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the locations matching the given filters
    Filter(FilterArgs),
    /// Print the details of a single location
    Show {
        /// Location id
        id: String,
    },
    /// Load and validate the file without printing locations
    Validate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LeashChoice {
    /// No leash requirement
    Any,
    /// Leash must be mandatory
    Required,
    /// Leash must be explicitly optional
    Optional,
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Require night lighting
    #[arg(long)]
    pub lighting: bool,
    /// Leash rule to require
    #[arg(long, value_enum, default_value_t = LeashChoice::Any)]
    pub leash: LeashChoice,
    /// Require a fenced area
    #[arg(long)]
    pub fenced: bool,
    /// Require waste stations
    #[arg(long)]
    pub waste: bool,
    /// Require a water fountain
    #[arg(long)]
    pub water: bool,
    /// Require parking
    #[arg(long)]
    pub parking: bool,
    /// Dog-area size: small, medium, large or any
    #[arg(long)]
    pub size: Option<SizePreference>,
    /// Maximum precomputed distance in kilometres
    #[arg(long)]
    pub max_distance: Option<f64>,
    /// Emit JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl FilterArgs {
    /// Assemble the sparse filter value the flags describe.
    ///
    /// # Errors
    ///
    /// Returns an error if `--max-distance` is negative or not a number.
    pub fn to_filters(&self) -> anyhow::Result<FilterOptions> {
        let mut filters = FilterOptions::new();

        let requested = [
            (self.lighting, Facility::Lighting),
            (self.fenced, Facility::FencedArea),
            (self.waste, Facility::WasteStations),
            (self.water, Facility::WaterFountain),
            (self.parking, Facility::Parking),
        ];
        for (flag, facility) in requested {
            if flag {
                filters.toggle_facility(facility);
            }
        }

        filters.set_leash(match self.leash {
            LeashChoice::Any => None,
            LeashChoice::Required => Some(LeashRule::Required),
            LeashChoice::Optional => Some(LeashRule::Optional),
        });

        if let Some(size) = self.size {
            filters.set_preferred_size(size);
        }

        if let Some(km) = self.max_distance {
            if !km.is_finite() || km < 0.0 {
                anyhow::bail!("--max-distance must be a non-negative number, got {km}");
            }
            filters.set_max_distance(Some(km));
        }

        Ok(filters)
    }
}

/// Dispatch a `locations` sub-command against the file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded, a location is unknown, or
/// output cannot be serialized.
pub(crate) fn run(path: &Path, command: LocationsCommands) -> anyhow::Result<()> {
    let file = load_locations(path)?;

    match command {
        LocationsCommands::List { json } => print_locations(&file.locations, json),
        LocationsCommands::Filter(args) => {
            let filters = args.to_filters()?;
            let matched = evaluate(&filters, &file.locations);
            tracing::info!(
                active = filters.active_count(),
                matched = matched.len(),
                candidates = file.len(),
                "filtered locations"
            );
            if !args.json {
                println!(
                    "found {} of {} locations ({} active filters)",
                    matched.len(),
                    file.len(),
                    filters.active_count()
                );
            }
            print_locations(&matched, args.json)
        }
        LocationsCommands::Show { id } => {
            let location = file.find(&id).ok_or_else(|| {
                anyhow::anyhow!("location '{id}' not found in {}", path.display())
            })?;
            print_details(location);
            Ok(())
        }
        LocationsCommands::Validate => {
            println!("{}: {} locations OK", path.display(), file.len());
            Ok(())
        }
    }
}

fn print_locations(locations: &[LocationRecord], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(locations)?);
        return Ok(());
    }

    if locations.is_empty() {
        println!("no matching locations");
        return Ok(());
    }

    println!("{:<10}{:<42}{:<8}{:<8}FEATURES", "ID", "NAME", "RATING", "SIZE");
    for location in locations {
        let size = location
            .features
            .size
            .map_or_else(|| "\u{2014}".to_string(), |s| s.to_string());
        println!(
            "{:<10}{:<42}{:<8.1}{:<8}{}",
            truncate(&location.id, 8),
            truncate(&location.name, 38),
            location.rating,
            size,
            feature_summary(location)
        );
    }
    Ok(())
}

fn print_details(location: &LocationRecord) {
    println!("{} ({})", location.name, location.id);
    println!("Address: {}", location.address);
    println!(
        "Coordinates: {:.4}, {:.4}",
        location.coordinates.lat, location.coordinates.lng
    );
    println!(
        "Rating: {:.1} ({} reviews)",
        location.rating, location.review_count
    );
    if let Some(ref hours) = location.hours {
        println!("Hours: {hours}");
    }
    if let Some(distance) = location.distance_km {
        println!("Distance: {distance:.1} km");
    }
    println!("Features: {}", feature_summary(location));
    if let Some(ref surface) = location.features.surface_type {
        println!("Surface: {surface}");
    }
    if !location.features.amenities.is_empty() {
        println!("Amenities: {}", location.features.amenities.join(", "));
    }
    if !location.description.is_empty() {
        println!();
        println!("{}", location.description);
    }
    if !location.rules.is_empty() {
        println!();
        println!("Rules:");
        for rule in &location.rules {
            println!("  - {rule}");
        }
    }
}

/// Short comma-separated list of the facilities a location offers.
pub(crate) fn feature_summary(location: &LocationRecord) -> String {
    let features = &location.features;
    let mut parts: Vec<&str> = Vec::new();
    if features.night_lighting {
        parts.push("lighting");
    }
    match features.leash_required {
        Some(true) => parts.push("leash required"),
        Some(false) => parts.push("off-leash"),
        None => {}
    }
    if features.fenced_area {
        parts.push("fenced");
    }
    if features.waste_stations {
        parts.push("waste");
    }
    if features.water_fountain {
        parts.push("water");
    }
    if features.parking {
        parts.push("parking");
    }
    if parts.is_empty() {
        "\u{2014}".to_string()
    } else {
        parts.join(", ")
    }
}

#[cfg(test)]
#[path = "locations_test.rs"]
mod tests;
