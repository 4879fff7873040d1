use std::path::Path;

use super::*;

fn make_location(id: &str, name: &str) -> LocationRecord {
    LocationRecord {
        id: id.to_string(),
        name: name.to_string(),
        address: "1 Test St".to_string(),
        coordinates: Coordinates {
            lat: -27.47,
            lng: 153.02,
        },
        rating: 4.0,
        review_count: 10,
        photos: vec![],
        description: String::new(),
        hours: None,
        rules: vec![],
        features: LocationFeatures::default(),
        distance_km: None,
    }
}

fn file_of(locations: Vec<LocationRecord>) -> LocationsFile {
    LocationsFile { locations }
}

#[test]
fn validate_accepts_well_formed_locations() {
    let file = file_of(vec![make_location("a", "Alpha"), make_location("b", "Beta")]);
    validate_locations(&file).expect("valid locations");
}

#[test]
fn validate_rejects_duplicate_id() {
    let file = file_of(vec![make_location("a", "Alpha"), make_location("a", "Beta")]);
    let err = validate_locations(&file).unwrap_err();
    assert!(err.to_string().contains("duplicate location id: 'a'"));
}

#[test]
fn validate_rejects_empty_id() {
    let file = file_of(vec![make_location(" ", "Alpha")]);
    let err = validate_locations(&file).unwrap_err();
    assert!(err.to_string().contains("empty id"));
}

#[test]
fn validate_rejects_empty_name() {
    let file = file_of(vec![make_location("a", "  ")]);
    let err = validate_locations(&file).unwrap_err();
    assert!(err.to_string().contains("empty name"));
}

#[test]
fn validate_rejects_out_of_range_latitude() {
    let mut location = make_location("a", "Alpha");
    location.coordinates.lat = 91.0;
    let err = validate_locations(&file_of(vec![location])).unwrap_err();
    assert!(err.to_string().contains("invalid latitude"));
}

#[test]
fn validate_rejects_nan_longitude() {
    let mut location = make_location("a", "Alpha");
    location.coordinates.lng = f64::NAN;
    let err = validate_locations(&file_of(vec![location])).unwrap_err();
    assert!(err.to_string().contains("invalid longitude"));
}

#[test]
fn validate_rejects_rating_above_five() {
    let mut location = make_location("a", "Alpha");
    location.rating = 5.5;
    let err = validate_locations(&file_of(vec![location])).unwrap_err();
    assert!(err.to_string().contains("invalid rating"));
}

#[test]
fn validate_rejects_negative_distance() {
    let location = make_location("a", "Alpha").with_distance_km(-1.0);
    let err = validate_locations(&file_of(vec![location])).unwrap_err();
    assert!(err.to_string().contains("invalid distance"));
}

#[test]
fn missing_features_default_to_unavailable() {
    let yaml = r#"
locations:
  - id: "x"
    name: Bare Record
    coordinates: { lat: 0.0, lng: 0.0 }
"#;
    let file: LocationsFile = serde_yaml::from_str(yaml).expect("parse");
    let features = &file.locations[0].features;
    assert!(!features.night_lighting);
    assert!(!features.parking);
    assert_eq!(features.leash_required, None);
    assert_eq!(features.size, None);
    assert!(features.amenities.is_empty());
}

#[test]
fn features_use_camel_case_keys() {
    let json = serde_json::json!({
        "id": "x",
        "name": "Camel",
        "coordinates": { "lat": 1.0, "lng": 2.0 },
        "reviewCount": 3,
        "distanceKm": 1.5,
        "features": {
            "nightLighting": true,
            "leashRequired": false,
            "waterFountain": true,
            "size": "small",
            "surfaceType": "Grass"
        }
    });
    let record: LocationRecord = serde_json::from_value(json).expect("deserialize");
    assert_eq!(record.review_count, 3);
    assert_eq!(record.distance_km, Some(1.5));
    assert!(record.features.night_lighting);
    assert_eq!(record.features.leash_required, Some(false));
    assert!(record.features.water_fountain);
    assert_eq!(record.features.size, Some(ParkSize::Small));
    assert_eq!(record.features.surface_type.as_deref(), Some("Grass"));
}

#[test]
fn unknown_leash_is_not_serialized() {
    let record = make_location("a", "Alpha");
    let json = serde_json::to_value(&record).expect("serialize");
    assert!(json["features"].get("leashRequired").is_none());
    assert!(json.get("distanceKm").is_none());
}

#[test]
fn find_returns_matching_record() {
    let file = file_of(vec![make_location("a", "Alpha"), make_location("b", "Beta")]);
    assert_eq!(file.find("b").map(|l| l.name.as_str()), Some("Beta"));
    assert!(file.find("missing").is_none());
    assert_eq!(file.len(), 2);
    assert!(!file.is_empty());
}

#[test]
fn load_locations_missing_file_is_io_error() {
    let err = load_locations(Path::new("/definitely/not/here.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::LocationsFileIo { .. }));
}

#[test]
fn park_size_display() {
    assert_eq!(ParkSize::Small.to_string(), "small");
    assert_eq!(ParkSize::Medium.to_string(), "medium");
    assert_eq!(ParkSize::Large.to_string(), "large");
}

#[test]
fn load_locations_from_real_file() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("config")
        .join("locations.yaml");
    assert!(
        path.exists(),
        "locations.yaml missing at {path:?}, required for this test"
    );
    let file = load_locations(&path).expect("failed to load locations.yaml");
    assert!(
        !file.locations.is_empty(),
        "locations.yaml should contain at least one location"
    );

    let roma = file.find("1").expect("Roma Street record");
    assert_eq!(roma.name, "Roma Street Parkland Dog Area");
    assert_eq!(roma.features.leash_required, Some(false));
    assert_eq!(roma.features.size, Some(ParkSize::Large));

    let new_farm = file.find("2").expect("New Farm record");
    assert_eq!(new_farm.features.leash_required, Some(true));
    assert!(!new_farm.features.fenced_area);
}
