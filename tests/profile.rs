use tempfile::TempDir;

use ptwater::auth::profile::{
    clear_profile, get_profile, store_profile, Profile, DEFAULT_AREA_ID, DEFAULT_WATER_CORP_ID,
};

// Single test so PTWATER_CONFIG_DIR is not raced by parallel tests in this
// binary; other test binaries run as separate processes.
#[test]
fn profile_round_trips_through_the_config_dir() {
    let dir = TempDir::new().unwrap();
    std::env::set_var("PTWATER_CONFIG_DIR", dir.path());

    assert!(get_profile().unwrap().is_none());

    store_profile(&Profile {
        meter_number: "M100200".to_string(),
        query_year: "2025".to_string(),
        water_corp_id: 3,
        area_id: 0,
    })
    .unwrap();

    let loaded = get_profile().unwrap().unwrap();
    assert_eq!(loaded.meter_number, "M100200");
    assert_eq!(loaded.query_year, "2025");
    assert_eq!(loaded.water_corp_id, 3);

    // Hand-written config without the ids picks up the defaults.
    std::fs::write(
        dir.path().join("config.json"),
        r#"{"meter_number": "M2", "query_year": "2024"}"#,
    )
    .unwrap();
    let partial = get_profile().unwrap().unwrap();
    assert_eq!(partial.water_corp_id, DEFAULT_WATER_CORP_ID);
    assert_eq!(partial.area_id, DEFAULT_AREA_ID);

    clear_profile().unwrap();
    assert!(get_profile().unwrap().is_none());
    // Clearing twice is fine.
    clear_profile().unwrap();

    std::env::remove_var("PTWATER_CONFIG_DIR");
}
