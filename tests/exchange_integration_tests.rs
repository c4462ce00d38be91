//! Integration tests for sharing profiles between players
//!
//! A profile exported on one machine is imported on another, each with its
//! own profile directory.

use camino::Utf8PathBuf;
use settings_rando::services::exchange;
use settings_rando::{
    DirectoryProfileStore, ExchangeData, GenerationProfile, ProfileError, StateManager,
};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn create_state() -> (TempDir, Utf8PathBuf, StateManager) {
    let temp_dir = TempDir::new().unwrap();
    let dir = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    let state = StateManager::new(Arc::new(DirectoryProfileStore::new(&dir)));
    (temp_dir, dir, state)
}

#[test]
fn test_file_profile_round_trips_between_players() {
    let (_host_dir, host_path, host) = create_state();
    fs::write(host_path.join("Race.txt"), "EXCLUDE\n# keep costs\ncosts.min_charm\n").unwrap();
    host.discover_profiles().unwrap();
    host.select_profile("Race").unwrap();

    let json = ExchangeData::export(&host).unwrap().to_json().unwrap();

    let (_guest_dir, guest_path, guest) = create_state();
    ExchangeData::from_json(&json).unwrap().apply(&guest).unwrap();

    assert_eq!(
        guest.current_profile(),
        GenerationProfile::File("Race".to_string())
    );
    assert_eq!(
        fs::read_to_string(guest_path.join("Race.txt")).unwrap(),
        "EXCLUDE\n# keep costs\ncosts.min_charm\n"
    );
}

#[test]
fn test_sentinel_profile_round_trips_without_text() {
    let (_host_dir, _host_path, host) = create_state();
    host.select_profile("Full").unwrap();
    let data = ExchangeData::export(&host).unwrap();
    assert_eq!(data.config_text, None);

    let (_guest_dir, guest_path, guest) = create_state();
    data.apply(&guest).unwrap();

    assert_eq!(guest.current_profile(), GenerationProfile::Full);
    assert_eq!(fs::read_dir(&guest_path).unwrap().count(), 0);
}

#[test]
fn test_null_payload_selects_disabled() {
    let (_dir, _path, state) = create_state();
    state.select_profile("Full").unwrap();

    let data: Option<ExchangeData> = serde_json::from_str("null").unwrap();
    exchange::receive(data, &state).unwrap();

    assert_eq!(state.current_profile(), GenerationProfile::Disabled);
}

#[test]
fn test_payload_with_sentinel_name_and_text_is_rejected() {
    let (_dir, _path, state) = create_state();

    let result = ExchangeData {
        profile_name: "Full".to_string(),
        config_text: Some(vec!["costs.min_charm".to_string()]),
    }
    .apply(&state);

    assert!(result.is_err());
    assert_eq!(state.current_profile(), GenerationProfile::Disabled);
}

#[test]
fn test_payload_name_cannot_leave_profile_directory() {
    let temp_dir = TempDir::new().unwrap();
    let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    let profiles = root.join("Profiles");
    let state = StateManager::new(Arc::new(DirectoryProfileStore::new(&profiles)));

    let result = ExchangeData {
        profile_name: "../escaped".to_string(),
        config_text: Some(vec!["INCLUDE".to_string()]),
    }
    .apply(&state);

    assert!(matches!(
        result,
        Err(ProfileError::InvalidProfileName(ref name)) if name == "../escaped"
    ));
    assert!(!root.join("escaped.txt").exists());
    assert!(!state.read(|registry| registry.contains("../escaped")));
    assert_eq!(state.current_profile(), GenerationProfile::Disabled);
}
