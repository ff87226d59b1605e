// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the credential store built from configuration.

use std::path::Path;

use beacon_config::BeaconConfig;
use beacon_core::BeaconError;
use beacon_vault::CredentialStore;
use secrecy::{ExposeSecret, SecretString};

fn config_in(dir: &Path) -> BeaconConfig {
    let mut config = BeaconConfig::default();
    config.store.config_path = dir.join("data/emergency_config.json");
    config.store.key_path = dir.join("keys/encryption.key");
    config.vault.kdf_memory_cost = 32768;
    config.vault.kdf_iterations = 2;
    config.vault.kdf_parallelism = 1;
    config
}

fn secret(s: &str) -> SecretString {
    SecretString::from(s.to_string())
}

#[test]
fn credentials_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    CredentialStore::from_config(&config, None)
        .save_credentials("AC123", &secret("secret456"), "+15550001111")
        .unwrap();

    let reopened = CredentialStore::from_config(&config, None);
    let creds = reopened.get_credentials().unwrap().unwrap();
    assert_eq!(creds.account_id(), "AC123");
    assert_eq!(creds.auth.secret.expose_secret(), "secret456");
}

#[test]
fn key_artifact_lives_apart_from_the_record() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let store = CredentialStore::from_config(&config, None);
    store
        .save_credentials("AC123", &secret("secret456"), "+15550001111")
        .unwrap();

    assert!(config.store.key_path.exists());
    let record = std::fs::read_to_string(&config.store.config_path).unwrap();
    let key = std::fs::read_to_string(&config.store.key_path).unwrap();
    let key_hex = serde_json::from_str::<serde_json::Value>(&key).unwrap()["key"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(!record.contains(&key_hex));
}

#[test]
fn passphrase_protected_store_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    CredentialStore::from_config(&config, Some(secret("correct horse")))
        .save_credentials("AC9", &secret("tok"), "+15550009999")
        .unwrap();

    let creds = CredentialStore::from_config(&config, Some(secret("correct horse")))
        .get_credentials()
        .unwrap()
        .unwrap();
    assert_eq!(creds.auth.secret.expose_secret(), "tok");

    let err = CredentialStore::from_config(&config, None)
        .get_credentials()
        .unwrap_err();
    assert!(matches!(err, BeaconError::Encryption(_)));
}

#[test]
fn contacts_and_credentials_share_one_record() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let store = CredentialStore::from_config(&config, None);

    store.add_contact("Attending", "999-888-7777", 1).unwrap();
    store
        .save_credentials("AC1", &secret("tok"), "+15550000001")
        .unwrap();
    store.add_contact("Fellow", "999 888 6666", 3).unwrap();

    let reopened = CredentialStore::from_config(&config, None);
    let contacts = reopened.list_contacts().unwrap();
    assert_eq!(contacts.len(), 2);
    assert_eq!(contacts[0].phone.as_str(), "+19998887777");
    assert!(reopened.get_credentials().unwrap().is_some());
}

#[test]
fn calling_code_comes_from_configuration() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path());
    config.phone.default_calling_code = "91".to_string();
    let store = CredentialStore::from_config(&config, None);

    let contact = store.add_contact("Registrar", "8319612060", 1).unwrap();
    assert_eq!(contact.phone.as_str(), "+918319612060");
    assert!(store.add_contact("Registrar", "+18319612060", 1).is_err());
}

#[test]
fn no_temp_files_are_left_behind() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let store = CredentialStore::from_config(&config, None);
    for i in 0..5 {
        store
            .add_contact(&format!("C{i}"), &format!("999888777{i}"), i)
            .unwrap();
    }

    let parent = config.store.config_path.parent().unwrap();
    let entries: Vec<_> = std::fs::read_dir(parent).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn hand_edited_contact_number_is_not_trusted() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let store = CredentialStore::from_config(&config, None);
    store.add_contact("On call", "9998887777", 1).unwrap();

    let path = store.config_path().to_path_buf();
    let edited = std::fs::read_to_string(&path)
        .unwrap()
        .replace("+19998887777", "999-888-7777");
    std::fs::write(&path, edited).unwrap();

    let err = store.list_contacts().unwrap_err();
    assert!(matches!(err, BeaconError::Storage { .. }));
}
