// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end orchestration tests.
//!
//! `TestHarness` assembles an `AlertOrchestrator` over a temp-dir credential
//! store (credentials already saved unless told otherwise) and a
//! [`MockDispatcher`].

use std::path::PathBuf;
use std::sync::Arc;

use beacon_alert::{AlertLedger, AlertOrchestrator};
use beacon_core::{BeaconError, PhoneNumber};
use beacon_vault::kdf::KdfParams;
use beacon_vault::{CredentialStore, KeyArtifact};
use secrecy::SecretString;

use crate::mock_dispatcher::MockDispatcher;

pub const TEST_ACCOUNT_ID: &str = "AC-test";
pub const TEST_SECRET: &str = "test-secret-token";
pub const TEST_SENDER: &str = "+15550001111";

/// Cheap Argon2 parameters for tests that wrap the key artifact.
pub const FAST_KDF: KdfParams = KdfParams {
    memory_cost: 32768,
    iterations: 2,
    parallelism: 1,
};

/// Builder for [`TestHarness`].
pub struct TestHarnessBuilder {
    dispatcher: MockDispatcher,
    credentials: bool,
    capacity: usize,
    journal: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            dispatcher: MockDispatcher::new(),
            credentials: true,
            capacity: 500,
            journal: false,
        }
    }

    pub fn with_dispatcher(mut self, dispatcher: MockDispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    /// Leave the store unconfigured.
    pub fn without_credentials(mut self) -> Self {
        self.credentials = false;
        self
    }

    pub fn with_ledger_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Journal the ledger to a file inside the harness temp dir.
    pub fn with_journal(mut self) -> Self {
        self.journal = true;
        self
    }

    pub fn build(self) -> Result<TestHarness, BeaconError> {
        let dir = tempfile::TempDir::new().map_err(BeaconError::storage)?;
        let store = Arc::new(CredentialStore::new(
            dir.path().join("emergency_config.json"),
            KeyArtifact::new(dir.path().join("encryption.key"), None, FAST_KDF),
            "1",
        ));
        if self.credentials {
            store.save_credentials(
                TEST_ACCOUNT_ID,
                &SecretString::from(TEST_SECRET.to_string()),
                TEST_SENDER,
            )?;
        }

        let journal_path = self.journal.then(|| dir.path().join("alerts.jsonl"));
        let ledger = match &journal_path {
            Some(path) => AlertLedger::with_journal(self.capacity, path)?,
            None => AlertLedger::new(self.capacity),
        };

        let dispatcher = Arc::new(self.dispatcher);
        let orchestrator = Arc::new(AlertOrchestrator::new(
            store.clone(),
            dispatcher.clone(),
            ledger,
        ));

        Ok(TestHarness {
            orchestrator,
            dispatcher,
            store,
            journal_path,
            _dir: dir,
        })
    }
}

/// A fully wired orchestrator with mock channels.
pub struct TestHarness {
    pub orchestrator: Arc<AlertOrchestrator>,
    pub dispatcher: Arc<MockDispatcher>,
    pub store: Arc<CredentialStore>,
    pub journal_path: Option<PathBuf>,
    _dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Default harness: credentials saved, both channels accepting.
    pub fn new() -> Result<Self, BeaconError> {
        Self::builder().build()
    }

    /// A valid recipient outside the domestic plan, passed verbatim.
    pub fn recipient() -> PhoneNumber {
        PhoneNumber::literal("+918319612060").expect("valid E.164 literal")
    }
}
