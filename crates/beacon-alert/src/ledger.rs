// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Alert ledger: the audit trail of dispatch attempts.
//!
//! Records are kept in memory up to a fixed capacity (oldest evicted first).
//! When a journal path is configured, every appended record is also written as
//! one JSON line, and the tail of that journal is loaded back on open.

use std::collections::VecDeque;
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use beacon_config::model::LedgerConfig;
use beacon_core::{AlertRecord, BeaconError};
use tracing::{debug, warn};

pub struct AlertLedger {
    records: Mutex<VecDeque<AlertRecord>>,
    capacity: usize,
    journal: Option<PathBuf>,
}

impl AlertLedger {
    /// In-memory ledger holding at most `capacity` records.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
            capacity,
            journal: None,
        }
    }

    /// Ledger backed by `journal`, preloaded with its most recent records.
    pub fn with_journal(capacity: usize, journal: impl Into<PathBuf>) -> Result<Self, BeaconError> {
        let journal = journal.into();
        let mut ledger = Self::new(capacity);
        if journal.exists() {
            let restored = Self::replay(&journal)?;
            let skip = restored.len().saturating_sub(ledger.capacity);
            ledger.lock().extend(restored.into_iter().skip(skip));
        }
        ledger.journal = Some(journal);
        Ok(ledger)
    }

    pub fn from_config(config: &LedgerConfig) -> Result<Self, BeaconError> {
        match config.journal_file() {
            Some(path) => Self::with_journal(config.capacity, path),
            None => Ok(Self::new(config.capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn journal_path(&self) -> Option<&Path> {
        self.journal.as_deref()
    }

    /// Append a record, evicting the oldest in memory if full.
    ///
    /// A journal write failure is logged; the in-memory append still happens.
    pub fn append(&self, record: AlertRecord) {
        let mut records = self.lock();

        if let Some(path) = &self.journal {
            if let Err(e) = write_line(path, &record) {
                warn!(
                    alert_id = %record.alert_id,
                    journal = %path.display(),
                    error = %e,
                    "failed to journal alert record"
                );
            }
        }

        if records.len() >= self.capacity {
            if let Some(evicted) = records.pop_front() {
                debug!(alert_id = %evicted.alert_id, "evicted oldest alert record from memory");
            }
        }
        records.push_back(record);
    }

    /// Copy of the retained records, oldest first.
    pub fn history(&self) -> Vec<AlertRecord> {
        self.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Id of the most recently appended record.
    pub fn last_id(&self) -> Option<String> {
        self.lock().back().map(|r| r.alert_id.clone())
    }

    /// Most recent retained record with this id.
    pub fn find(&self, alert_id: &str) -> Option<AlertRecord> {
        self.lock()
            .iter()
            .rev()
            .find(|r| r.alert_id == alert_id)
            .cloned()
    }

    /// Read every record from a journal file, oldest first.
    ///
    /// Lines that do not parse are skipped with a warning.
    pub fn replay(path: &Path) -> Result<Vec<AlertRecord>, BeaconError> {
        let file = std::fs::File::open(path).map_err(BeaconError::storage)?;
        let mut records = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(BeaconError::storage)?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<AlertRecord>(&line) {
                Ok(record) => records.push(record),
                Err(e) => warn!(
                    journal = %path.display(),
                    line = index + 1,
                    error = %e,
                    "skipping unreadable journal line"
                ),
            }
        }
        Ok(records)
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<AlertRecord>> {
        // The deque is never left half-updated, so a poisoned lock is still usable.
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn write_line(path: &Path, record: &AlertRecord) -> Result<(), BeaconError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(BeaconError::storage)?;
    }
    let mut line = serde_json::to_vec(record).map_err(BeaconError::storage)?;
    line.push(b'\n');
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(BeaconError::storage)?;
    file.write_all(&line).map_err(BeaconError::storage)
}
