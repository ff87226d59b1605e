// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `beacon history`: the audit trail, oldest first.

use beacon_alert::AlertLedger;
use beacon_config::model::BeaconConfig;
use beacon_core::{AlertRecord, BeaconError};
use colored::Colorize;

pub fn run_history(
    config: &BeaconConfig,
    limit: Option<usize>,
    json: bool,
    color: bool,
) -> Result<i32, BeaconError> {
    if config.ledger.journal_file().is_none() {
        eprintln!("note: [ledger] journal is off; alerts from earlier runs are not kept");
    }
    let ledger = AlertLedger::from_config(&config.ledger)?;
    let records = tail(ledger.history(), limit);

    if json {
        for record in &records {
            let line = serde_json::to_string(record).map_err(BeaconError::storage)?;
            println!("{line}");
        }
        return Ok(0);
    }

    if records.is_empty() {
        println!("No alerts recorded.");
    }
    for record in &records {
        let line = format_record(record);
        if color && !record.dispatch_status.is_success() {
            println!("{}", line.red());
        } else {
            println!("{line}");
        }
    }
    Ok(0)
}

fn tail(records: Vec<AlertRecord>, limit: Option<usize>) -> Vec<AlertRecord> {
    match limit {
        Some(limit) if limit < records.len() => {
            let skip = records.len() - limit;
            records.into_iter().skip(skip).collect()
        }
        _ => records,
    }
}

fn format_record(record: &AlertRecord) -> String {
    format!(
        "{}  {}  {:<8} {:<14} {}  {}",
        record.alert_id,
        record.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
        record.urgency.to_string(),
        record.case_id,
        record.recipient,
        record.dispatch_status,
    )
}
