// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `beacon send`, `beacon test` and `beacon delivery`.

use std::path::{Path, PathBuf};

use beacon_config::model::BeaconConfig;
use beacon_core::{normalize_phone, BeaconError, PatientContext, PhoneNumber, Urgency};
use beacon_vault::CredentialStore;
use clap::Args;
use colored::Colorize;

use crate::app;

/// Destination selection shared by `send` and `test`.
#[derive(Args, Debug, Default)]
pub struct RecipientArgs {
    /// Destination number. Defaults to the primary contact.
    #[arg(long)]
    pub to: Option<String>,
    /// Use `--to` as given (E.164 with leading `+`) instead of normalizing it.
    #[arg(long, requires = "to")]
    pub literal: bool,
}

pub struct SendRequest {
    pub urgency: Urgency,
    pub notes: String,
    pub context: Option<PathBuf>,
    pub case_id: Option<String>,
}

/// Pick the destination: `--to` if given, else the primary contact.
pub fn resolve_recipient(
    store: &CredentialStore,
    args: &RecipientArgs,
) -> Result<PhoneNumber, BeaconError> {
    match args.to.as_deref() {
        Some(raw) if args.literal => PhoneNumber::literal(raw),
        Some(raw) => normalize_phone(raw, store.calling_code()),
        None => store
            .primary_contact()?
            .map(|contact| contact.phone)
            .ok_or_else(|| {
                BeaconError::Validation(
                    "no recipient given and no active contact; pass --to or run `beacon contact add`"
                        .to_string(),
                )
            }),
    }
}

/// Read a patient context from a JSON file. `case_id` wins over the file's.
pub fn load_context(
    path: Option<&Path>,
    case_id: Option<&str>,
) -> Result<PatientContext, BeaconError> {
    let mut context = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path).map_err(BeaconError::storage)?;
            let value: serde_json::Value = serde_json::from_str(&raw).map_err(|e| {
                BeaconError::Validation(format!("{} is not valid JSON: {e}", path.display()))
            })?;
            PatientContext::from_json(&value)
        }
        None => PatientContext::default(),
    };
    if let Some(case_id) = case_id.map(str::trim).filter(|c| !c.is_empty()) {
        context = context.with_case_id(case_id);
    }
    Ok(context)
}

pub async fn run_send(
    config: &BeaconConfig,
    recipient: &RecipientArgs,
    request: SendRequest,
    color: bool,
) -> Result<i32, BeaconError> {
    let orchestrator = app::orchestrator(config)?;
    let to = resolve_recipient(orchestrator.store(), recipient)?;
    let context = load_context(request.context.as_deref(), request.case_id.as_deref())?;

    let outcome = orchestrator
        .send_alert(&context, request.urgency, &request.notes, &to)
        .await?;

    let tag = if outcome.success {
        app::ok_tag(color)
    } else {
        app::fail_tag(color)
    };
    println!("{tag} {}", outcome.message);
    println!("  case:  {}", outcome.record.case_id);
    println!("  to:    {}", outcome.record.recipient);
    print_channel("text", &outcome.record.text_confirmation, &outcome.record.text_error, color);
    print_channel("voice", &outcome.record.voice_confirmation, &outcome.record.voice_error, color);

    Ok(if outcome.success { 0 } else { 1 })
}

fn print_channel(name: &str, confirmation: &Option<String>, error: &Option<String>, color: bool) {
    match (confirmation, error) {
        (Some(id), _) => println!("  {name:<6} {}", id),
        (None, Some(err)) if color => println!("  {name:<6} {}", err.red()),
        (None, Some(err)) => println!("  {name:<6} {err}"),
        (None, None) => println!("  {name:<6} -"),
    }
}

pub async fn run_test(
    config: &BeaconConfig,
    recipient: &RecipientArgs,
    color: bool,
) -> Result<i32, BeaconError> {
    let orchestrator = app::orchestrator(config)?;
    let to = resolve_recipient(orchestrator.store(), recipient)?;
    let confirmation = orchestrator.test_channel(&to).await?;
    println!("{} test message sent to {to} ({confirmation})", app::ok_tag(color));
    Ok(0)
}

pub async fn run_delivery(
    config: &BeaconConfig,
    alert_id: &str,
    color: bool,
) -> Result<i32, BeaconError> {
    let orchestrator = app::orchestrator(config)?;
    let status = orchestrator.delivery_status(alert_id).await?;
    let shown = if color && status.is_final() {
        status.to_string().bold().to_string()
    } else {
        status.to_string()
    };
    println!("{alert_id}: {shown}");
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &Path) -> CredentialStore {
        CredentialStore::from_config(&app::config_in(dir), None)
    }

    #[test]
    fn explicit_number_is_normalized_with_the_calling_code() {
        let dir = tempfile::tempdir().unwrap();
        let args = RecipientArgs {
            to: Some("83196 12060".into()),
            literal: false,
        };
        let to = resolve_recipient(&store(dir.path()), &args).unwrap();
        assert_eq!(to.as_str(), "+918319612060");
    }

    #[test]
    fn literal_number_skips_normalization() {
        let dir = tempfile::tempdir().unwrap();
        let args = RecipientArgs {
            to: Some("+15551234567".into()),
            literal: true,
        };
        let to = resolve_recipient(&store(dir.path()), &args).unwrap();
        assert_eq!(to.as_str(), "+15551234567");
    }

    #[test]
    fn falls_back_to_the_primary_contact() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        store.add_contact("Backup", "9876543210", 2).unwrap();
        store.add_contact("On call", "8319612060", 1).unwrap();

        let to = resolve_recipient(&store, &RecipientArgs::default()).unwrap();
        assert_eq!(to.as_str(), "+918319612060");
    }

    #[test]
    fn no_recipient_at_all_is_a_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_recipient(&store(dir.path()), &RecipientArgs::default()).unwrap_err();
        assert!(matches!(err, BeaconError::Validation(_)));
    }

    #[test]
    fn context_file_is_parsed_and_case_id_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patient.json");
        std::fs::write(&path, r#"{"case_id": "C-1", "age": 7, "seizures": 1}"#).unwrap();

        let ctx = load_context(Some(&path), None).unwrap();
        assert_eq!(ctx.case_id.as_deref(), Some("C-1"));
        assert_eq!(ctx.age, Some(7));
        assert!(ctx.has_flag("seizures"));

        let ctx = load_context(Some(&path), Some("C-2")).unwrap();
        assert_eq!(ctx.case_id.as_deref(), Some("C-2"));
    }

    #[test]
    fn malformed_context_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patient.json");
        std::fs::write(&path, "{ nope").unwrap();
        assert!(matches!(
            load_context(Some(&path), None),
            Err(BeaconError::Validation(_))
        ));
    }
}
