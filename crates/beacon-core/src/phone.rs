// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Phone number normalization.
//!
//! Two entry points produce a [`PhoneNumber`]:
//! - [`normalize_phone`] applies the strict domestic policy: a bare
//!   10-digit national number gets the default calling code prepended, and a
//!   number of `calling_code + 10 digits` is taken as already coded. Every
//!   other shape is rejected.
//! - [`PhoneNumber::literal`] accepts a destination the caller has already
//!   formatted in E.164 and only checks its shape (`+` then 8 to 15 digits).
//!
//! Contacts always go through the strict path. Ad-hoc recipients may use either.

use serde::{Deserialize, Serialize};

use crate::error::BeaconError;

/// Digits in a national significant number under the domestic plan.
const NATIONAL_DIGITS: usize = 10;

/// E.164 allows at most 15 digits including the calling code.
const E164_MAX_DIGITS: usize = 15;
const E164_MIN_DIGITS: usize = 8;

/// A phone number in E.164 form (`+` followed by digits).
///
/// Deserialization applies the same shape check as [`PhoneNumber::literal`],
/// so persisted records cannot carry a number that was never validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Accept a caller-supplied, already-formatted E.164 destination.
    ///
    /// No numbering plan is applied; the value is only required to look like E.164.
    pub fn literal(raw: &str) -> Result<Self, BeaconError> {
        let trimmed = raw.trim();
        let digits = trimmed.strip_prefix('+').ok_or_else(|| {
            BeaconError::Validation(format!("`{trimmed}` must start with `+` to be used verbatim"))
        })?;
        if !digits.chars().all(|c| c.is_ascii_digit())
            || !(E164_MIN_DIGITS..=E164_MAX_DIGITS).contains(&digits.len())
        {
            return Err(BeaconError::Validation(format!(
                "`{trimmed}` is not an E.164 number (expected + and {E164_MIN_DIGITS}-{E164_MAX_DIGITS} digits)"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Digits without the leading `+`.
    pub fn digits(&self) -> &str {
        self.0.trim_start_matches('+')
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = BeaconError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::literal(&raw)
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalize a domestic number to E.164 under the strict policy.
///
/// Accepts digits separated by spaces, dashes, dots, parentheses and an
/// optional leading `+`. Letters and any other characters are rejected.
pub fn normalize_phone(raw: &str, calling_code: &str) -> Result<PhoneNumber, BeaconError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(BeaconError::Validation("phone number is empty".to_string()));
    }

    let mut digits = String::with_capacity(trimmed.len());
    for (i, c) in trimmed.chars().enumerate() {
        match c {
            '0'..='9' => digits.push(c),
            ' ' | '-' | '.' | '(' | ')' => {}
            '+' if i == 0 => {}
            other => {
                return Err(BeaconError::Validation(format!(
                    "phone number `{trimmed}` contains invalid character `{other}`"
                )));
            }
        }
    }

    if digits.len() == NATIONAL_DIGITS {
        return Ok(PhoneNumber(format!("+{calling_code}{digits}")));
    }
    if digits.len() == NATIONAL_DIGITS + calling_code.len() && digits.starts_with(calling_code) {
        return Ok(PhoneNumber(format!("+{digits}")));
    }

    Err(BeaconError::Validation(format!(
        "phone number `{trimmed}` is not a {NATIONAL_DIGITS}-digit national number \
         or a +{calling_code} number"
    )))
}

/// Whether `raw` passes the strict policy.
pub fn is_valid_phone(raw: &str, calling_code: &str) -> bool {
    normalize_phone(raw, calling_code).is_ok()
}
