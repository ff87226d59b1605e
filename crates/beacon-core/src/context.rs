// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Patient context supplied by callers when raising an alert.
//!
//! Callers hand over a loose mapping of named fields. [`PatientContext::from_fields`]
//! reads it with these rules:
//! - known demographic and numeric fields are parsed into typed optionals;
//! - any other key whose value is `true` or `1` becomes a named flag (symptoms,
//!   family history, ...);
//! - everything else is ignored. Missing fields stay `None`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Patient sex as captured on the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Intake forms encode male as `1` and female as `0`.
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => match n.as_f64() {
                Some(v) if v == 1.0 => Some(Self::Male),
                Some(v) if v == 0.0 => Some(Self::Female),
                _ => None,
            },
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "male" | "m" => Some(Self::Male),
                "female" | "f" => Some(Self::Female),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

/// Bedside vitals and anthropometrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub bp_systolic: Option<f64>,
    pub bp_diastolic: Option<f64>,
    pub heart_rate: Option<f64>,
    pub respiratory_rate: Option<f64>,
    pub temperature_f: Option<f64>,
}

/// Laboratory panel values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabPanel {
    pub hemoglobin: Option<f64>,
    pub wbc_count: Option<f64>,
    pub platelet_count: Option<f64>,
    pub glucose: Option<f64>,
    pub creatinine: Option<f64>,
}

/// Typed snapshot of everything an alert may say about the patient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientContext {
    pub case_id: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub maternal_age: Option<f64>,
    pub paternal_age: Option<f64>,
    #[serde(default)]
    pub vitals: Vitals,
    #[serde(default)]
    pub labs: LabPanel,
    /// Binary findings that were set, by field name.
    #[serde(default)]
    pub flags: BTreeSet<String>,
}

impl PatientContext {
    /// Build a context from a loosely-shaped field mapping. Never fails.
    pub fn from_fields(fields: &Map<String, Value>) -> Self {
        let mut ctx = Self::default();

        for (key, value) in fields {
            match key.as_str() {
                "case_id" => {
                    ctx.case_id = match value {
                        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                        Value::Number(n) => Some(n.to_string()),
                        _ => None,
                    }
                }
                "age" => {
                    ctx.age = number(value)
                        .filter(|a| a.is_finite() && *a >= 0.0)
                        .map(|a| a.round() as u32)
                }
                "gender" => ctx.gender = Gender::from_value(value),
                "maternal_age" => ctx.maternal_age = number(value),
                "paternal_age" => ctx.paternal_age = number(value),
                "height_cm" => ctx.vitals.height_cm = number(value),
                "weight_kg" => ctx.vitals.weight_kg = number(value),
                "bp_systolic" => ctx.vitals.bp_systolic = number(value),
                "bp_diastolic" => ctx.vitals.bp_diastolic = number(value),
                "heart_rate" => ctx.vitals.heart_rate = number(value),
                "respiratory_rate" => ctx.vitals.respiratory_rate = number(value),
                "temperature_f" => ctx.vitals.temperature_f = number(value),
                "hemoglobin" => ctx.labs.hemoglobin = number(value),
                "wbc_count" => ctx.labs.wbc_count = number(value),
                "platelet_count" => ctx.labs.platelet_count = number(value),
                "glucose" => ctx.labs.glucose = number(value),
                "creatinine" => ctx.labs.creatinine = number(value),
                _ if is_set(value) => {
                    ctx.flags.insert(key.clone());
                }
                _ => {}
            }
        }

        ctx
    }

    /// Parse a JSON object. Non-object input yields an empty context.
    pub fn from_json(value: &Value) -> Self {
        value.as_object().map(Self::from_fields).unwrap_or_default()
    }

    pub fn with_case_id(mut self, case_id: impl Into<String>) -> Self {
        self.case_id = Some(case_id.into());
        self
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.insert(flag.into());
        self
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn is_set(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() == Some(1.0),
        _ => false,
    }
}
