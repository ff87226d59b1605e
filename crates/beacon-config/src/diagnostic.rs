// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rich diagnostics for configuration failures.
//!
//! Figment errors are turned into miette diagnostics. Unknown keys get a
//! "did you mean" hint ranked by Jaro-Winkler similarity and, when the key can
//! be located in a source file, a labelled span.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity for a suggestion to be offered.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration error with rich diagnostic information.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key that no section declares.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(code(beacon::config::unknown_key), help("{help}"))]
    UnknownKey {
        key: String,
        help: String,
        #[label("not a recognized key")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value of the wrong type.
    #[error("`{key}` has the wrong type: {detail}")]
    #[diagnostic(code(beacon::config::invalid_type))]
    InvalidType { key: String, detail: String },

    /// A required key without a default.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(beacon::config::missing_key),
        help("add `{key} = <value>` to your beacon.toml")
    )]
    MissingKey { key: String },

    /// A value that parsed but violates a semantic rule.
    #[error("validation error: {message}")]
    #[diagnostic(code(beacon::config::validation))]
    Validation { message: String },

    /// Anything else figment reports.
    #[error("configuration error: {0}")]
    #[diagnostic(code(beacon::config::other))]
    Other(String),
}

impl ConfigError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Convert every error carried by a `figment::Error` into a diagnostic.
///
/// `sources` pairs file paths with their contents so unknown keys can be
/// pointed at.
pub fn figment_to_config_errors(
    err: figment::Error,
    sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| {
            let dotted = error
                .path
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(".");
            match &error.kind {
                Kind::UnknownField(field, expected) => {
                    let (span, src) = locate(&error, field, sources);
                    ConfigError::UnknownKey {
                        key: field.clone(),
                        help: unknown_key_help(field, expected),
                        span,
                        src,
                    }
                }
                Kind::MissingField(field) => ConfigError::MissingKey {
                    key: field.to_string(),
                },
                Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                    key: dotted,
                    detail: format!("found {actual}, expected {expected}"),
                },
                _ => ConfigError::Other(error.to_string()),
            }
        })
        .collect()
}

fn unknown_key_help(field: &str, expected: &[&str]) -> String {
    let valid = expected.join(", ");
    match suggest_key(field, expected) {
        Some(best) => format!("did you mean `{best}`? Valid keys: {valid}"),
        None => format!("valid keys: {valid}"),
    }
}

/// Point at the offending key inside the file figment read it from.
fn locate(
    error: &figment::Error,
    field: &str,
    sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let Some(figment::Source::File(path)) = error.metadata.as_ref().and_then(|m| m.source.as_ref())
    else {
        return (None, None);
    };
    let path = path.display().to_string();
    let Some((name, content)) = sources.iter().find(|(p, _)| *p == path) else {
        return (None, None);
    };

    match find_key_offset(content, &error.path, field) {
        Some(offset) => (
            Some(SourceSpan::new(offset.into(), field.len())),
            Some(NamedSource::new(name, content.clone())),
        ),
        None => (None, None),
    }
}

/// Byte offset of `field` as a key inside the section named by `path[0]`.
///
/// Top-level keys (empty `path`) are searched from the start of the file.
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let start = match path.first() {
        Some(section) => {
            let header = format!("[{section}]");
            content.find(&header)? + header.len()
        }
        None => 0,
    };

    let mut offset = start;
    for line in content[start..].split_inclusive('\n') {
        let indent = line.len() - line.trim_start().len();
        let is_key = line.trim_start().strip_prefix(field).is_some_and(|after| {
            after.starts_with(|c: char| c == '=' || c.is_whitespace())
        });
        if is_key {
            return Some(offset + indent);
        }
        offset += line.len();
    }
    None
}

/// Best-matching valid key for a typo, if any is close enough.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Render diagnostics to stderr using miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        match handler.render_report(&mut buf, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{buf}"),
            Err(_) => eprintln!("Error: {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_capacity_for_capacty() {
        let valid = &["capacity", "journal_path"];
        assert_eq!(suggest_key("capacty", valid), Some("capacity".to_string()));
    }

    #[test]
    fn suggests_timeout_key_for_typo() {
        let valid = &["text_timeout_secs", "voice_timeout_secs"];
        assert_eq!(
            suggest_key("voice_timout_secs", valid),
            Some("voice_timeout_secs".to_string())
        );
    }

    #[test]
    fn no_suggestion_for_distant_typo() {
        let valid = &["config_path", "key_path"];
        assert_eq!(suggest_key("zzzzzz", valid), None);
    }

    #[test]
    fn find_key_offset_in_section() {
        let content = "[logging]\nlevel = \"info\"\n[ledger]\n  capacty = 3\n";
        let path = vec!["ledger".to_string()];
        let o = find_key_offset(content, &path, "capacty").unwrap();
        assert_eq!(&content[o..o + 7], "capacty");
    }

    #[test]
    fn missing_section_yields_no_offset() {
        let content = "[logging]\nlevel = \"info\"\n";
        let path = vec!["ledger".to_string()];
        assert_eq!(find_key_offset(content, &path, "capacity"), None);
    }

    #[test]
    fn prefix_of_longer_key_is_not_a_match() {
        let content = "[store]\nkey_path_old = 1\nkey_path = 2\n";
        let path = vec!["store".to_string()];
        let o = find_key_offset(content, &path, "key_path").unwrap();
        assert!(content[o..].starts_with("key_path = 2"));
    }
}
