// SPDX-FileCopyrightText: 2026 Tollgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns figment extraction failures into miette diagnostics.
//!
//! Unknown keys point at the offending line of the TOML file that defines
//! them and suggest the closest valid key.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use figment::error::Kind;
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Jaro-Winkler score a valid key must beat to be suggested.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration problem ready to be rendered.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(code(tollgate::config::unknown_key))]
    UnknownKey {
        key: String,
        suggestion: Option<String>,
        #[help]
        help: String,
        #[label("not a recognized key")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(tollgate::config::invalid_type))]
    InvalidType { key: String, detail: String },

    /// Only reachable inside `[pricing.models.*]`; every other key has a default.
    #[error("missing required key `{key}`")]
    #[diagnostic(code(tollgate::config::missing_key))]
    MissingKey { key: String },

    #[error("validation error: {message}")]
    #[diagnostic(code(tollgate::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(tollgate::config::other))]
    Other(String),
}

impl ConfigError {
    fn unknown_key(
        key: &str,
        section: &[String],
        expected: &[&str],
        sources: &[(String, String)],
    ) -> Self {
        let suggestion = suggest_key(key, expected);
        let valid = expected.join(", ");
        let help = match &suggestion {
            Some(s) => format!("did you mean `{s}`? valid keys: {valid}"),
            None => format!("valid keys: {valid}"),
        };

        // Later sources take precedence, so search them first.
        let located = sources.iter().rev().find_map(|(name, content)| {
            find_key_offset(content, section, key).map(|offset| (name, content, offset))
        });
        let (span, src) = match located {
            Some((name, content, offset)) => (
                Some(SourceSpan::new(offset.into(), key.len())),
                Some(NamedSource::new(name, content.clone())),
            ),
            None => (None, None),
        };

        ConfigError::UnknownKey {
            key: key.to_string(),
            suggestion,
            help,
            span,
            src,
        }
    }
}

/// Converts every error carried by `err` into a diagnostic.
///
/// `sources` holds `(name, content)` pairs of the TOML files that were
/// merged, in precedence order.
pub fn figment_to_config_errors(
    err: figment::Error,
    sources: &[(String, String)],
) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| match &error.kind {
            Kind::UnknownField(field, expected) => {
                ConfigError::unknown_key(field, &error.path, expected, sources)
            }
            Kind::MissingField(field) => ConfigError::MissingKey {
                key: dotted_key(&error.path, field),
            },
            Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                key: error.path.join("."),
                detail: format!("found {actual}, expected {expected}"),
            },
            _ => ConfigError::Other(error.to_string()),
        })
        .collect()
}

fn dotted_key(path: &[String], field: &str) -> String {
    path.iter()
        .map(String::as_str)
        .chain(std::iter::once(field))
        .collect::<Vec<_>>()
        .join(".")
}

/// Byte offset of `field` inside the table `[path]` of a TOML document.
///
/// An empty `path` searches from the top of the document. The search stops
/// at the next table header. Quoted header segments match unquoted path
/// segments.
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let header = format!("[{}]", path.join("."));
    let mut in_table = path.is_empty();
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let trimmed = line.trim();
        if trimmed.starts_with('[') {
            if in_table && !path.is_empty() {
                return None;
            }
            in_table = trimmed.replace('"', "") == header;
        } else if in_table {
            let indent = line.len() - line.trim_start().len();
            let rest = line.trim_start().strip_prefix(field);
            if rest.is_some_and(|r| r.trim_start().starts_with('=')) {
                return Some(offset + indent);
            }
        }
        offset += line.len();
    }

    None
}

/// Closest valid key by Jaro-Winkler similarity, if any is close enough.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|&key| (key, strsim::jaro_winkler(unknown, key)))
        .filter(|(_, score)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(key, _)| key.to_string())
}

/// Prints each error to stderr with miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        match handler.render_report(&mut buf, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{buf}"),
            Err(_) => eprintln!("error: {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(section: &str) -> Vec<String> {
        vec![section.to_string()]
    }

    #[test]
    fn suggests_closest_key() {
        let valid = &["max_input_tokens", "max_output_tokens"];
        assert_eq!(
            suggest_key("max_input_tokns", valid).as_deref(),
            Some("max_input_tokens")
        );
        let valid = &["api_key", "model", "base_url", "timeout_secs", "user"];
        assert_eq!(suggest_key("modle", valid).as_deref(), Some("model"));
        assert_eq!(suggest_key("zzzzzz", valid), None);
    }

    #[test]
    fn key_offset_inside_section() {
        let content = "[openai]\nmodel = \"x\"\n\n[budget]\nmax_input_tokns = 3\n";
        let o = find_key_offset(content, &path("budget"), "max_input_tokns").unwrap();
        assert_eq!(&content[o..o + 15], "max_input_tokns");
    }

    #[test]
    fn key_offset_stops_at_next_table() {
        let content = "[budget]\n\n[openai]\nmodle = \"x\"\n";
        assert!(find_key_offset(content, &path("budget"), "modle").is_none());
        assert!(find_key_offset(content, &path("prompt"), "modle").is_none());
    }

    #[test]
    fn key_offset_in_nested_table() {
        let content = "[pricing.models.\"mine\"]\ninput = 1.0\n  outptu = 2.0\n";
        let section = vec![
            "pricing".to_string(),
            "models".to_string(),
            "mine".to_string(),
        ];
        let o = find_key_offset(content, &section, "outptu").unwrap();
        assert_eq!(&content[o..o + 6], "outptu");
    }

    #[test]
    fn unknown_key_points_at_highest_precedence_source() {
        let sources = vec![
            ("system.toml".to_string(), "[budget]\nmax_tokens = 1\n".to_string()),
            ("local.toml".to_string(), "[budget]\n\nmax_tokens = 2\n".to_string()),
        ];
        let error = ConfigError::unknown_key(
            "max_tokens",
            &path("budget"),
            &["max_input_tokens", "max_output_tokens"],
            &sources,
        );
        match error {
            ConfigError::UnknownKey { span, src, help, .. } => {
                assert_eq!(span.unwrap().offset(), 10);
                assert_eq!(src.unwrap().name(), "local.toml");
                assert!(help.contains("valid keys: max_input_tokens, max_output_tokens"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_key_is_dotted() {
        assert_eq!(dotted_key(&[], "model"), "model");
        assert_eq!(dotted_key(&path("openai"), "model"), "openai.model");
    }
}
