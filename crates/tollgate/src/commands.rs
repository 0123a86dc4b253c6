// SPDX-FileCopyrightText: 2026 Tollgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subcommand implementations. Each returns the text to print on stdout.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use tollgate_accountant::{Accountant, ProcessOptions};
use tollgate_config::TollgateConfig;
use tollgate_core::{OutputContract, TiktokenTokenizer, Tokenizer, TollgateError};
use tollgate_cost::{PriceTable, calculate_cost};
use tracing::debug;

/// Arguments of `tollgate process`.
pub struct ProcessArgs {
    pub prompt: String,
    pub schema: PathBuf,
    pub name: Option<String>,
    pub temperature: Option<f32>,
    pub user: Option<String>,
}

pub async fn run_process(
    config: &TollgateConfig,
    args: ProcessArgs,
) -> Result<String, TollgateError> {
    let contract = load_contract(&args.schema, args.name).await?;
    let accountant = Accountant::from_config(config).await?;

    let mut options = ProcessOptions::new(contract);
    options.temperature = args.temperature;
    options.user = args.user;

    let envelope = accountant.process(&args.prompt, options).await?;
    to_pretty_json(&envelope)
}

pub fn run_count(config: &TollgateConfig, text: &str) -> Result<String, TollgateError> {
    let tokens = TiktokenTokenizer::new().count_tokens(&config.openai.model, text)?;
    Ok(tokens.to_string())
}

pub fn run_cost(
    config: &TollgateConfig,
    input: u64,
    output: u64,
    model: Option<&str>,
) -> Result<String, TollgateError> {
    let model = model.unwrap_or(&config.openai.model);
    let table = PriceTable::from_config(&config.pricing);
    match calculate_cost(&table, model, input, output) {
        Some(cost) => to_pretty_json(&cost),
        None => Ok(format!("no pricing for model `{model}`")),
    }
}

pub fn run_models(config: &TollgateConfig) -> Result<String, TollgateError> {
    let table = PriceTable::from_config(&config.pricing);
    let mut out = String::new();
    for model in table.models() {
        if let Some(pricing) = table.lookup(model) {
            let _ = writeln!(
                out,
                "{model}\tinput ${}/MTok\toutput ${}/MTok",
                pricing.input_per_mtok, pricing.output_per_mtok
            );
        }
    }
    Ok(out.trim_end().to_string())
}

/// Reads a JSON schema file into an output contract.
async fn load_contract(
    path: &Path,
    name: Option<String>,
) -> Result<OutputContract, TollgateError> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        TollgateError::Config(format!("failed to read schema file `{}`: {e}", path.display()))
    })?;
    let schema: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
        TollgateError::Schema(format!("`{}` is not valid JSON: {e}", path.display()))
    })?;
    debug!(path = %path.display(), "loaded output schema");

    let contract = OutputContract::new(schema);
    Ok(match name {
        Some(name) => contract.with_name(name),
        None => contract,
    })
}

fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<String, TollgateError> {
    serde_json::to_string_pretty(value).map_err(|e| TollgateError::Processing {
        message: format!("failed to render output: {e}"),
        source: Some(Box::new(e)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_for_configured_model() {
        let config = TollgateConfig::default();
        let out = run_cost(&config, 800, 200, None).unwrap();
        let cost: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(cost["total_cost"], 0.00024);
        assert_eq!(cost["currency"], "USD");
    }

    #[test]
    fn cost_for_unpriced_model() {
        let config = TollgateConfig::default();
        let out = run_cost(&config, 1, 1, Some("mystery")).unwrap();
        assert_eq!(out, "no pricing for model `mystery`");
    }

    #[test]
    fn models_lists_sorted_defaults() {
        let out = run_models(&TollgateConfig::default()).unwrap();
        let names: Vec<&str> = out.lines().filter_map(|l| l.split('\t').next()).collect();
        assert!(names.contains(&"gpt-4o-mini"));
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn count_empty_text() {
        assert_eq!(run_count(&TollgateConfig::default(), "").unwrap(), "0");
    }

    #[tokio::test]
    async fn contract_from_schema_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        std::fs::write(&path, r#"{"type": "object"}"#).unwrap();

        let contract = load_contract(&path, Some("capital".into())).await.unwrap();
        assert_eq!(contract.effective_name(), "capital");
        assert_eq!(contract.schema["type"], "object");

        let contract = load_contract(&path, None).await.unwrap();
        assert_eq!(contract.effective_name(), "data");
    }

    #[tokio::test]
    async fn invalid_schema_file_is_schema_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_contract(&path, None).await.unwrap_err();
        assert_eq!(err.kind(), tollgate_core::ErrorKind::Schema);
    }
}
