// SPDX-FileCopyrightText: 2026 Tollgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Strict-mode JSON schema generation and payload validation.

use schemars::{JsonSchema, schema_for};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tollgate_core::{OutputContract, TollgateError};

/// Types that can be requested as OpenAI structured output.
///
/// Automatically implemented for any type that implements `JsonSchema + DeserializeOwned`.
pub trait StructuredOutput: JsonSchema + DeserializeOwned {
    /// Generate an OpenAI strict-mode JSON schema for this type.
    ///
    /// Strict mode requires:
    /// 1. `additionalProperties: false` on all object schemas
    /// 2. ALL properties listed in `required`, even nullable ones
    /// 3. Fully inlined schemas (no `$ref` references)
    fn openai_schema() -> Value {
        let mut value: Value = schema_for!(Self).into();

        fix_object_schemas(&mut value);
        inline_refs(&mut value);

        if let Value::Object(map) = &mut value {
            map.remove("$defs");
            map.remove("definitions");
            map.remove("$schema");
            map.remove("title");
        }

        value
    }

    fn type_name() -> String {
        <Self as JsonSchema>::schema_name().into_owned()
    }

    /// An output contract for this type, labelled with its schema name.
    fn output_contract() -> OutputContract {
        OutputContract::new(Self::openai_schema()).with_name(Self::type_name())
    }
}

impl<T: JsonSchema + DeserializeOwned> StructuredOutput for T {}

/// Checks a parsed payload against the contract schema.
pub fn validate_payload(schema: &Value, payload: &Value) -> Result<(), TollgateError> {
    let validator = jsonschema::validator_for(schema)
        .map_err(|e| TollgateError::Schema(format!("invalid output schema: {e}")))?;

    let problems: Vec<String> = validator
        .iter_errors(payload)
        .map(|e| format!("{} at `{}`", e, e.instance_path))
        .collect();

    if problems.is_empty() {
        Ok(())
    } else {
        Err(TollgateError::Schema(format!(
            "response does not match schema: {}",
            problems.join("; ")
        )))
    }
}

fn fix_object_schemas(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if map.get("type") == Some(&Value::String("object".to_string())) {
                map.insert("additionalProperties".to_string(), Value::Bool(false));

                if let Some(Value::Object(props)) = map.get("properties") {
                    let all_keys: Vec<Value> =
                        props.keys().map(|k| Value::String(k.clone())).collect();
                    map.insert("required".to_string(), Value::Array(all_keys));
                }
            }

            for (_, v) in map.iter_mut() {
                fix_object_schemas(v);
            }
        }
        Value::Array(arr) => {
            for item in arr.iter_mut() {
                fix_object_schemas(item);
            }
        }
        _ => {}
    }
}

fn inline_refs(value: &mut Value) {
    let definitions = match value {
        Value::Object(map) => map.get("$defs").or_else(|| map.get("definitions")).cloned(),
        _ => None,
    };

    if let Some(defs) = definitions {
        inline_refs_recursive(value, &defs);
    }
}

fn inline_refs_recursive(value: &mut Value, definitions: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(ref_path)) = map.get("$ref").cloned() {
                let type_name = ref_path
                    .strip_prefix("#/$defs/")
                    .or_else(|| ref_path.strip_prefix("#/definitions/"));
                if let Some(def) = type_name.and_then(|name| definitions.get(name)) {
                    *value = def.clone();
                    inline_refs_recursive(value, definitions);
                    return;
                }
            }

            if let Some(Value::Array(all_of)) = map.get("allOf").cloned() {
                if let [single] = all_of.as_slice() {
                    *value = single.clone();
                    inline_refs_recursive(value, definitions);
                    return;
                }
            }

            for (_, v) in map.iter_mut() {
                inline_refs_recursive(v, definitions);
            }
        }
        Value::Array(arr) => {
            for item in arr.iter_mut() {
                inline_refs_recursive(item, definitions);
            }
        }
        _ => {}
    }
}
