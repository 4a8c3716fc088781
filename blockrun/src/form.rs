//! Schema-driven form synthesis over the prompt provider.
//!
//! Walks a descriptor, asking one question per leaf, and produces the input
//! value for a block. Synthesis is recursive for objects only: array
//! elements are deliberately collected as trimmed strings regardless of the
//! declared item schema (a documented quirk of the block contract, kept
//! as-is).

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use tracing::debug;

use crate::core::schema::Schema;
use crate::error::EngineError;
use crate::io::prompt::PromptProvider;

/// Synthesize a complete input for `schema`, including the re-validation
/// loop for top-level non-object shapes.
///
/// Returns `Ok(None)` when the schema contains a kind the form cannot
/// render: the whole form unwinds (no field-by-field retry) so the caller
/// can return to block selection. Top-level validation failures print their
/// errors and restart synthesis from scratch, without bound.
///
/// Object-shaped top-level schemas are assembled from per-field synthesis
/// and are not re-validated as a whole.
pub fn run_form(prompt: &mut dyn PromptProvider, schema: &Schema) -> Result<Option<Value>> {
    loop {
        let value = match synthesize(prompt, schema) {
            Ok(value) => value,
            Err(err) => match err.downcast_ref::<EngineError>() {
                Some(EngineError::UnsupportedFieldKind(kind)) => {
                    eprintln!("error: unsupported field kind: {kind}");
                    return Ok(None);
                }
                _ => return Err(err),
            },
        };

        if matches!(schema, Schema::Object { .. }) {
            return Ok(Some(value));
        }
        match schema.validate(&value) {
            Ok(()) => return Ok(Some(value)),
            Err(errors) => {
                eprintln!("error validating input:");
                for error in &errors {
                    eprintln!("  - {error}");
                }
                debug!(count = errors.len(), "restarting form after validation failure");
            }
        }
    }
}

/// One synthesis pass for the whole schema, without top-level re-validation.
pub fn synthesize(prompt: &mut dyn PromptProvider, schema: &Schema) -> Result<Value> {
    synthesize_field(prompt, "input", schema)
}

fn synthesize_field(prompt: &mut dyn PromptProvider, name: &str, schema: &Schema) -> Result<Value> {
    match schema {
        Schema::String => {
            let answer = prompt.input(&format!("Enter value for {name} (string):"), None)?;
            Ok(Value::String(answer))
        }
        Schema::Number => {
            // Non-finite parses ("nan", "inf") are rejected here so the
            // provider re-asks instead of the session aborting downstream.
            let check = |answer: &str| -> Result<(), String> {
                match answer.trim().parse::<f64>() {
                    Ok(n) if n.is_finite() => Ok(()),
                    _ => Err("Please enter a valid number".to_string()),
                }
            };
            let answer =
                prompt.input(&format!("Enter value for {name} (number):"), Some(&check))?;
            Ok(Value::Number(parse_number(answer.trim())?))
        }
        Schema::Boolean => {
            let choices = vec!["true".to_string(), "false".to_string()];
            let chosen = prompt.select(&format!("Select value for {name} (boolean):"), &choices)?;
            Ok(Value::Bool(chosen == 0))
        }
        Schema::Array { .. } => {
            // One comma-separated line; items stay strings whatever the
            // declared item schema says.
            let answer = prompt.input(&format!("Enter values for {name} (comma separated):"), None)?;
            Ok(Value::Array(
                answer
                    .split(',')
                    .map(|item| Value::String(item.trim().to_string()))
                    .collect(),
            ))
        }
        Schema::Enum { choices } => {
            let chosen = prompt.select(&format!("Select value for {name} (enum):"), choices)?;
            Ok(Value::String(choices[chosen].clone()))
        }
        Schema::Object { fields } => {
            let mut value = Map::new();
            for field in fields {
                let field_value = synthesize_field(prompt, &field.name, &field.schema)?;
                value.insert(field.name.clone(), field_value);
            }
            Ok(Value::Object(value))
        }
        Schema::Other(kind) => Err(EngineError::UnsupportedFieldKind(kind.clone()).into()),
    }
}

/// Integers stay integral; everything else becomes a finite float.
fn parse_number(answer: &str) -> Result<serde_json::Number> {
    if let Ok(integer) = answer.parse::<i64>() {
        return Ok(serde_json::Number::from(integer));
    }
    let float: f64 = answer
        .parse()
        .context("prompt provider returned a non-numeric answer")?;
    serde_json::Number::from_f64(float).context("number must be finite")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::Field;
    use crate::test_support::{Reply, ScriptedPrompt};
    use serde_json::json;

    fn object_schema() -> Schema {
        Schema::Object {
            fields: vec![
                Field {
                    name: "id".to_string(),
                    schema: Schema::Number,
                },
                Field {
                    name: "name".to_string(),
                    schema: Schema::String,
                },
                Field {
                    name: "role".to_string(),
                    schema: Schema::Enum {
                        choices: vec!["admin".to_string(), "user".to_string()],
                    },
                },
            ],
        }
    }

    #[test]
    fn object_fields_are_asked_in_declared_order() {
        let mut prompt = ScriptedPrompt::new([
            Reply::Input("7"),
            Reply::Input("ada"),
            Reply::Select("admin"),
        ]);
        let value = run_form(&mut prompt, &object_schema())
            .expect("form")
            .expect("not aborted");

        assert_eq!(value, json!({ "id": 7, "name": "ada", "role": "admin" }));
        assert!(prompt.transcript[0].contains("id"));
        assert!(prompt.transcript[1].contains("name"));
        assert!(prompt.transcript[2].contains("role"));
    }

    #[test]
    fn supported_scalar_kinds_never_abort() {
        let cases: Vec<(Schema, Reply, Value)> = vec![
            (Schema::String, Reply::Input("hello"), json!("hello")),
            (Schema::Number, Reply::Input("2.5"), json!(2.5)),
            (Schema::Boolean, Reply::Select("false"), json!(false)),
            (
                Schema::Enum {
                    choices: vec!["on".to_string(), "off".to_string()],
                },
                Reply::Select("off"),
                json!("off"),
            ),
        ];
        for (schema, reply, expected) in cases {
            let mut prompt = ScriptedPrompt::new([reply]);
            let value = run_form(&mut prompt, &schema)
                .expect("form")
                .expect("not aborted");
            assert_eq!(value, expected);
        }
    }

    #[test]
    fn array_items_are_trimmed_strings_regardless_of_item_schema() {
        let schema = Schema::Array {
            items: Box::new(Schema::String),
        };
        let mut prompt = ScriptedPrompt::new([Reply::Input(" a, b ,c ")]);
        let value = run_form(&mut prompt, &schema)
            .expect("form")
            .expect("not aborted");
        assert_eq!(value, json!(["a", "b", "c"]));
    }

    #[test]
    fn unsupported_kind_unwinds_the_whole_form() {
        let schema = Schema::Object {
            fields: vec![
                Field {
                    name: "id".to_string(),
                    schema: Schema::Number,
                },
                Field {
                    name: "blob".to_string(),
                    schema: Schema::Other("binary".to_string()),
                },
                Field {
                    name: "never-asked".to_string(),
                    schema: Schema::String,
                },
            ],
        };
        let mut prompt = ScriptedPrompt::new([Reply::Input("1")]);
        let outcome = run_form(&mut prompt, &schema).expect("form");
        assert_eq!(outcome, None);
        // Only the first field was prompted; the unsupported field fails
        // without asking and the third is never reached.
        assert_eq!(prompt.transcript.len(), 1);
    }

    #[test]
    fn non_finite_number_input_is_re_asked() {
        let mut prompt = ScriptedPrompt::new([
            Reply::Input("nan"),
            Reply::Input("inf"),
            Reply::Input("2.5"),
        ]);
        let value = run_form(&mut prompt, &Schema::Number)
            .expect("form")
            .expect("not aborted");
        assert_eq!(value, json!(2.5));
        // One re-ask per rejected answer, then the accepted one.
        assert_eq!(prompt.transcript.len(), 3);
    }

    #[test]
    fn integer_input_stays_integral() {
        let mut prompt = ScriptedPrompt::new([Reply::Input("42")]);
        let value = synthesize(&mut prompt, &Schema::Number).expect("synthesize");
        assert_eq!(value, json!(42));
    }
}
