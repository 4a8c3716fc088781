//! Database handle seam and provider bootstrap.
//!
//! The engine treats the data-access layer as an opaque capability: blocks
//! carry operation names and the handle decides what they mean. Transaction
//! and isolation discipline, if any, belongs entirely to the handle.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde_json::Value;
use tracing::debug;

use crate::error::EngineError;
use crate::io::config::Config;

/// Opaque data-access capability shared by every block invocation.
pub trait Database {
    /// Execute a result-returning operation.
    fn query(&mut self, op: &str, input: &Value) -> Result<Value>;

    /// Execute a side-effecting operation with no result.
    fn run(&mut self, op: &str, input: &Value) -> Result<()>;
}

/// Caller-supplied bootstrap, overriding the configured built-in provider.
pub type ProviderFactory = Box<dyn FnOnce() -> Result<Box<dyn Database>>>;

/// Bootstrap the database handle for this session.
///
/// A factory wins over configuration; otherwise the configured provider must
/// name a recognized built-in, anything else is fatal at startup.
pub fn open_database(config: &Config, factory: Option<ProviderFactory>) -> Result<Box<dyn Database>> {
    if let Some(factory) = factory {
        debug!("bootstrapping database from caller-supplied factory");
        return factory();
    }
    match config.provider.as_str() {
        "memory" => {
            debug!(seed = ?config.seed, "bootstrapping built-in memory provider");
            Ok(Box::new(MemoryDb::open(config.seed.as_deref())?))
        }
        other => Err(EngineError::InvalidProviderConfiguration(other.to_string()).into()),
    }
}

/// Built-in provider: JSON rows grouped into named tables, optionally seeded
/// from a `{ "table": [rows...] }` file. Demo plumbing, not an engine
/// contract.
///
/// Operations are `<table>.<verb>`: queries `all` and `find` (rows whose
/// fields match every field of the input object), runs `insert` and `delete`
/// (delete removes `find`-matching rows).
#[derive(Debug, Default)]
pub struct MemoryDb {
    tables: BTreeMap<String, Vec<Value>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(seed: Option<&Path>) -> Result<Self> {
        let Some(path) = seed else {
            return Ok(Self::new());
        };
        let contents =
            fs::read_to_string(path).with_context(|| format!("read seed {}", path.display()))?;
        let tables: BTreeMap<String, Vec<Value>> =
            serde_json::from_str(&contents).with_context(|| format!("parse seed {}", path.display()))?;
        Ok(Self { tables })
    }
}

fn split_op(op: &str) -> Result<(&str, &str)> {
    op.split_once('.')
        .ok_or_else(|| anyhow!("malformed operation '{op}', expected '<table>.<verb>'"))
}

fn row_matches(row: &Value, input: &Value) -> bool {
    let Some(criteria) = input.as_object() else {
        return true;
    };
    let Some(row) = row.as_object() else {
        return false;
    };
    criteria.iter().all(|(key, want)| row.get(key) == Some(want))
}

impl Database for MemoryDb {
    fn query(&mut self, op: &str, input: &Value) -> Result<Value> {
        let (table, verb) = split_op(op)?;
        let rows = self.tables.get(table).cloned().unwrap_or_default();
        match verb {
            "all" => Ok(Value::Array(rows)),
            "find" => Ok(Value::Array(
                rows.into_iter().filter(|r| row_matches(r, input)).collect(),
            )),
            _ => Err(anyhow!("unknown query operation '{op}'")),
        }
    }

    fn run(&mut self, op: &str, input: &Value) -> Result<()> {
        let (table, verb) = split_op(op)?;
        match verb {
            "insert" => {
                self.tables
                    .entry(table.to_string())
                    .or_default()
                    .push(input.clone());
                Ok(())
            }
            "delete" => {
                if let Some(rows) = self.tables.get_mut(table) {
                    rows.retain(|r| !row_matches(r, input));
                }
                Ok(())
            }
            _ => Err(anyhow!("unknown run operation '{op}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seeded() -> MemoryDb {
        let mut db = MemoryDb::new();
        db.run("users.insert", &json!({ "id": 1, "name": "ada" }))
            .expect("insert");
        db.run("users.insert", &json!({ "id": 2, "name": "grace" }))
            .expect("insert");
        db
    }

    #[test]
    fn find_filters_on_every_input_field() {
        let mut db = seeded();
        let result = db.query("users.find", &json!({ "id": 2 })).expect("query");
        assert_eq!(result, json!([{ "id": 2, "name": "grace" }]));
    }

    #[test]
    fn delete_removes_matching_rows() {
        let mut db = seeded();
        db.run("users.delete", &json!({ "id": 1 })).expect("delete");
        let result = db.query("users.all", &json!({})).expect("query");
        assert_eq!(result.as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn unknown_verb_is_an_operation_failure() {
        let mut db = seeded();
        assert!(db.query("users.upsert", &json!({})).is_err());
        assert!(db.run("users.truncate", &json!({})).is_err());
    }

    #[test]
    fn unknown_provider_is_rejected_at_bootstrap() {
        let config = Config {
            provider: "postgres".to_string(),
            ..Config::default()
        };
        // Destructure rather than expect_err: the Ok side holds a trait
        // object with no Debug bound.
        let Err(err) = open_database(&config, None) else {
            panic!("should fail");
        };
        let engine = err.downcast_ref::<EngineError>().expect("engine error");
        assert!(matches!(
            engine,
            EngineError::InvalidProviderConfiguration(_)
        ));
    }

    #[test]
    fn factory_overrides_configured_provider() {
        let config = Config {
            provider: "not-a-provider".to_string(),
            ..Config::default()
        };
        let factory: ProviderFactory = Box::new(|| Ok(Box::new(MemoryDb::new()) as Box<dyn Database>));
        assert!(open_database(&config, Some(factory)).is_ok());
    }

    #[test]
    fn seed_file_populates_tables() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("seed.json");
        fs::write(&path, r#"{ "items": [{ "sku": "a" }] }"#).expect("write seed");

        let mut db = MemoryDb::open(Some(&path)).expect("open");
        let result = db.query("items.all", &json!({})).expect("query");
        assert_eq!(result, json!([{ "sku": "a" }]));
    }
}
