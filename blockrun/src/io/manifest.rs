//! Block manifests: the built-in source-unit format.
//!
//! A unit is a TOML file declaring `[[block]]` entries. Loading a manifest
//! registers its blocks in declaration order; the discovery pass tags each
//! registration with the manifest's path.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use crate::core::registry::{Block, Registrar};
use crate::core::schema::Schema;
use crate::io::discover::ModuleLoader;

#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(default, rename = "block")]
    pub blocks: Vec<ManifestBlock>,
}

/// One `[[block]]` entry as written in a manifest.
#[derive(Debug, Deserialize)]
pub struct ManifestBlock {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub danger: bool,
    pub schema: Option<Schema>,
    /// Operation name the database handle resolves for a result-returning call.
    pub query: Option<String>,
    /// Operation name for a side-effecting call with no result.
    pub run: Option<String>,
}

impl ManifestBlock {
    fn into_block(self) -> Result<Block> {
        if self.name.is_empty() {
            return Err(anyhow!("block name must be non-empty"));
        }
        Ok(Block {
            name: self.name,
            description: self.description,
            danger: self.danger,
            schema: self.schema,
            query: self.query,
            run: self.run,
            unit: None,
        })
    }
}

pub fn parse_manifest(contents: &str) -> Result<Manifest> {
    let manifest: Manifest = toml::from_str(contents).context("parse block manifest")?;
    Ok(manifest)
}

/// Loads TOML block manifests. The default [`ModuleLoader`] for discovery.
#[derive(Debug, Default)]
pub struct ManifestLoader;

impl ModuleLoader for ManifestLoader {
    fn load(&mut self, unit: &Path, registrar: &mut Registrar) -> Result<()> {
        let contents =
            fs::read_to_string(unit).with_context(|| format!("read {}", unit.display()))?;
        let manifest = parse_manifest(&contents)?;
        for entry in manifest.blocks {
            registrar.register(entry.into_block()?);
        }
        Ok(())
    }
}
