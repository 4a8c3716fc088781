//! Grouping of registered blocks by originating source unit.

use std::path::PathBuf;

use crate::core::registry::{Block, Registry};

/// Named grouping of blocks that share an originating unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Namespace {
    /// Base name of the unit, no directories and no extension.
    pub name: String,
    pub unit: PathBuf,
    /// Ordered subsequence of the registry belonging to this unit.
    pub blocks: Vec<Block>,
}

/// Derive namespaces from a finished registry, once, after discovery.
///
/// Single pass in registration order: the first block seen for a unit creates
/// that unit's namespace, later blocks append to it, so namespace order is
/// first-seen order. Blocks without an originating unit belong to no
/// namespace (they stay reachable through the flat registry).
pub fn derive_namespaces(registry: &Registry) -> Vec<Namespace> {
    let mut namespaces: Vec<Namespace> = Vec::new();

    for block in registry.iter() {
        let Some(unit) = block.unit.clone() else {
            continue;
        };
        match namespaces.iter_mut().find(|n| n.unit == unit) {
            Some(namespace) => namespace.blocks.push(block.clone()),
            None => {
                let name = unit
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default();
                namespaces.push(Namespace {
                    name,
                    unit,
                    blocks: vec![block.clone()],
                });
            }
        }
    }

    namespaces
}
