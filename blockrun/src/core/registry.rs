//! Block records and the two-phase block registry.
//!
//! The registry has a write phase (discovery appends through [`Registrar`])
//! and a read phase ([`Registry`], produced once by [`Registrar::finish`]).
//! Nothing mutates a block after registration and nothing is ever removed,
//! so the navigator only ever sees an immutable snapshot.

use std::path::{Path, PathBuf};

use crate::core::schema::Schema;

/// A named, user-invocable operation discovered from a source unit.
///
/// `query` and `run` are operation names interpreted by the database handle;
/// a block may carry either, both, or neither.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub name: String,
    pub description: Option<String>,
    pub danger: bool,
    pub schema: Option<Schema>,
    pub query: Option<String>,
    pub run: Option<String>,
    /// Source unit that registered this block, set during discovery.
    pub unit: Option<PathBuf>,
}

impl Block {
    /// Minimal block with just a name; discovery fills in the rest.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            danger: false,
            schema: None,
            query: None,
            run: None,
            unit: None,
        }
    }
}

/// Write handle for the discovery phase.
///
/// Registration order is preserved exactly; duplicate names are accepted
/// (lookup resolves to the first registered, see [`Registry::find_by_name`]).
#[derive(Debug, Default)]
pub struct Registrar {
    blocks: Vec<Block>,
    current_unit: Option<PathBuf>,
}

impl Registrar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the unit whose load is in progress; registrations made until
    /// [`Registrar::clear_current_unit`] are tagged with it.
    pub fn set_current_unit(&mut self, unit: impl Into<PathBuf>) {
        self.current_unit = Some(unit.into());
    }

    pub fn clear_current_unit(&mut self) {
        self.current_unit = None;
    }

    /// Append a block. Never deduplicates, never fails.
    pub fn register(&mut self, mut block: Block) {
        if block.unit.is_none() {
            block.unit = self.current_unit.clone();
        }
        self.blocks.push(block);
    }

    /// End the write phase, yielding the read-only registry.
    pub fn finish(self) -> Registry {
        Registry {
            blocks: self.blocks,
        }
    }
}

/// Read-only view of all registered blocks, in registration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Registry {
    blocks: Vec<Block>,
}

impl Registry {
    /// Defensive copy of the full ordered sequence; callers may hold it
    /// without observing later state (there is none, but the contract is
    /// independence).
    pub fn all(&self) -> Vec<Block> {
        self.blocks.clone()
    }

    /// First block with the given name, or `None`.
    pub fn find_by_name(&self, name: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// First block in `blocks` carrying `name`, mirroring the registry's
/// first-registered-wins lookup for scoped (per-namespace) lists.
pub fn first_by_name<'a>(blocks: &'a [Block], name: &str) -> Option<&'a Block> {
    blocks.iter().find(|b| b.name == name)
}

/// Blocks originating from `unit`, in registration order.
pub fn blocks_for_unit<'a>(blocks: &'a [Block], unit: &Path) -> Vec<&'a Block> {
    blocks
        .iter()
        .filter(|b| b.unit.as_deref() == Some(unit))
        .collect()
}
