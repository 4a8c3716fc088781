//! Source-unit discovery: glob enumeration plus sequential loading.
//!
//! Discovery resolves configured patterns to an ordered, deduplicated set of
//! absolute unit paths, then loads each unit through a [`ModuleLoader`] with
//! the registrar's current-unit marker set, so every registration made during
//! a load is tagged with its originating unit. Loading is strictly
//! sequential: one unit finishes before the next begins, which is what keeps
//! registration order stable and units from interleaving.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::core::registry::Registrar;
use crate::error::EngineError;

/// Loads one source unit, registering any blocks it declares.
///
/// The built-in implementation is [`crate::io::manifest::ManifestLoader`];
/// embedding callers and tests may supply closures instead.
pub trait ModuleLoader {
    fn load(&mut self, unit: &Path, registrar: &mut Registrar) -> Result<()>;
}

impl<F> ModuleLoader for F
where
    F: FnMut(&Path, &mut Registrar) -> Result<()>,
{
    fn load(&mut self, unit: &Path, registrar: &mut Registrar) -> Result<()> {
        self(unit, registrar)
    }
}

/// Enumerate units under `root` and load each in order.
///
/// A single unit's load failure aborts the whole pass: a partially populated
/// registry is considered untrustworthy.
pub fn discover(
    root: &Path,
    patterns: &[String],
    loader: &mut dyn ModuleLoader,
    registrar: &mut Registrar,
) -> Result<()> {
    let units = resolve_units(root, patterns)?;
    debug!(count = units.len(), root = %root.display(), "discovered source units");

    for unit in units {
        registrar.set_current_unit(&unit);
        loader
            .load(&unit, registrar)
            .map_err(|source| EngineError::DiscoveryLoadFailure {
                unit: unit.clone(),
                source,
            })?;
        registrar.clear_current_unit();
    }
    Ok(())
}

/// Resolve `patterns` against `root` to an ordered set of absolute unit paths.
///
/// Patterns prefixed with `!` are exclusions matched against the unit's
/// root-relative path. Inclusion results keep per-pattern enumeration order
/// with first-seen deduplication.
pub fn resolve_units(root: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut exclusions = Vec::new();
    let mut inclusions = Vec::new();
    for pattern in patterns {
        match pattern.strip_prefix('!') {
            Some(stripped) => exclusions.push(
                glob::Pattern::new(stripped)
                    .with_context(|| format!("invalid exclusion pattern '{pattern}'"))?,
            ),
            None => inclusions.push(pattern.as_str()),
        }
    }

    let root_abs = absolute(root)?;
    let mut seen = HashSet::new();
    let mut units = Vec::new();
    for pattern in inclusions {
        let full = root_abs.join(pattern);
        let full = full
            .to_str()
            .with_context(|| format!("non-utf8 glob pattern under {}", root_abs.display()))?;
        for entry in glob::glob(full).with_context(|| format!("invalid pattern '{pattern}'"))? {
            let path = entry.context("enumerate source units")?;
            if !path.is_file() {
                continue;
            }
            let path = absolute(&path)?;
            if seen.insert(path.clone()) {
                units.push(path);
            }
        }
    }

    units.retain(|unit| {
        let relative = unit.strip_prefix(&root_abs).unwrap_or(unit);
        !exclusions.iter().any(|p| p.matches_path(relative))
    });
    Ok(units)
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if let Ok(canonical) = fs::canonicalize(path) {
        return Ok(canonical);
    }
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("resolve working directory")?;
    Ok(cwd.join(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::Block;
    use crate::io::config::Config;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("mkdir");
        }
        fs::write(path, "").expect("touch");
    }

    #[test]
    fn resolves_in_order_and_applies_exclusions() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path();
        touch(&root.join("b.toml"));
        touch(&root.join("a.toml"));
        touch(&root.join("_internal.toml"));
        touch(&root.join(".hidden.toml"));
        touch(&root.join("sub/c.toml"));
        touch(&root.join("note.md"));

        let units = resolve_units(root, &Config::default().source).expect("resolve");
        let names: Vec<String> = units
            .iter()
            .map(|u| {
                u.strip_prefix(fs::canonicalize(root).expect("canon"))
                    .expect("relative")
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        assert_eq!(names, vec!["a.toml", "b.toml", "sub/c.toml"]);
    }

    #[test]
    fn duplicate_matches_are_deduplicated() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path();
        touch(&root.join("a.toml"));

        let patterns = vec!["**/*.toml".to_string(), "a.toml".to_string()];
        let units = resolve_units(root, &patterns).expect("resolve");
        assert_eq!(units.len(), 1);
    }

    #[test]
    fn loads_units_sequentially_with_marker_set() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path();
        touch(&root.join("a.toml"));
        touch(&root.join("b.toml"));

        let mut registrar = Registrar::new();
        let mut loader = |unit: &Path, registrar: &mut Registrar| -> Result<()> {
            let stem = unit.file_stem().expect("stem").to_string_lossy();
            registrar.register(Block::named(format!("{stem}-1")));
            registrar.register(Block::named(format!("{stem}-2")));
            Ok(())
        };
        discover(root, &Config::default().source, &mut loader, &mut registrar).expect("discover");

        let registry = registrar.finish();
        let names: Vec<String> = registry.all().into_iter().map(|b| b.name).collect();
        assert_eq!(names, vec!["a-1", "a-2", "b-1", "b-2"]);
        // Every registration carries the unit whose load produced it.
        for block in registry.iter() {
            let unit = block.unit.as_ref().expect("tagged");
            assert!(block.name.starts_with(&*unit.file_stem().expect("stem").to_string_lossy()));
        }
    }

    #[test]
    fn load_failure_aborts_the_whole_pass() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path();
        touch(&root.join("a.toml"));
        touch(&root.join("b.toml"));

        let mut loaded = Vec::new();
        let mut registrar = Registrar::new();
        let mut loader = |unit: &Path, _registrar: &mut Registrar| -> Result<()> {
            loaded.push(unit.to_path_buf());
            anyhow::bail!("boom")
        };
        let err = discover(root, &Config::default().source, &mut loader, &mut registrar)
            .expect_err("should fail");
        assert_eq!(loaded.len(), 1, "second unit must not be attempted");
        let engine = err.downcast_ref::<EngineError>().expect("engine error");
        assert!(matches!(engine, EngineError::DiscoveryLoadFailure { .. }));
    }
}
