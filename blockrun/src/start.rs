//! Orchestration for starting an interactive session.
//!
//! Startup is strictly phased: resolve config, bootstrap the database,
//! discover and load source units (the only phase that writes the registry),
//! freeze the registry, derive namespaces, then hand the read-only views to
//! the navigator. Any failure up to the navigator is fatal.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::core::namespace::derive_namespaces;
use crate::core::registry::Registrar;
use crate::db::{ProviderFactory, open_database};
use crate::exit_codes;
use crate::io::config::load_config;
use crate::io::discover::{ModuleLoader, discover};
use crate::io::manifest::ManifestLoader;
use crate::io::prompt::PromptProvider;
use crate::navigate::{Navigator, SessionEnd};

/// Caller-tunable startup knobs; the binary only sets `config_path`, the
/// loader and provider hooks exist for embedding and tests.
#[derive(Default)]
pub struct StartOptions {
    /// Explicit config file path (`--config`); `None` means the conventional
    /// default resolved against the working directory.
    pub config_path: Option<PathBuf>,
    /// Replacement for the built-in manifest loader.
    pub loader: Option<Box<dyn ModuleLoader>>,
    /// Database bootstrap override, winning over the configured provider.
    pub provider: Option<ProviderFactory>,
}

/// Run one interactive session to completion, returning the process exit code.
pub fn start_session(options: StartOptions, prompt: &mut dyn PromptProvider) -> Result<i32> {
    let config = load_config(options.config_path.as_deref())?;
    debug!(?config, "config resolved");

    let mut db = open_database(&config, options.provider)?;

    let mut registrar = Registrar::new();
    let mut loader: Box<dyn ModuleLoader> = options.loader.unwrap_or(Box::new(ManifestLoader));
    discover(
        &config.root_dir,
        &config.source,
        loader.as_mut(),
        &mut registrar,
    )
    .context("discover source units")?;

    let registry = registrar.finish();
    let namespaces = derive_namespaces(&registry);
    info!(
        blocks = registry.len(),
        namespaces = namespaces.len(),
        "discovery complete"
    );

    let mut navigator = Navigator::new(
        &registry,
        &namespaces,
        db.as_mut(),
        prompt,
        config.page_size,
    );
    match navigator.run()? {
        SessionEnd::NoBlocks => Ok(exit_codes::OK),
    }
}
