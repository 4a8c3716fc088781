//! Named error conditions of the session engine.
//!
//! Fatal conditions unwind through `anyhow` to the binary edge and exit
//! non-zero. Recoverable conditions (`UnsupportedFieldKind`) are caught by
//! downcast at their recovery point and turn into a menu transition instead.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Explicit `--config` path does not exist. Fatal before discovery.
    #[error("config file does not exist: {0}")]
    ConfigPathInvalid(PathBuf),

    /// A schema declares a kind the form synthesizer cannot render.
    /// Recovered: the whole form unwinds back to block selection.
    #[error("unsupported field kind: {0}")]
    UnsupportedFieldKind(String),

    /// Menu-driven selection named a block the scoped list does not hold.
    /// A contract violation, not a user error.
    #[error("block not found: {0}")]
    BlockNotFound(String),

    /// A source unit failed to load. Fatal: a partial registry is not
    /// trustworthy, so the whole discovery pass aborts.
    #[error("failed to load {}", unit.display())]
    DiscoveryLoadFailure {
        unit: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// The configured database bootstrap is neither a recognized built-in
    /// nor a caller-supplied factory. Fatal at startup.
    #[error("invalid database provider '{0}': expected a built-in name or a provider factory")]
    InvalidProviderConfiguration(String),
}
