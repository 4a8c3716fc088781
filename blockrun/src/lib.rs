//! Interactive runner for named, schema-validated database blocks.
//!
//! Blocks are declared in TOML manifests discovered under a configured root,
//! registered into a process-wide append-only registry, grouped into
//! namespaces by originating unit, and executed through a terminal menu. The
//! architecture enforces a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (schemas, registry, namespaces,
//!   pagination). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (config, discovery, prompting,
//!   rendering). Isolated behind traits to enable scripting in tests.
//!
//! Orchestration modules ([`form`], [`navigate`], [`start`]) coordinate core
//! logic with I/O to implement the interactive session.

pub mod core;
pub mod db;
pub mod error;
pub mod exit_codes;
pub mod form;
pub mod io;
pub mod logging;
pub mod navigate;
pub mod start;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
