//! Side-effecting pieces of the session: config, discovery, prompting,
//! result rendering.

pub mod config;
pub mod discover;
pub mod manifest;
pub mod prompt;
pub mod render;
