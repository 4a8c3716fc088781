//! Stable exit codes for the blockrun binary.

/// Session ended normally (including the empty-registry exit).
pub const OK: i32 = 0;
/// Startup or session failed: bad config path, discovery load failure,
/// invalid provider, or an unrecoverable prompt error.
pub const INVALID: i32 = 1;
