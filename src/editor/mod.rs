//! The interactive editing boundary over an owned curve model.

/// Surface-facing mutation entry points.
pub mod surface;
