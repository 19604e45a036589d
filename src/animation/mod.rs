//! Progress animation: easing curves and the explicit tween driver.

/// Easing curves.
pub mod ease;
/// Progress interpolation driver.
pub mod tween;
