//! Encoding sinks.
//!
//! Sinks consume rendered frames in presentation-time order; the export loop
//! pushes into them only as fast as it pulls frames from the session.

/// `ffmpeg`-based MP4 sink (system `ffmpeg` over stdin).
pub mod ffmpeg;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
