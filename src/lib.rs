//! Curvet is an interactive quadratic Bezier curve editing core with a
//! progressive curve-reveal video renderer.
//!
//! A [`CurveModel`] owns three normalized control points and the viewport
//! they map into; a [`Sampler`] turns a progress value into point sequences
//! and flat coordinate buffers; the [`CurveCompositor`] layers the revealed
//! curve, its chord and anchor markers over background frames from a
//! [`FrameSource`]; and a [`RenderSession`] drives presentation time forward,
//! yielding `(frame, timestamp)` pairs that the export loop streams into a
//! [`FrameSink`] (MP4 via the system `ffmpeg`).
//!
//! # Pipeline overview
//!
//! 1. **Model**: normalized control points + viewport -> pixel-space curve
//! 2. **Sample**: `progress -> Vec<Point>` (a progressive reveal of the curve)
//! 3. **Composite**: background + samples -> output frame (data-parallel CPU)
//! 4. **Drive**: pull-based session loop, one frame per `next()` call
//! 5. **Encode**: stream frames to a sink with cooperative backpressure
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic sampling**: identical `(model, progress, count)` inputs
//!   produce identical samples and therefore identical frames.
//! - **Snapshot isolation**: render sessions clone the model at construction;
//!   concurrent interactive edits never affect an in-flight export.
//! - **Pull-driven**: the consumer requests frames only when ready; the loop
//!   performs no orchestration-level parallelism (parallelism lives inside the
//!   compositor's per-frame compute step).
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod curve;
mod editor;
mod encode;
mod export;
mod foundation;
mod render;

pub use animation::ease::Ease;
pub use animation::tween::ProgressTween;
pub use curve::model::{ControlPoints, CurveModel};
pub use curve::sampler::Sampler;
pub use editor::surface::EditorSurface;
pub use encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, ensure_parent_dir, is_ffmpeg_on_path};
pub use encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use export::{ExportReport, export_to_mp4, export_with_sink};
pub use foundation::core::{Fps, FrameRGBA, MediaTime, Point, Vec2, Viewport};
pub use foundation::error::{CurvetError, CurvetResult};
pub use render::compositor::{CompositorOpts, CurveCompositor, CurveFrameParams};
pub use render::session::{
    CancelToken, RenderConfig, RenderSession, SessionOutcome, SessionState, TimedFrame,
};
pub use render::source::{FrameSource, ImageFrameSource};
