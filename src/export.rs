//! The pull-driven export loop: session frames are pushed into a sink only as
//! they are produced, so production never outpaces the consumer.

use std::path::PathBuf;

use crate::curve::model::CurveModel;
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::MediaTime;
use crate::foundation::error::CurvetResult;
use crate::render::compositor::{CompositorOpts, CurveCompositor};
use crate::render::session::{CancelToken, RenderConfig, RenderSession, SessionOutcome};
use crate::render::source::FrameSource;

/// Summary of one completed export.
#[derive(Clone, Debug)]
pub struct ExportReport {
    /// Frames pushed into the sink.
    pub frames_pushed: u64,
    /// Timestamp of the last pushed frame, if any.
    pub last_time: Option<MediaTime>,
    /// How the producing session ended.
    pub outcome: SessionOutcome,
    /// Output location reported by the sink, when it has one.
    pub out_path: Option<PathBuf>,
}

/// Render `model` over `source` and stream every frame into `sink`.
///
/// The loop pulls one frame at a time and blocks on the sink's push, which is
/// the backpressure contract: a slow consumer slows production instead of
/// queueing frames. A sink failure aborts the session and propagates as
/// [`EncodingFailed`](crate::CurvetError::EncodingFailed); cancellation drains
/// through the same finalization path as normal completion.
#[tracing::instrument(skip(model, source, sink, cancel))]
pub fn export_with_sink(
    model: &CurveModel,
    source: &mut dyn FrameSource,
    sink: &mut dyn FrameSink,
    cfg: RenderConfig,
    cancel: CancelToken,
) -> CurvetResult<ExportReport> {
    let compositor = CurveCompositor::new(CompositorOpts::default())?;
    let mut session = RenderSession::new(model, source, compositor, cfg, cancel)?;

    sink.begin(SinkConfig {
        width: cfg.width,
        height: cfg.height,
        fps: cfg.fps,
    })?;

    let mut frames_pushed = 0u64;
    let mut last_time = None;
    loop {
        match session.next() {
            Ok(Some(timed)) => {
                if let Err(e) = sink.push_frame(timed.time, &timed.frame) {
                    session.abort();
                    return Err(e);
                }
                frames_pushed += 1;
                last_time = Some(timed.time);
            }
            Ok(None) => break,
            Err(e) => {
                session.abort();
                return Err(e);
            }
        }
    }

    let out_path = sink.finish()?;
    let outcome = session.outcome().unwrap_or(SessionOutcome::Completed);
    tracing::debug!(frames_pushed, ?outcome, "export complete");
    Ok(ExportReport {
        frames_pushed,
        last_time,
        outcome,
        out_path,
    })
}

/// Render `model` over `source` into an MP4 via the system `ffmpeg`.
pub fn export_to_mp4(
    model: &CurveModel,
    source: &mut dyn FrameSource,
    sink_opts: FfmpegSinkOpts,
    cfg: RenderConfig,
    cancel: CancelToken,
) -> CurvetResult<ExportReport> {
    let mut sink = FfmpegSink::new(sink_opts);
    export_with_sink(model, source, &mut sink, cfg, cancel)
}
