use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::curve::model::CurveModel;
use crate::foundation::core::{Fps, FrameRGBA, MediaTime, Viewport};
use crate::foundation::error::{CurvetError, CurvetResult};
use crate::render::compositor::{CurveCompositor, CurveFrameParams};
use crate::render::source::FrameSource;

/// Lifecycle states of a render session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Constructed; no frames produced yet.
    Idle,
    /// Producing frames on each `next` call.
    Producing,
    /// End-of-stream reached; the caller finalizes the writer with the last
    /// emitted timestamp.
    Draining,
    /// Terminal.
    Finished,
}

/// How a drained session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Duration elapsed or the background source exhausted.
    Completed,
    /// A cancellation request ended the stream early.
    Cancelled,
}

/// Shared cancellation flag, checked at the top of each `next` call.
///
/// Cancellation drains the session through the same finalization path as
/// normal completion; it is an outcome, not an error.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A fresh, un-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// One produced frame with its presentation timestamp.
#[derive(Clone, Debug)]
pub struct TimedFrame {
    /// The composited output frame.
    pub frame: FrameRGBA,
    /// Presentation timestamp, strictly increasing across yields.
    pub time: MediaTime,
}

/// Render target and timing configuration for a session.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct RenderConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frame rate (exports run at 30 fps).
    pub fps: Fps,
    /// Animation duration in seconds.
    pub duration_secs: f64,
    /// Anchor disk radius in pixels.
    pub radius: f32,
    /// Chord/curve stroke width in pixels.
    pub stroke_width: f32,
}

impl RenderConfig {
    /// Default output size (matches the writer's canonical 640x640 target).
    pub const DEFAULT_SIZE: u32 = 640;

    /// A 640x640, 30 fps configuration for `duration_secs`.
    pub fn with_duration(duration_secs: f64) -> Self {
        Self {
            width: Self::DEFAULT_SIZE,
            height: Self::DEFAULT_SIZE,
            fps: Fps::THIRTY,
            duration_secs,
            radius: CurveFrameParams::DEFAULT_RADIUS,
            stroke_width: CurveFrameParams::DEFAULT_STROKE_WIDTH,
        }
    }

    fn validate(&self) -> CurvetResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CurvetError::invalid_configuration(
                "render width/height must be non-zero",
            ));
        }
        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return Err(CurvetError::invalid_configuration(
                "render duration must be positive and finite",
            ));
        }
        if self.fps.num == 0 || self.fps.den == 0 {
            return Err(CurvetError::invalid_configuration(
                "render fps must have num > 0 and den > 0",
            ));
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(CurvetError::invalid_configuration(
                "render radius must be positive and finite",
            ));
        }
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(CurvetError::invalid_configuration(
                "render stroke width must be positive and finite",
            ));
        }
        Ok(())
    }
}

/// Pull-driven frame producer for one export.
///
/// Each `next` call fetches a background frame, maps the presentation time to
/// an animation progress, samples the curve at that progress, composites, and
/// yields the frame with its timestamp. Frames are yielded in strictly
/// increasing presentation-time order; production stops when the duration
/// elapses, the source exhausts, or cancellation is requested.
///
/// The session clones the model at construction (and re-targets the clone's
/// viewport to the output dimensions), so concurrent interactive edits never
/// affect an in-flight export.
pub struct RenderSession<S: FrameSource> {
    model: CurveModel,
    source: S,
    compositor: CurveCompositor,
    cfg: RenderConfig,
    frame_count: u64,
    presentation_time: MediaTime,
    state: SessionState,
    cancel: CancelToken,
    outcome: Option<SessionOutcome>,
}

impl<S: FrameSource> RenderSession<S> {
    /// Construct a session over a model snapshot.
    ///
    /// Rejects invalid configuration (non-positive duration, zero dimensions,
    /// invalid fps, sample count < 2) up front.
    pub fn new(
        model: &CurveModel,
        source: S,
        compositor: CurveCompositor,
        cfg: RenderConfig,
        cancel: CancelToken,
    ) -> CurvetResult<Self> {
        cfg.validate()?;
        if model.sample_count() < 2 {
            return Err(CurvetError::invalid_configuration(
                "curve sample count must be >= 2",
            ));
        }
        let mut snapshot = model.clone();
        snapshot.set_viewport(Viewport::new(f64::from(cfg.width), f64::from(cfg.height)));
        Ok(Self {
            model: snapshot,
            source,
            compositor,
            cfg,
            frame_count: 0,
            presentation_time: MediaTime::from_frame(0, cfg.fps),
            state: SessionState::Idle,
            cancel,
            outcome: None,
        })
    }

    /// The current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Number of frames produced so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// The presentation timestamp the next produced frame would carry.
    pub fn presentation_time(&self) -> MediaTime {
        self.presentation_time
    }

    /// How the session ended; `None` while still producing.
    pub fn outcome(&self) -> Option<SessionOutcome> {
        self.outcome
    }

    /// The model snapshot this session renders from.
    pub fn model(&self) -> &CurveModel {
        &self.model
    }

    /// Produce the next frame, or `None` once the stream has ended.
    ///
    /// A failed background fetch is treated like duration exhaustion (drain,
    /// no error); a compositor failure is fatal and aborts the session.
    #[tracing::instrument(skip(self))]
    pub fn next(&mut self) -> CurvetResult<Option<TimedFrame>> {
        if self.cancel.is_cancelled()
            && matches!(self.state, SessionState::Idle | SessionState::Producing)
        {
            self.drain(SessionOutcome::Cancelled);
        }

        match self.state {
            SessionState::Idle | SessionState::Producing => {}
            SessionState::Draining => {
                self.state = SessionState::Finished;
                return Ok(None);
            }
            SessionState::Finished => return Ok(None),
        }

        if self.presentation_time.seconds() >= self.cfg.duration_secs {
            self.drain(SessionOutcome::Completed);
            return Ok(None);
        }

        let background = match self.source.fetch_frame(self.cfg.width, self.cfg.height) {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                self.drain(SessionOutcome::Completed);
                return Ok(None);
            }
            Err(e) => {
                tracing::warn!(error = %e, "background frame fetch failed; draining");
                self.drain(SessionOutcome::Completed);
                return Ok(None);
            }
        };

        self.state = SessionState::Producing;
        let time = self.presentation_time;
        let progress = time.seconds() / self.cfg.duration_secs;
        let params = CurveFrameParams::for_progress(
            &self.model,
            progress,
            self.cfg.radius,
            self.cfg.stroke_width,
        )?;
        let frame = match self.compositor.composite(&background, &params) {
            Ok(frame) => frame,
            Err(e) => {
                self.abort();
                return Err(e);
            }
        };

        self.frame_count += 1;
        self.presentation_time = MediaTime::from_frame(self.frame_count, self.cfg.fps);
        Ok(Some(TimedFrame { frame, time }))
    }

    /// Terminate immediately without draining. Used when the downstream
    /// consumer fails; the session ends without success.
    pub fn abort(&mut self) {
        self.state = SessionState::Finished;
    }

    fn drain(&mut self, outcome: SessionOutcome) {
        if self.outcome.is_none() {
            self.outcome = Some(outcome);
        }
        self.state = SessionState::Draining;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/session.rs"]
mod tests;
