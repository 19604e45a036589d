use std::path::PathBuf;

use crate::foundation::core::{Fps, FrameRGBA, MediaTime};
use crate::foundation::error::{CurvetError, CurvetResult};

/// Configuration provided to a [`FrameSink`] before the first push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
}

/// Sink contract for consuming rendered frames in presentation-time order.
///
/// Ordering contract: `push_frame` is called with strictly increasing
/// timestamps. Pushing before `begin` or after `finish` is an encoding error.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> CurvetResult<()>;
    /// Push one frame in strictly increasing presentation-time order.
    fn push_frame(&mut self, time: MediaTime, frame: &FrameRGBA) -> CurvetResult<()>;
    /// Finalize the output; returns its location when the sink has one.
    fn finish(&mut self) -> CurvetResult<Option<PathBuf>>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    finished: bool,
    frames: Vec<(MediaTime, FrameRGBA)>,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// The sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Whether `finish` has been called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(MediaTime, FrameRGBA)] {
        &self.frames
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> CurvetResult<()> {
        self.cfg = Some(cfg);
        self.finished = false;
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, time: MediaTime, frame: &FrameRGBA) -> CurvetResult<()> {
        let Some(cfg) = self.cfg.as_ref() else {
            return Err(CurvetError::encoding_failed("sink not started"));
        };
        if self.finished {
            return Err(CurvetError::encoding_failed("sink is already finalized"));
        }
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(CurvetError::encoding_failed(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        if let Some((last, _)) = self.frames.last()
            && time.seconds() <= last.seconds()
        {
            return Err(CurvetError::encoding_failed(
                "sink received out-of-order frame timestamp",
            ));
        }
        self.frames.push((time, frame.clone()));
        Ok(())
    }

    fn finish(&mut self) -> CurvetResult<Option<PathBuf>> {
        if self.cfg.is_none() {
            return Err(CurvetError::encoding_failed("sink not started"));
        }
        self.finished = true;
        Ok(None)
    }
}
