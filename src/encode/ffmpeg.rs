use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{FrameRGBA, MediaTime};
use crate::foundation::error::{CurvetError, CurvetResult};

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Overwrite the output file if it already exists.
    pub overwrite: bool,
    /// Average video bitrate in bits per second.
    pub bitrate: u32,
}

impl FfmpegSinkOpts {
    /// Canonical average bitrate for exports (1 Mbps).
    pub const DEFAULT_BITRATE: u32 = 1_000_000;

    /// Create options for outputting an MP4 to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            bitrate: Self::DEFAULT_BITRATE,
        }
    }
}

/// Sink that spawns the system `ffmpeg` and streams raw RGBA frames to its
/// stdin, producing an h264 + yuv420p MP4.
///
/// An existing destination file is removed before writing starts, so a failed
/// export never leaves a partial file masquerading as a previous good one.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    cfg: Option<SinkConfig>,
    last_time: Option<MediaTime>,
}

impl FfmpegSink {
    /// Create a new sink that streams into `ffmpeg`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            cfg: None,
            last_time: None,
        }
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> CurvetResult<()> {
        if cfg.fps.num == 0 || cfg.fps.den == 0 {
            return Err(CurvetError::invalid_configuration("fps must be non-zero"));
        }
        if cfg.width == 0 || cfg.height == 0 {
            return Err(CurvetError::invalid_configuration(
                "ffmpeg sink width/height must be non-zero",
            ));
        }
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(CurvetError::invalid_configuration(
                "ffmpeg sink width/height must be even (required for yuv420p mp4 output)",
            ));
        }

        ensure_parent_dir(&self.opts.out_path)?;
        if self.opts.out_path.exists() {
            if !self.opts.overwrite {
                return Err(CurvetError::encoding_failed(format!(
                    "output file '{}' already exists",
                    self.opts.out_path.display()
                )));
            }
            std::fs::remove_file(&self.opts.out_path).map_err(|e| {
                CurvetError::encoding_failed(format!(
                    "failed to remove existing output '{}': {e}",
                    self.opts.out_path.display()
                ))
            })?;
        }

        if !is_ffmpeg_on_path() {
            return Err(CurvetError::encoding_failed(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        // Input: raw straight-alpha RGBA8 frames over stdin at the session
        // frame rate.
        cmd.args([
            "-y",
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &format!("{}/{}", cfg.fps.num, cfg.fps.den),
            "-i",
            "pipe:0",
        ]);

        // Output: h264 + yuv420p at the configured average bitrate for broad
        // compatibility.
        cmd.args([
            "-an",
            "-c:v",
            "libx264",
            "-b:v",
            &self.opts.bitrate.to_string(),
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ]);
        cmd.arg(&self.opts.out_path);

        let mut child = cmd.spawn().map_err(|e| {
            CurvetError::encoding_failed(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child.stdin.take().ok_or_else(|| {
            CurvetError::encoding_failed("failed to open ffmpeg stdin (unexpected)")
        })?;
        let mut stderr = child.stderr.take().ok_or_else(|| {
            CurvetError::encoding_failed("failed to open ffmpeg stderr (unexpected)")
        })?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_time = None;
        Ok(())
    }

    fn push_frame(&mut self, time: MediaTime, frame: &FrameRGBA) -> CurvetResult<()> {
        let Some(cfg) = self.cfg.as_ref() else {
            return Err(CurvetError::encoding_failed("ffmpeg sink not started"));
        };
        if let Some(last) = self.last_time
            && time.seconds() <= last.seconds()
        {
            return Err(CurvetError::encoding_failed(
                "ffmpeg sink received out-of-order frame timestamp",
            ));
        }
        self.last_time = Some(time);

        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(CurvetError::encoding_failed(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        let expected = (cfg.width as usize) * (cfg.height as usize) * 4;
        if frame.data.len() != expected {
            return Err(CurvetError::encoding_failed(
                "frame data size mismatch with width * height * 4",
            ));
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(CurvetError::encoding_failed(
                "ffmpeg sink is already finalized",
            ));
        };

        use std::io::Write as _;
        stdin.write_all(&frame.data).map_err(|e| {
            CurvetError::encoding_failed(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    fn finish(&mut self) -> CurvetResult<Option<PathBuf>> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| CurvetError::encoding_failed("ffmpeg sink not started"))?;

        let status = child.wait().map_err(|e| {
            CurvetError::encoding_failed(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| CurvetError::encoding_failed("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| {
                    CurvetError::encoding_failed(format!("ffmpeg stderr read failed: {e}"))
                })?,
            None => Vec::new(),
        };

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(CurvetError::encoding_failed(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }

        self.cfg = None;
        Ok(Some(self.opts.out_path.clone()))
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> CurvetResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    std::process::Command::new("ffmpeg")
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::Fps;

    #[test]
    fn odd_dimensions_are_rejected_before_spawn() {
        let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("/tmp/curvet_odd.mp4"));
        let err = sink.begin(SinkConfig {
            width: 3,
            height: 2,
            fps: Fps::THIRTY,
        });
        assert!(matches!(err, Err(CurvetError::InvalidConfiguration(_))));
    }

    #[test]
    fn push_before_begin_is_an_encoding_error() {
        let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("/tmp/curvet_unstarted.mp4"));
        let frame = FrameRGBA::solid(2, 2, [0, 0, 0, 255]);
        let err = sink.push_frame(MediaTime::ZERO, &frame);
        assert!(matches!(err, Err(CurvetError::EncodingFailed(_))));
    }
}
