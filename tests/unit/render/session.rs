use super::*;
use crate::render::compositor::CompositorOpts;

struct SolidSource {
    frames_left: Option<u64>,
}

impl FrameSource for SolidSource {
    fn fetch_frame(&mut self, width: u32, height: u32) -> CurvetResult<Option<FrameRGBA>> {
        if let Some(n) = self.frames_left.as_mut() {
            if *n == 0 {
                return Ok(None);
            }
            *n -= 1;
        }
        Ok(Some(FrameRGBA::solid(width, height, [10, 20, 30, 255])))
    }
}

fn session(
    duration_secs: f64,
    frames_left: Option<u64>,
) -> RenderSession<SolidSource> {
    let model = CurveModel::with_viewport(Viewport::new(1.0, 1.0));
    let cfg = RenderConfig {
        width: 16,
        height: 16,
        ..RenderConfig::with_duration(duration_secs)
    };
    RenderSession::new(
        &model,
        SolidSource { frames_left },
        CurveCompositor::new(CompositorOpts { threads: Some(1) }).unwrap(),
        cfg,
        CancelToken::new(),
    )
    .unwrap()
}

#[test]
fn invalid_configuration_is_rejected_at_construction() {
    let model = CurveModel::default();
    let compositor = CurveCompositor::new(CompositorOpts::default()).unwrap();
    let bad = RenderConfig {
        duration_secs: 0.0,
        ..RenderConfig::with_duration(1.0)
    };
    let err = RenderSession::new(
        &model,
        SolidSource { frames_left: None },
        compositor,
        bad,
        CancelToken::new(),
    );
    assert!(matches!(err, Err(CurvetError::InvalidConfiguration(_))));
}

#[test]
fn snapshot_viewport_is_retargeted_to_the_output_size() {
    let sess = session(1.0, None);
    assert_eq!(sess.model().viewport(), Viewport::new(16.0, 16.0));
}

#[test]
fn states_advance_idle_producing_draining_finished() {
    let mut sess = session(2.0 / 30.0, None);
    assert_eq!(sess.state(), SessionState::Idle);

    assert!(sess.next().unwrap().is_some());
    assert_eq!(sess.state(), SessionState::Producing);
    assert!(sess.next().unwrap().is_some());

    // Duration exhausted: drain, then finish; end-of-stream is idempotent.
    assert!(sess.next().unwrap().is_none());
    assert_eq!(sess.state(), SessionState::Draining);
    assert_eq!(sess.outcome(), Some(SessionOutcome::Completed));
    assert!(sess.next().unwrap().is_none());
    assert_eq!(sess.state(), SessionState::Finished);
    assert!(sess.next().unwrap().is_none());
}

#[test]
fn cancellation_drains_through_the_normal_path() {
    let cancel = CancelToken::new();
    let model = CurveModel::with_viewport(Viewport::new(1.0, 1.0));
    let mut sess = RenderSession::new(
        &model,
        SolidSource { frames_left: None },
        CurveCompositor::new(CompositorOpts { threads: Some(1) }).unwrap(),
        RenderConfig {
            width: 16,
            height: 16,
            ..RenderConfig::with_duration(10.0)
        },
        cancel.clone(),
    )
    .unwrap();

    assert!(sess.next().unwrap().is_some());
    cancel.cancel();
    assert!(sess.next().unwrap().is_none());
    assert_eq!(sess.outcome(), Some(SessionOutcome::Cancelled));
}

#[test]
fn source_fetch_errors_drain_instead_of_failing() {
    struct FailingSource;
    impl FrameSource for FailingSource {
        fn fetch_frame(&mut self, _: u32, _: u32) -> CurvetResult<Option<FrameRGBA>> {
            Err(CurvetError::invalid_configuration("decode error"))
        }
    }

    let model = CurveModel::with_viewport(Viewport::new(1.0, 1.0));
    let mut sess = RenderSession::new(
        &model,
        FailingSource,
        CurveCompositor::new(CompositorOpts { threads: Some(1) }).unwrap(),
        RenderConfig {
            width: 16,
            height: 16,
            ..RenderConfig::with_duration(10.0)
        },
        CancelToken::new(),
    )
    .unwrap();

    assert!(sess.next().unwrap().is_none());
    assert_eq!(sess.state(), SessionState::Draining);
    assert_eq!(sess.outcome(), Some(SessionOutcome::Completed));
}
