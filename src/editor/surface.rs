use crate::animation::tween::ProgressTween;
use crate::curve::model::CurveModel;
use crate::foundation::core::{Point, Viewport};

/// The interactive surface boundary: the only mutation entry points the curve
/// model accepts from a UI layer.
///
/// The surface owns its model outright. Render sessions operate on a
/// [`snapshot`](EditorSurface::snapshot), so interactive edits never affect an
/// in-flight export.
#[derive(Clone, Debug, Default)]
pub struct EditorSurface {
    model: CurveModel,
    progress: f64,
}

impl EditorSurface {
    /// Wrap an existing model; progress starts at 0.
    pub fn new(model: CurveModel) -> Self {
        Self {
            model,
            progress: 0.0,
        }
    }

    /// Borrow the owned model.
    pub fn model(&self) -> &CurveModel {
        &self.model
    }

    /// An independent copy of the model, for render sessions.
    pub fn snapshot(&self) -> CurveModel {
        self.model.clone()
    }

    /// Current animation progress in [0, 1].
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Set the animation progress, clamped to [0, 1]. Written by user
    /// interaction and by the tween driver alike.
    pub fn set_progress(&mut self, value: f64) {
        self.progress = if value.is_finite() {
            value.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    /// Move the seed point to a pixel-space drag location.
    pub fn set_seed_point(&mut self, pixel: Point) {
        self.model.set_seed_pixel(pixel);
    }

    /// Whether the owned model is empty.
    pub fn is_empty(&self) -> bool {
        self.model.is_empty()
    }

    /// React to a layout/resize of the owning visual surface.
    ///
    /// The first non-empty layout of an empty model replaces the model
    /// wholesale with a default-populated one targeting the new viewport;
    /// afterwards only the viewport is updated in place. Empty layouts are
    /// ignored.
    pub fn on_layout(&mut self, viewport: Viewport) {
        if viewport.is_empty() {
            return;
        }
        if self.model.is_empty() {
            tracing::debug!(width = viewport.width, height = viewport.height, "populating model on first layout");
            self.model = CurveModel::with_viewport(viewport);
        } else {
            self.model.set_viewport(viewport);
        }
    }

    /// Advance a tween by `dt_secs` and apply the eased value through
    /// [`set_progress`](EditorSurface::set_progress).
    pub fn advance(&mut self, tween: &mut ProgressTween, dt_secs: f64) {
        let value = tween.tick(dt_secs);
        self.set_progress(value);
    }
}
