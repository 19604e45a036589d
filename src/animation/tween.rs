use crate::animation::ease::Ease;
use crate::foundation::error::{CurvetError, CurvetResult};

/// An explicit progress interpolation driver.
///
/// On each tick it computes an eased progress value; callers feed that value
/// to the same [`set_progress`](crate::EditorSurface::set_progress) entry
/// point the interactive path uses, so animated and interactive updates share
/// one contract.
#[derive(Clone, Copy, Debug)]
pub struct ProgressTween {
    from: f64,
    to: f64,
    duration_secs: f64,
    ease: Ease,
    elapsed_secs: f64,
}

impl ProgressTween {
    /// Construct a tween from `from` to `to` over `duration_secs`.
    pub fn new(from: f64, to: f64, duration_secs: f64, ease: Ease) -> CurvetResult<Self> {
        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            return Err(CurvetError::invalid_configuration(
                "tween duration must be positive and finite",
            ));
        }
        Ok(Self {
            from,
            to,
            duration_secs,
            ease,
            elapsed_secs: 0.0,
        })
    }

    /// The canonical curve-reveal tween: 0 to 1 over 2 seconds, ease-in-out.
    pub fn reveal() -> Self {
        Self {
            from: 0.0,
            to: 1.0,
            duration_secs: 2.0,
            ease: Ease::InOutQuad,
            elapsed_secs: 0.0,
        }
    }

    /// Advance by `dt_secs` and return the eased progress value.
    pub fn tick(&mut self, dt_secs: f64) -> f64 {
        self.elapsed_secs = (self.elapsed_secs + dt_secs.max(0.0)).min(self.duration_secs);
        self.value()
    }

    /// The eased progress value at the current elapsed time.
    pub fn value(&self) -> f64 {
        let t = (self.elapsed_secs / self.duration_secs).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * self.ease.apply(t)
    }

    /// `true` once the tween has reached its full duration.
    pub fn finished(&self) -> bool {
        self.elapsed_secs >= self.duration_secs
    }
}
