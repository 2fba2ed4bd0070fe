//! # Offset smoothing
//!
//! The displayed offset of an element is not always the state offset: across
//! a focus enter/exit it eases toward it over a fixed duration, while during
//! live dragging it snaps immediately so direct manipulation never lags.
//! Position only — rotation and scale change instantly by contract.

use std::time::Duration;

/// How long the focus-transition tween runs.
pub const FOCUS_TWEEN: Duration = Duration::from_millis(500);

/// Fast-out-slow-in easing: cubic bezier (0.4, 0.0, 0.2, 1.0).
///
/// Solved by bisecting the curve's x polynomial for the bezier parameter;
/// a dozen halvings is well under a displayable pixel of error.
#[must_use]
pub fn fast_out_slow_in(fraction: f32) -> f32 {
    const X1: f32 = 0.4;
    const X2: f32 = 0.2;
    const Y1: f32 = 0.0;
    const Y2: f32 = 1.0;
    if fraction <= 0.0 {
        return 0.0;
    }
    if fraction >= 1.0 {
        return 1.0;
    }
    let component = |a: f32, b: f32, t: f32| {
        // One axis of the bezier with endpoints pinned at 0 and 1.
        3.0 * a * (1.0 - t) * (1.0 - t) * t + 3.0 * b * (1.0 - t) * t * t + t * t * t
    };
    let (mut low, mut high) = (0.0f32, 1.0f32);
    for _ in 0..16 {
        let mid = (low + high) / 2.0;
        if component(X1, X2, mid) < fraction {
            low = mid;
        } else {
            high = mid;
        }
    }
    component(Y1, Y2, (low + high) / 2.0)
}

/// Displayed offset for one element, eased across focus transitions.
///
/// Driven by explicit [`SmoothedOffset::advance`] calls from the host's
/// frame callbacks; retargeting mid-flight restarts from the currently
/// displayed value (later wins, stale targets are dropped).
#[derive(Clone, Debug)]
pub struct SmoothedOffset {
    from: [f32; 2],
    target: [f32; 2],
    elapsed: Duration,
}

impl SmoothedOffset {
    /// Start settled at a position.
    #[must_use]
    pub fn new(at: [f32; 2]) -> Self {
        Self {
            from: at,
            target: at,
            elapsed: FOCUS_TWEEN,
        }
    }
    /// The offset to draw at right now.
    #[must_use]
    pub fn value(&self) -> [f32; 2] {
        if self.is_settled() {
            return self.target;
        }
        let fraction = self.elapsed.as_secs_f32() / FOCUS_TWEEN.as_secs_f32();
        let eased = fast_out_slow_in(fraction);
        [
            self.from[0] + (self.target[0] - self.from[0]) * eased,
            self.from[1] + (self.target[1] - self.from[1]) * eased,
        ]
    }
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.elapsed >= FOCUS_TWEEN
    }
    /// Ease toward `target` over [`FOCUS_TWEEN`]. Cancels any tween already
    /// in flight, starting over from the displayed value.
    pub fn ease_to(&mut self, target: [f32; 2]) {
        self.from = self.value();
        self.target = target;
        self.elapsed = Duration::ZERO;
    }
    /// Jump to `target` immediately.
    pub fn snap_to(&mut self, target: [f32; 2]) {
        self.from = target;
        self.target = target;
        self.elapsed = FOCUS_TWEEN;
    }
    /// Advance the tween by one frame's worth of time.
    pub fn advance(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt).min(FOCUS_TWEEN);
    }
    /// Reconcile against the state offset for this frame.
    ///
    /// Animate only when the focus flag flipped this frame; otherwise a
    /// diverging state offset means a live drag, which snaps.
    pub fn sync(&mut self, state_offset: [f32; 2], focus_changed: bool) {
        if focus_changed {
            self.ease_to(state_offset);
        } else if self.target != state_offset {
            self.snap_to(state_offset);
        }
    }
}
