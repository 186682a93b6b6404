//! The window placement engine.
//!
//! [`PlacementEngine`] turns an absolute target rectangle into calls on a
//! [`WindowOps`] handle: it normalizes maximize state before any manual
//! move, issues the move / move+resize, syncs the compositor's axis-wise
//! maximize flags against the work area, and then drives a bounded
//! verification loop until the observed frame equals the target.
//!
//! The retry loop exists because a combined move+resize is not reliable
//! on every backend: when the window's minimum size exceeds the request,
//! some compositors apply only the resize half, and under some display
//! protocols motion and sizing must be decoupled to both take effect.
//! The engine therefore alternates corrective operations by attempt
//! parity — move-only on even attempts, move+resize on odd — and gives
//! up after a fixed budget rather than spinning forever against a window
//! whose size constraints make the target unreachable.

use crate::geometry::{spans_full_height, spans_full_width, Rect};
use crate::traits::{Axis, WindowOps};
use log::debug;
use std::time::Duration;

/// Default settle delay before each verification check.
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(20);

/// Default number of verification checks before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 6;

/// Terminal state of one placement command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The observed frame matched the target exactly.  `attempts` counts
    /// the corrective operations that were needed (0 when the first
    /// verification succeeded).
    Converged { attempts: u32 },
    /// The attempt budget ran out; `last_observed` is the frame the
    /// window settled on.  Best effort — the final state stands.
    Exhausted { last_observed: Rect },
    /// The window vanished mid-command (frame query or mutator failed).
    /// No further calls were made.
    Cancelled,
}

/// Applies absolute rectangles to windows and verifies the result.
///
/// Stateless between commands; the attempt counter lives only inside one
/// [`move_resize`](PlacementEngine::move_resize) call.  Tests construct
/// the engine with a zero settle delay and drive a mock window, so no
/// real compositor or clock is needed.
#[derive(Debug, Clone, Copy)]
pub struct PlacementEngine {
    settle: Duration,
    max_attempts: u32,
}

impl Default for PlacementEngine {
    fn default() -> Self {
        Self::new(DEFAULT_SETTLE, DEFAULT_MAX_ATTEMPTS)
    }
}

impl PlacementEngine {
    /// Create an engine with the given settle delay and attempt budget.
    pub fn new(settle: Duration, max_attempts: u32) -> Self {
        Self {
            settle,
            max_attempts,
        }
    }

    /// Move `window` to `(x, y)`, leaving its size unchanged.
    ///
    /// Compositors tile windows on their own (e.g. Super+Left/Right
    /// snapping) with no way to detect it through the window API, so any
    /// maximize state is unconditionally cleared before the move.
    /// A plain move gets no verification loop.
    pub fn move_to<W: WindowOps>(&self, window: &W, x: i32, y: i32) -> Result<(), W::Error> {
        if window.maximize_state()?.any() {
            window.unmaximize(Axis::Both)?;
        }
        window.move_frame(x, y)
    }

    /// Move and resize `window` to `target`, then verify.
    ///
    /// After the combined request, the compositor's axis-wise maximize
    /// flags are synced: maximized along an axis iff `target` exactly
    /// spans the work area on that axis.  This keeps native maximize
    /// semantics (restore-on-unsnap and friends) consistent with
    /// manually-set full-span geometry.
    pub fn move_resize<W: WindowOps>(
        &self,
        window: &W,
        target: &Rect,
        work_area: &Rect,
    ) -> Result<Placement, W::Error> {
        if window.maximize_state()?.any() {
            window.unmaximize(Axis::Both)?;
        }

        window.move_resize_frame(target)?;

        if spans_full_width(target, work_area) {
            window.maximize(Axis::Horizontal)?;
        } else {
            window.unmaximize(Axis::Horizontal)?;
        }
        if spans_full_height(target, work_area) {
            window.maximize(Axis::Vertical)?;
        } else {
            window.unmaximize(Axis::Vertical)?;
        }

        Ok(self.converge(window, target))
    }

    /// The verification loop: settle, compare, correct, repeat.
    ///
    /// Window errors inside the loop mean the window went away; the loop
    /// stops immediately without further calls.
    fn converge<W: WindowOps>(&self, window: &W, target: &Rect) -> Placement {
        let mut last_observed = *target;

        for attempt in 0..self.max_attempts {
            if !self.settle.is_zero() {
                std::thread::sleep(self.settle);
            }

            let frame = match window.frame() {
                Ok(frame) => frame,
                Err(e) => {
                    debug!("window vanished during verification: {}", e);
                    return Placement::Cancelled;
                }
            };

            if frame == *target {
                return Placement::Converged { attempts: attempt };
            }
            last_observed = frame;
            debug!(
                "attempt {}: observed {} != target {}, correcting",
                attempt, frame, target
            );

            let corrected = if attempt % 2 == 0 {
                window.move_frame(target.x, target.y)
            } else {
                window.move_resize_frame(target)
            };
            if let Err(e) = corrected {
                debug!("window vanished during correction: {}", e);
                return Placement::Cancelled;
            }
        }

        Placement::Exhausted { last_observed }
    }
}
