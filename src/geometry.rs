//! Pure coordinate-frame arithmetic.
//!
//! Commands arrive expressed in one of three frames — absolute screen
//! pixels, monitor-relative, or work-area-relative.  [`resolve_absolute`]
//! turns any of them into an absolute [`Rect`].  The span predicates
//! ([`spans_full_width`] / [`spans_full_height`]) classify whether a
//! rectangle exactly fills the work area along an axis; the placement
//! engine uses them to keep the compositor's native maximize flags in
//! sync with manually-set geometry.
//!
//! Everything here is pure arithmetic with no error conditions.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in absolute screen pixels.
///
/// A degenerate rectangle (zero width or height) is legal and simply
/// collapses the window.  Values are never mutated in place; each
/// resolution step produces a fresh `Rect`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Construct a rectangle.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether `self` lies entirely inside `other`.
    pub fn contained_in(&self, other: &Rect) -> bool {
        self.x >= other.x
            && self.y >= other.y
            && self.x + self.width <= other.x + other.width
            && self.y + self.height <= other.y + other.height
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// The coordinate frame a command's x/y offset is expressed in.
///
/// Only the origin is frame-relative — width and height always pass
/// through unchanged, sizes are never monitor- or work-area-relative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// Absolute screen coordinates.
    Absolute,
    /// Relative to the origin of the monitor containing the input focus.
    MonitorRelative,
    /// Relative to the origin of that monitor's work area.
    WorkAreaRelative,
}

/// Resolve `offset`, expressed in `frame`, into absolute screen pixels.
pub fn resolve_absolute(frame: Frame, offset: Rect, monitor: Rect, work_area: Rect) -> Rect {
    match frame {
        Frame::Absolute => offset,
        Frame::MonitorRelative => Rect::new(
            monitor.x + offset.x,
            monitor.y + offset.y,
            offset.width,
            offset.height,
        ),
        Frame::WorkAreaRelative => Rect::new(
            work_area.x + offset.x,
            work_area.y + offset.y,
            offset.width,
            offset.height,
        ),
    }
}

/// Whether `rect` exactly spans the full width of `work_area`.
///
/// Requires both containment and an exact edge match: a rectangle merely
/// narrower than the work area does not count, even if it touches the
/// left edge.
pub fn spans_full_width(rect: &Rect, work_area: &Rect) -> bool {
    rect.contained_in(work_area) && rect.x == work_area.x && rect.width == work_area.width
}

/// Whether `rect` exactly spans the full height of `work_area`.
pub fn spans_full_height(rect: &Rect, work_area: &Rect) -> bool {
    rect.contained_in(work_area) && rect.y == work_area.y && rect.height == work_area.height
}

/// Top-left origin that centers a `width`×`height` frame inside `area`.
///
/// Uses floor division, so a frame larger than the area centers with a
/// negative offset rather than rounding toward the origin.
pub fn center_origin(area: &Rect, width: i32, height: i32) -> (i32, i32) {
    (
        area.x + (area.width - width).div_euclid(2),
        area.y + (area.height - height).div_euclid(2),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wa() -> Rect {
        Rect::new(0, 32, 1920, 1048)
    }

    #[test]
    fn absolute_passes_through() {
        let r = Rect::new(10, 20, 300, 400);
        let m = Rect::new(1920, 0, 2560, 1440);
        assert_eq!(resolve_absolute(Frame::Absolute, r, m, wa()), r);
    }

    #[test]
    fn monitor_relative_offsets_origin_only() {
        let r = Rect::new(10, 20, 300, 400);
        let m = Rect::new(1920, 100, 2560, 1440);
        assert_eq!(
            resolve_absolute(Frame::MonitorRelative, r, m, wa()),
            Rect::new(1930, 120, 300, 400)
        );
    }

    #[test]
    fn work_area_relative_offsets_origin_only() {
        let r = Rect::new(5, 5, 100, 100);
        let m = Rect::new(0, 0, 1920, 1080);
        assert_eq!(
            resolve_absolute(Frame::WorkAreaRelative, r, m, wa()),
            Rect::new(5, 37, 100, 100)
        );
    }

    #[test]
    fn spans_full_width_requires_exact_edges() {
        let area = wa();
        assert!(spans_full_width(&Rect::new(0, 32, 1920, 500), &area));
        // Narrower, even though it touches the left edge.
        assert!(!spans_full_width(&Rect::new(0, 32, 1900, 500), &area));
        // Right width but offset.
        assert!(!spans_full_width(&Rect::new(10, 32, 1920, 500), &area));
    }

    #[test]
    fn spans_full_width_requires_containment() {
        let area = wa();
        // Correct x and width, but taller than the work area.
        assert!(!spans_full_width(&Rect::new(0, 0, 1920, 2000), &area));
        // Sticks out below.
        assert!(!spans_full_width(&Rect::new(0, 600, 1920, 600), &area));
    }

    #[test]
    fn spans_full_height_symmetric() {
        let area = wa();
        assert!(spans_full_height(&Rect::new(100, 32, 500, 1048), &area));
        assert!(!spans_full_height(&Rect::new(100, 32, 500, 1000), &area));
        assert!(!spans_full_height(&Rect::new(100, 40, 500, 1048), &area));
    }

    #[test]
    fn degenerate_rect_is_legal() {
        let area = wa();
        assert!(!spans_full_width(&Rect::new(0, 32, 0, 0), &area));
        assert!(Rect::new(50, 50, 0, 0).contained_in(&area));
    }

    #[test]
    fn center_800x600_in_1920x1080() {
        let area = Rect::new(0, 0, 1920, 1080);
        assert_eq!(center_origin(&area, 800, 600), (560, 240));
    }

    #[test]
    fn center_respects_work_area_origin() {
        let area = Rect::new(100, 32, 1820, 1048);
        let (x, y) = center_origin(&area, 800, 600);
        assert_eq!((x, y), (100 + 510, 32 + 224));
    }

    #[test]
    fn center_oversized_frame_floors() {
        // Frame larger than the area: floor division, not truncation.
        let area = Rect::new(0, 0, 1000, 1000);
        let (x, y) = center_origin(&area, 1005, 1005);
        assert_eq!((x, y), (-3, -3));
    }
}
