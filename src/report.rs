//! The size report produced by the `Get` command.
//!
//! The report is delivered over an [`mpsc`](std::sync::mpsc) channel so
//! any listener — the daemon's log, a desktop-notification bridge, a
//! test — can consume it without being owned by the
//! [`Sizer`](crate::sizer::Sizer).
//!
//! All geometry in the report is divided by the monitor's device scale
//! factor, so sizes read in logical pixels.  The placement engine never
//! sees scaled values; scale handling lives entirely here.

use crate::geometry::Rect;
use std::fmt;

/// A snapshot of the focused window's geometry context.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeReport {
    /// Window class (e.g. `"Alacritty"`).
    pub wm_class: String,
    /// Window title.
    pub title: String,
    /// The window's outer frame, native units.
    pub frame: Rect,
    /// Geometry of the monitor containing the window.
    pub monitor: Rect,
    /// The monitor's work area.
    pub work_area: Rect,
    /// Device scale factor applied when formatting.
    pub scale: f64,
}

impl SizeReport {
    /// Scale a native pixel value down to logical pixels.
    fn logical(&self, v: i32) -> i32 {
        (f64::from(v) / self.scale) as i32
    }
}

impl fmt::Display for SizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} [{}]", self.wm_class, self.title)?;
        writeln!(
            f,
            "Pos: ({}, {})",
            self.logical(self.frame.x),
            self.logical(self.frame.y)
        )?;
        writeln!(
            f,
            "Size: {}x{}",
            self.logical(self.frame.width),
            self.logical(self.frame.height)
        )?;
        writeln!(
            f,
            "Monitor: {}x{}",
            self.logical(self.monitor.width),
            self.logical(self.monitor.height)
        )?;
        write!(
            f,
            "WorkArea: {}x{}",
            self.logical(self.work_area.width),
            self.logical(self.work_area.height)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(scale: f64) -> SizeReport {
        SizeReport {
            wm_class: "Alacritty".into(),
            title: "~".into(),
            frame: Rect::new(100, 64, 800, 600),
            monitor: Rect::new(0, 0, 1920, 1080),
            work_area: Rect::new(0, 32, 1920, 1048),
            scale,
        }
    }

    #[test]
    fn formats_native_units_at_scale_one() {
        let text = report(1.0).to_string();
        assert_eq!(
            text,
            "Alacritty [~]\nPos: (100, 64)\nSize: 800x600\nMonitor: 1920x1080\nWorkArea: 1920x1048"
        );
    }

    #[test]
    fn divides_by_scale_factor() {
        let text = report(2.0).to_string();
        assert!(text.contains("Pos: (50, 32)"));
        assert!(text.contains("Size: 400x300"));
        assert!(text.contains("Monitor: 960x540"));
        assert!(text.contains("WorkArea: 960x524"));
    }
}
