//! The main orchestrator that ties commands, geometry resolution, and
//! the placement engine together.
//!
//! [`Sizer`] owns a [`Compositor`] and reacts to [`Command`]s by
//! resolving coordinate frames and issuing calls through the
//! [`PlacementEngine`].  It is the boundary past which no placement
//! failure may propagate: a vanished window, an unreachable rectangle,
//! or the absence of a focused window are all absorbed here with at
//! most a log line.  Only compositor transport errors (the IPC socket
//! itself failing) surface as a [`SizerError`].

use crate::command::Command;
use crate::geometry::{center_origin, resolve_absolute, Frame, Rect};
use crate::placement::{Placement, PlacementEngine};
use crate::report::SizeReport;
use crate::traits::{Compositor, WindowOps};
use log::{debug, info, warn};
use std::sync::mpsc;

/// Possible errors from the sizer.
#[derive(Debug, thiserror::Error)]
pub enum SizerError {
    /// The compositor transport returned an error.
    #[error("compositor error: {0}")]
    Compositor(String),
}

/// Orchestrates geometry commands against the focused window.
///
/// Generic over any [`Compositor`] implementation, making it completely
/// independent of Hyprland or any other concrete backend.
///
/// # Typical usage
///
/// ```ignore
/// let mut sizer = Sizer::new(HyprlandCompositor::new());
/// sizer.handle(Command::CenterInWorkArea)?;
/// ```
pub struct Sizer<C: Compositor> {
    compositor: C,
    engine: PlacementEngine,
    report_tx: Option<mpsc::Sender<SizeReport>>,
}

impl<C: Compositor> Sizer<C> {
    /// Create a sizer with the default placement engine.
    pub fn new(compositor: C) -> Self {
        Self::with_engine(compositor, PlacementEngine::default())
    }

    /// Create a sizer with an explicitly configured engine.
    pub fn with_engine(compositor: C, engine: PlacementEngine) -> Self {
        Self {
            compositor,
            engine,
            report_tx: None,
        }
    }

    /// Attach a channel that receives [`SizeReport`]s from the
    /// [`Get`](Command::Get) command.  The receiver can be owned by any
    /// independent listener — the daemon's log, a notification bridge, a
    /// test.
    pub fn set_report_sink(&mut self, tx: mpsc::Sender<SizeReport>) {
        self.report_tx = Some(tx);
    }

    /// Process a single [`Command`].
    ///
    /// Commands are best-effort: when no window holds input focus, or
    /// the focused window disappears mid-command, the command becomes a
    /// silent no-op.  An `Err` means the compositor transport itself
    /// failed.
    pub fn handle(&mut self, cmd: Command) -> Result<(), SizerError> {
        match cmd {
            Command::Get => self.report(),

            Command::Move(p) => self.do_move(Frame::Absolute, p.x, p.y),
            Command::MoveInMonitor(p) => self.do_move(Frame::MonitorRelative, p.x, p.y),
            Command::MoveInWorkArea(p) => self.do_move(Frame::WorkAreaRelative, p.x, p.y),

            Command::MoveResize(r) => {
                self.do_move_resize(Frame::Absolute, r.x, r.y, r.width, r.height)
            }
            Command::MoveResizeInMonitor(r) => {
                self.do_move_resize(Frame::MonitorRelative, r.x, r.y, r.width, r.height)
            }
            Command::MoveResizeInWorkArea(r) => {
                self.do_move_resize(Frame::WorkAreaRelative, r.x, r.y, r.width, r.height)
            }

            Command::Resize(s) => self.do_resize(s.width, s.height),
            Command::CenterInWorkArea => self.do_center(),
        }
    }

    /// The focused window, or `None` (logged) when nothing has focus.
    fn focused(&self) -> Result<Option<C::Window>, SizerError> {
        let win = self
            .compositor
            .focused_window()
            .map_err(|e| SizerError::Compositor(e.to_string()))?;
        if win.is_none() {
            debug!("no focused window, ignoring command");
        }
        Ok(win)
    }

    /// Fresh monitor + work-area snapshot for this command.
    ///
    /// Never cached: monitors can change between commands (hotplug,
    /// workspace switch).
    fn geometry_context(&self) -> Result<(Rect, Rect), SizerError> {
        let monitor = self
            .compositor
            .monitor_geometry()
            .map_err(|e| SizerError::Compositor(e.to_string()))?;
        let work_area = self
            .compositor
            .work_area()
            .map_err(|e| SizerError::Compositor(e.to_string()))?;
        Ok((monitor, work_area))
    }

    fn do_move(&mut self, frame: Frame, x: u32, y: u32) -> Result<(), SizerError> {
        let Some(win) = self.focused()? else {
            return Ok(());
        };
        let (monitor, work_area) = self.geometry_context()?;
        let target = resolve_absolute(
            frame,
            Rect::new(x as i32, y as i32, 0, 0),
            monitor,
            work_area,
        );

        info!("move to ({}, {})", target.x, target.y);
        if let Err(e) = self.engine.move_to(&win, target.x, target.y) {
            debug!("window went away during move: {}", e);
        }
        Ok(())
    }

    fn do_move_resize(
        &mut self,
        frame: Frame,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Result<(), SizerError> {
        let Some(win) = self.focused()? else {
            return Ok(());
        };
        let (monitor, work_area) = self.geometry_context()?;
        let target = resolve_absolute(
            frame,
            Rect::new(x as i32, y as i32, width as i32, height as i32),
            monitor,
            work_area,
        );

        info!("move-resize to {}", target);
        self.place(&win, &target, &work_area);
        Ok(())
    }

    fn do_resize(&mut self, width: u32, height: u32) -> Result<(), SizerError> {
        let Some(win) = self.focused()? else {
            return Ok(());
        };
        let frame = match win.frame() {
            Ok(frame) => frame,
            Err(e) => {
                debug!("window went away before resize: {}", e);
                return Ok(());
            }
        };
        let (_, work_area) = self.geometry_context()?;
        // Position is preserved exactly; only the size changes.
        let target = Rect::new(frame.x, frame.y, width as i32, height as i32);

        info!("resize to {}", target);
        self.place(&win, &target, &work_area);
        Ok(())
    }

    fn do_center(&mut self) -> Result<(), SizerError> {
        let Some(win) = self.focused()? else {
            return Ok(());
        };
        let (_, work_area) = self.geometry_context()?;
        let frame = match win.frame() {
            Ok(frame) => frame,
            Err(e) => {
                debug!("window went away before centering: {}", e);
                return Ok(());
            }
        };
        let (x, y) = center_origin(&work_area, frame.width, frame.height);

        info!("center at ({}, {})", x, y);
        if let Err(e) = self.engine.move_to(&win, x, y) {
            debug!("window went away during centering: {}", e);
        }
        Ok(())
    }

    /// Run the placement engine and absorb its outcome.
    fn place(&self, win: &C::Window, target: &Rect, work_area: &Rect) {
        match self.engine.move_resize(win, target, work_area) {
            Ok(Placement::Converged { attempts }) => {
                debug!("converged on {} after {} correction(s)", target, attempts);
            }
            Ok(Placement::Exhausted { last_observed }) => {
                warn!(
                    "gave up placing window: wanted {}, window settled at {}",
                    target, last_observed
                );
            }
            Ok(Placement::Cancelled) => {
                debug!("window vanished mid-placement");
            }
            Err(e) => {
                debug!("window went away during placement: {}", e);
            }
        }
    }

    fn report(&mut self) -> Result<(), SizerError> {
        let Some(win) = self.focused()? else {
            return Ok(());
        };
        let (monitor, work_area) = self.geometry_context()?;
        let scale = self
            .compositor
            .scale_factor()
            .map_err(|e| SizerError::Compositor(e.to_string()))?;

        let (frame, wm_class, title) = match (win.frame(), win.wm_class(), win.title()) {
            (Ok(f), Ok(c), Ok(t)) => (f, c, t),
            _ => {
                debug!("window went away before reporting");
                return Ok(());
            }
        };

        let report = SizeReport {
            wm_class,
            title,
            frame,
            monitor,
            work_area,
            scale,
        };
        if let Some(tx) = &self.report_tx {
            let _ = tx.send(report);
        } else {
            info!("{}", report);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{PointArg, RectArg, SizeArg};
    use crate::traits::{Axis, MaximizeState};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    #[derive(Debug, Default)]
    struct WinState {
        frame: Rect,
        max: MaximizeState,
        mutations: u32,
    }

    /// Compliant window double: every request lands immediately.
    #[derive(Debug, Clone, Default)]
    struct MockWindow {
        state: Rc<RefCell<WinState>>,
    }

    impl MockWindow {
        fn at(frame: Rect) -> Self {
            Self {
                state: Rc::new(RefCell::new(WinState {
                    frame,
                    ..WinState::default()
                })),
            }
        }

        fn frame_now(&self) -> Rect {
            self.state.borrow().frame
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("mock compositor error")]
    struct MockError;

    impl WindowOps for MockWindow {
        type Error = MockError;

        fn frame(&self) -> Result<Rect, MockError> {
            Ok(self.state.borrow().frame)
        }

        fn move_frame(&self, x: i32, y: i32) -> Result<(), MockError> {
            let mut s = self.state.borrow_mut();
            s.frame.x = x;
            s.frame.y = y;
            s.mutations += 1;
            Ok(())
        }

        fn move_resize_frame(&self, rect: &Rect) -> Result<(), MockError> {
            let mut s = self.state.borrow_mut();
            s.frame = *rect;
            s.mutations += 1;
            Ok(())
        }

        fn maximize_state(&self) -> Result<MaximizeState, MockError> {
            Ok(self.state.borrow().max)
        }

        fn maximize(&self, axis: Axis) -> Result<(), MockError> {
            let mut s = self.state.borrow_mut();
            match axis {
                Axis::Horizontal => s.max.horizontal = true,
                Axis::Vertical => s.max.vertical = true,
                Axis::Both => {
                    s.max.horizontal = true;
                    s.max.vertical = true;
                }
            }
            Ok(())
        }

        fn unmaximize(&self, axis: Axis) -> Result<(), MockError> {
            let mut s = self.state.borrow_mut();
            match axis {
                Axis::Horizontal => s.max.horizontal = false,
                Axis::Vertical => s.max.vertical = false,
                Axis::Both => s.max = MaximizeState::default(),
            }
            Ok(())
        }

        fn wm_class(&self) -> Result<String, MockError> {
            Ok("Mock".into())
        }

        fn title(&self) -> Result<String, MockError> {
            Ok("mock window".into())
        }
    }

    struct MockCompositor {
        window: Option<MockWindow>,
        monitor: Rect,
        work_area: Rect,
    }

    impl MockCompositor {
        fn with_window(window: MockWindow) -> Self {
            Self {
                window: Some(window),
                monitor: Rect::new(0, 0, 1920, 1080),
                work_area: Rect::new(0, 0, 1920, 1080),
            }
        }

        fn empty() -> Self {
            Self {
                window: None,
                monitor: Rect::new(0, 0, 1920, 1080),
                work_area: Rect::new(0, 0, 1920, 1080),
            }
        }
    }

    impl Compositor for MockCompositor {
        type Error = MockError;
        type Window = MockWindow;

        fn focused_window(&self) -> Result<Option<MockWindow>, MockError> {
            Ok(self.window.clone())
        }

        fn monitor_geometry(&self) -> Result<Rect, MockError> {
            Ok(self.monitor)
        }

        fn work_area(&self) -> Result<Rect, MockError> {
            Ok(self.work_area)
        }

        fn scale_factor(&self) -> Result<f64, MockError> {
            Ok(1.0)
        }
    }

    fn sizer(comp: MockCompositor) -> Sizer<MockCompositor> {
        Sizer::with_engine(comp, PlacementEngine::new(Duration::ZERO, 6))
    }

    #[test]
    fn resize_preserves_position_exactly() {
        let win = MockWindow::at(Rect::new(123, 45, 640, 480));
        let mut s = sizer(MockCompositor::with_window(win.clone()));

        s.handle(Command::Resize(SizeArg {
            width: 800,
            height: 600,
        }))
        .unwrap();

        assert_eq!(win.frame_now(), Rect::new(123, 45, 800, 600));
    }

    #[test]
    fn center_computes_floor_midpoint() {
        let win = MockWindow::at(Rect::new(0, 0, 800, 600));
        let mut s = sizer(MockCompositor::with_window(win.clone()));

        s.handle(Command::CenterInWorkArea).unwrap();

        let f = win.frame_now();
        assert_eq!((f.x, f.y), (560, 240));
        // Size untouched.
        assert_eq!((f.width, f.height), (800, 600));
    }

    #[test]
    fn move_in_monitor_offsets_by_monitor_origin() {
        let win = MockWindow::at(Rect::new(0, 0, 400, 300));
        let mut comp = MockCompositor::with_window(win.clone());
        comp.monitor = Rect::new(1920, 100, 2560, 1440);
        let mut s = sizer(comp);

        s.handle(Command::MoveInMonitor(PointArg { x: 10, y: 20 }))
            .unwrap();

        let f = win.frame_now();
        assert_eq!((f.x, f.y), (1930, 120));
    }

    #[test]
    fn move_resize_in_work_area_resolves_and_maximizes_full_span() {
        let win = MockWindow::at(Rect::new(5, 5, 100, 100));
        let mut comp = MockCompositor::with_window(win.clone());
        comp.work_area = Rect::new(0, 32, 1920, 1048);
        let mut s = sizer(comp);

        s.handle(Command::MoveResizeInWorkArea(RectArg {
            x: 0,
            y: 0,
            width: 1920,
            height: 1048,
        }))
        .unwrap();

        assert_eq!(win.frame_now(), Rect::new(0, 32, 1920, 1048));
        let state = win.maximize_state().unwrap();
        assert!(state.horizontal);
        assert!(state.vertical);
    }

    #[test]
    fn partial_move_resize_clears_maximize_flags() {
        let win = MockWindow::at(Rect::new(0, 0, 1920, 1080));
        win.state.borrow_mut().max = MaximizeState {
            horizontal: true,
            vertical: true,
        };
        let mut s = sizer(MockCompositor::with_window(win.clone()));

        s.handle(Command::MoveResize(RectArg {
            x: 100,
            y: 100,
            width: 800,
            height: 600,
        }))
        .unwrap();

        assert_eq!(win.frame_now(), Rect::new(100, 100, 800, 600));
        assert!(!win.maximize_state().unwrap().any());
    }

    #[test]
    fn no_focused_window_is_a_silent_noop() {
        let mut s = sizer(MockCompositor::empty());
        for cmd in [
            Command::Get,
            Command::Move(PointArg { x: 0, y: 0 }),
            Command::MoveResize(RectArg {
                x: 0,
                y: 0,
                width: 100,
                height: 100,
            }),
            Command::Resize(SizeArg {
                width: 100,
                height: 100,
            }),
            Command::CenterInWorkArea,
        ] {
            assert!(s.handle(cmd).is_ok());
        }
    }

    #[test]
    fn get_sends_a_report_without_mutating() {
        let win = MockWindow::at(Rect::new(100, 64, 800, 600));
        let mut comp = MockCompositor::with_window(win.clone());
        comp.work_area = Rect::new(0, 32, 1920, 1048);
        let mut s = sizer(comp);
        let (tx, rx) = mpsc::channel();
        s.set_report_sink(tx);

        s.handle(Command::Get).unwrap();

        let report = rx.try_recv().expect("no report sent");
        assert_eq!(report.frame, Rect::new(100, 64, 800, 600));
        assert_eq!(report.monitor, Rect::new(0, 0, 1920, 1080));
        assert_eq!(report.work_area, Rect::new(0, 32, 1920, 1048));
        assert_eq!(win.state.borrow().mutations, 0);
    }

    #[test]
    fn get_without_window_sends_nothing() {
        let mut s = sizer(MockCompositor::empty());
        let (tx, rx) = mpsc::channel();
        s.set_report_sink(tx);

        s.handle(Command::Get).unwrap();

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn move_in_work_area_offsets_by_work_area_origin() {
        let win = MockWindow::at(Rect::new(500, 500, 400, 300));
        let mut comp = MockCompositor::with_window(win.clone());
        comp.work_area = Rect::new(64, 32, 1856, 1048);
        let mut s = sizer(comp);

        s.handle(Command::MoveInWorkArea(PointArg { x: 0, y: 0 }))
            .unwrap();

        let f = win.frame_now();
        assert_eq!((f.x, f.y), (64, 32));
        assert_eq!((f.width, f.height), (400, 300));
    }
}
