//! Core traits that decouple sizerd from any specific compositor or
//! transport mechanism.
//!
//! Every concrete backend (Hyprland, a Unix-socket listener, a test
//! harness, …) implements one of these traits.  The
//! [`Sizer`](crate::sizer::Sizer) and
//! [`PlacementEngine`](crate::placement::PlacementEngine) only depend on
//! these abstractions.

use crate::command::Command;
use crate::geometry::Rect;
use std::sync::mpsc;

/// A maximize axis, as tracked by the compositor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
    Both,
}

/// Per-axis maximize flags for one window.
///
/// The compositor owns this state; sizerd only reads it and flips it as
/// a side effect of placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MaximizeState {
    pub horizontal: bool,
    pub vertical: bool,
}

impl MaximizeState {
    /// Whether the window is maximized on at least one axis.
    pub fn any(&self) -> bool {
        self.horizontal || self.vertical
    }
}

/// Operations on one top-level window.
///
/// A value implementing this trait is a transient handle obtained from
/// [`Compositor::focused_window`] and held only for the duration of a
/// single command.  The window may disappear at any moment (closed by
/// the user); every method can therefore fail, and a failing
/// [`frame`](WindowOps::frame) query mid-command is treated as
/// cancellation, never as a crash.
pub trait WindowOps {
    /// The error type produced by this backend.
    type Error: std::error::Error + Send + 'static;

    /// The window's current outer frame in absolute screen pixels.
    fn frame(&self) -> Result<Rect, Self::Error>;

    /// Move the frame to `(x, y)`, leaving the size unchanged.
    fn move_frame(&self, x: i32, y: i32) -> Result<(), Self::Error>;

    /// Move and resize the frame to `rect` in one request.
    fn move_resize_frame(&self, rect: &Rect) -> Result<(), Self::Error>;

    /// Current per-axis maximize flags.
    fn maximize_state(&self) -> Result<MaximizeState, Self::Error>;

    /// Set the maximize flag for `axis`.
    fn maximize(&self, axis: Axis) -> Result<(), Self::Error>;

    /// Clear the maximize flag for `axis`.
    fn unmaximize(&self, axis: Axis) -> Result<(), Self::Error>;

    /// Window class, for the size report.  Best effort.
    fn wm_class(&self) -> Result<String, Self::Error>;

    /// Window title, for the size report.  Best effort.
    fn title(&self) -> Result<String, Self::Error>;
}

/// Abstraction over a compositor that can locate the focused window and
/// describe the monitor containing it.
///
/// An implementation might talk to Hyprland via IPC, or it might be a
/// recording stub used in tests.  All geometry is queried fresh per
/// call — monitors can change between commands (hotplug, workspace
/// switch), so nothing here may be cached by the caller.
pub trait Compositor {
    /// The error type produced by this compositor.
    type Error: std::error::Error + Send + 'static;

    /// The window handle type this compositor hands out.
    type Window: WindowOps<Error = Self::Error>;

    /// The window currently holding input focus, or `None`.
    fn focused_window(&self) -> Result<Option<Self::Window>, Self::Error>;

    /// Geometry of the monitor containing the input focus.
    fn monitor_geometry(&self) -> Result<Rect, Self::Error>;

    /// The focused monitor's work area (monitor minus reserved
    /// panel/dock space) on the active virtual desktop.
    fn work_area(&self) -> Result<Rect, Self::Error>;

    /// Device scale factor of the focused monitor.
    ///
    /// Only the size report divides by this; placement always operates
    /// in the compositor's native frame units.
    fn scale_factor(&self) -> Result<f64, Self::Error>;
}

/// A source of [`Command`]s.
///
/// Implementations listen on some transport — a Unix socket, an
/// in-memory channel, … — and forward parsed commands into the provided
/// [`mpsc::Sender`].
///
/// # Contract
///
/// * [`run`](CommandSource::run) **blocks** until the source is exhausted
///   or an unrecoverable error occurs.
/// * Each received command must be sent through `sink` exactly once.
/// * Implementations must be [`Send`] so they can run on a dedicated
///   thread.
pub trait CommandSource: Send {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Start listening and forward every incoming [`Command`] into `sink`.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error>;
}
