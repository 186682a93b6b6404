//! [`Compositor`] implementation backed by Hyprland IPC.
//!
//! Communicates directly with Hyprland through its Unix socket at
//! `$XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/.socket.sock`,
//! avoiding any shell command invocation or third-party crate for socket
//! discovery.
//!
//! Window handles are pinned to the window's address at focus-query
//! time, so geometry dispatches keep targeting the same window even if
//! focus moves during a retry loop.  A handle whose address no longer
//! appears in `j/clients` reports an error from every method, which the
//! placement engine treats as cancellation.
//!
//! Hyprland tracks a single maximize flag rather than one per axis, so
//! per-axis maximize requests degrade: clearing either axis clears the
//! flag, setting a single axis is a no-op (the geometry itself is
//! already exact; only the native "maximized" marker is unavailable).

use crate::geometry::Rect;
use crate::traits::{Axis, Compositor, MaximizeState, WindowOps};
use log::debug;
use serde::Deserialize;
use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;

/// Hyprland-backed compositor.
///
/// All communication happens over Hyprland's IPC socket.  No connection
/// is held open; each method call opens a short-lived request.
#[derive(Debug, Default)]
pub struct HyprlandCompositor;

/// Errors that can occur when talking to Hyprland.
#[derive(Debug, thiserror::Error)]
#[error("hyprland IPC error: {0}")]
pub struct HyprlandError(String);

impl HyprlandCompositor {
    /// Create a new handle.
    pub fn new() -> Self {
        Self
    }
}

//  Direct Hyprland IPC helpers

/// Resolve the Hyprland command socket path.
///
/// Hyprland ≥ 0.40 stores its sockets at
/// `$XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/.socket.sock`.
fn socket_path() -> Result<PathBuf, HyprlandError> {
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR")
        .map_err(|_| HyprlandError("XDG_RUNTIME_DIR not set".into()))?;
    let his = std::env::var("HYPRLAND_INSTANCE_SIGNATURE")
        .map_err(|_| HyprlandError("HYPRLAND_INSTANCE_SIGNATURE not set".into()))?;
    Ok(PathBuf::from(format!(
        "{}/hypr/{}/.socket.sock",
        runtime_dir, his
    )))
}

/// Send a raw command to the Hyprland command socket and return the
/// response as a string.
fn ipc_request(command: &str) -> Result<String, HyprlandError> {
    let path = socket_path()?;
    let mut stream = UnixStream::connect(&path)
        .map_err(|e| HyprlandError(format!("connect to {}: {}", path.display(), e)))?;

    stream
        .write_all(command.as_bytes())
        .map_err(|e| HyprlandError(format!("write: {}", e)))?;

    let mut response = Vec::new();
    stream
        .read_to_end(&mut response)
        .map_err(|e| HyprlandError(format!("read: {}", e)))?;

    String::from_utf8(response).map_err(|e| HyprlandError(format!("utf-8: {}", e)))
}

/// Send a JSON data query (`j/<command>`) and return the raw JSON string.
fn ipc_json(data_command: &str) -> Result<String, HyprlandError> {
    ipc_request(&format!("j/{}", data_command))
}

/// Send a dispatch command and check for `"ok"`.
fn ipc_dispatch(args: &str) -> Result<(), HyprlandError> {
    let response = ipc_request(&format!("/dispatch {}", args))?;
    if response.trim() == "ok" {
        Ok(())
    } else {
        Err(HyprlandError(format!("dispatch error: {}", response)))
    }
}

//  Minimal serde structs for the JSON we care about

/// Subset of the JSON object returned by `j/monitors`.
#[derive(Deserialize)]
struct MonitorJson {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    scale: f64,
    focused: bool,
    /// Reserved panel/dock space: `[left, top, right, bottom]`.
    #[serde(default)]
    reserved: [i32; 4],
}

/// Subset of the JSON object returned by `j/activewindow` and
/// `j/clients`.
#[derive(Deserialize)]
struct ClientJson {
    address: String,
    at: [i32; 2],
    size: [i32; 2],
    class: String,
    title: String,
    /// Fullscreen state: 0 none, 1 maximized, 2 fullscreen.
    #[serde(default)]
    fullscreen: i64,
}

/// Query `j/monitors` and return the focused one.
fn focused_monitor() -> Result<MonitorJson, HyprlandError> {
    let json = ipc_json("monitors")?;
    let monitors: Vec<MonitorJson> =
        serde_json::from_str(&json).map_err(|e| HyprlandError(format!("parse: {}", e)))?;
    monitors
        .into_iter()
        .find(|m| m.focused)
        .ok_or_else(|| HyprlandError("no focused monitor".into()))
}

/// Look up a client record by window address.
///
/// A missing record means the window has been closed.
fn client_by_address(address: &str) -> Result<ClientJson, HyprlandError> {
    let json = ipc_json("clients")?;
    let clients: Vec<ClientJson> =
        serde_json::from_str(&json).map_err(|e| HyprlandError(format!("parse: {}", e)))?;
    clients
        .into_iter()
        .find(|c| c.address == address)
        .ok_or_else(|| HyprlandError(format!("window {} no longer exists", address)))
}

//  Window handle

/// A transient handle to one Hyprland window, pinned by address.
#[derive(Debug, Clone)]
pub struct HyprlandWindow {
    address: String,
}

impl WindowOps for HyprlandWindow {
    type Error = HyprlandError;

    fn frame(&self) -> Result<Rect, HyprlandError> {
        let c = client_by_address(&self.address)?;
        Ok(Rect::new(c.at[0], c.at[1], c.size[0], c.size[1]))
    }

    fn move_frame(&self, x: i32, y: i32) -> Result<(), HyprlandError> {
        ipc_dispatch(&format!(
            "movewindowpixel exact {} {},address:{}",
            x, y, self.address
        ))
    }

    fn move_resize_frame(&self, rect: &Rect) -> Result<(), HyprlandError> {
        ipc_dispatch(&format!(
            "movewindowpixel exact {} {},address:{}",
            rect.x, rect.y, self.address
        ))?;
        ipc_dispatch(&format!(
            "resizewindowpixel exact {} {},address:{}",
            rect.width, rect.height, self.address
        ))
    }

    fn maximize_state(&self) -> Result<MaximizeState, HyprlandError> {
        let c = client_by_address(&self.address)?;
        let maximized = c.fullscreen == 1;
        Ok(MaximizeState {
            horizontal: maximized,
            vertical: maximized,
        })
    }

    fn maximize(&self, axis: Axis) -> Result<(), HyprlandError> {
        match axis {
            Axis::Both => ipc_dispatch("fullscreenstate 1 -1"),
            Axis::Horizontal | Axis::Vertical => {
                // Single-axis maximize does not exist in Hyprland.
                debug!("single-axis maximize unsupported, leaving geometry as-is");
                Ok(())
            }
        }
    }

    fn unmaximize(&self, _axis: Axis) -> Result<(), HyprlandError> {
        // Clearing any axis clears the single flag.
        ipc_dispatch("fullscreenstate 0 -1")
    }

    fn wm_class(&self) -> Result<String, HyprlandError> {
        Ok(client_by_address(&self.address)?.class)
    }

    fn title(&self) -> Result<String, HyprlandError> {
        Ok(client_by_address(&self.address)?.title)
    }
}

//  Compositor implementation

impl Compositor for HyprlandCompositor {
    type Error = HyprlandError;
    type Window = HyprlandWindow;

    fn focused_window(&self) -> Result<Option<HyprlandWindow>, HyprlandError> {
        let json = ipc_json("activewindow")?;
        // Hyprland returns an empty object `{}` when no window is focused.
        if json.trim() == "{}" {
            return Ok(None);
        }
        let c: ClientJson =
            serde_json::from_str(&json).map_err(|e| HyprlandError(format!("parse: {}", e)))?;
        Ok(Some(HyprlandWindow { address: c.address }))
    }

    fn monitor_geometry(&self) -> Result<Rect, HyprlandError> {
        let m = focused_monitor()?;
        Ok(Rect::new(m.x, m.y, m.width, m.height))
    }

    fn work_area(&self) -> Result<Rect, HyprlandError> {
        let m = focused_monitor()?;
        let [left, top, right, bottom] = m.reserved;
        Ok(Rect::new(
            m.x + left,
            m.y + top,
            m.width - left - right,
            m.height - top - bottom,
        ))
    }

    fn scale_factor(&self) -> Result<f64, HyprlandError> {
        Ok(focused_monitor()?.scale)
    }
}
