//! **sizerd** — a remote-control daemon for window geometry.
//!
//! sizerd listens on a Unix socket for one-shot geometry commands
//! (move, resize, move+resize, centering — absolute or relative to the
//! focused monitor / its work area) and applies them to the currently
//! focused window, normalizing the compositor's maximize state and
//! retrying through compositor quirks until the observed frame matches
//! the request.
//!
//! # Architecture
//!
//! The crate is organised around three core traits:
//!
//! * [`traits::Compositor`] / [`traits::WindowOps`] — abstract the
//!   window manager so geometry resolution and placement are not
//!   coupled to any specific compositor.
//! * [`traits::CommandSource`] — abstracts the transport that delivers
//!   commands so the main loop is not coupled to any specific IPC
//!   mechanism.
//!
//! Concrete implementations live in [`hyprland`] (Hyprland IPC) and
//! [`ipc`] (Unix-socket command listener).  The pure coordinate-frame
//! arithmetic sits in [`geometry`], the retrying core in [`placement`],
//! and the command dispatch in [`sizer`].

pub mod command;
pub mod config;
pub mod geometry;
pub mod hyprland;
pub mod ipc;
pub mod placement;
pub mod report;
pub mod sizer;
pub mod traits;
