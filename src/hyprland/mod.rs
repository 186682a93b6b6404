//! Hyprland-specific implementations.
//!
//! This module provides the concrete backend for the
//! [`Compositor`](crate::traits::Compositor) trait, powered by
//! Hyprland's IPC socket.  Nothing outside this module should reference
//! Hyprland directly.

pub mod wm;
