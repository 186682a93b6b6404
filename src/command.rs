//! Commands and wire types shared across sizerd.
//!
//! [`Command`] is the vocabulary of the control plane: every geometry
//! operation a client can request on the focused window.  Commands are
//! produced by [`CommandSource`](crate::traits::CommandSource)
//! implementations and consumed by the [`Sizer`](crate::sizer::Sizer).
//!
//! Pixel arguments are non-negative integers in the compositor's native
//! logical units.  For transport friendliness the pair and quad payloads
//! accept either objects (`{"x":0,"y":0}`) or space-separated strings
//! (`"0 0"`, `"0 0 1600 900"`); clients forward raw arguments and the
//! daemon parses.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// An `(x, y)` position payload.
///
/// Accepts `{"x":..,"y":..}` or the string `"x y"` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PointArg {
    pub x: u32,
    pub y: u32,
}

/// A `(width, height)` size payload.
///
/// Accepts `{"width":..,"height":..}` or the string `"width height"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SizeArg {
    pub width: u32,
    pub height: u32,
}

/// A full `(x, y, width, height)` payload.
///
/// Accepts `{"x":..,"y":..,"width":..,"height":..}` or the string
/// `"x y width height"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RectArg {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Parse `expected` whitespace-separated non-negative integers from `s`.
fn parse_fields<E: DeError>(s: &str, expected: usize, what: &str) -> Result<Vec<u32>, E> {
    let parts: Vec<&str> = s.split_whitespace().collect();
    if parts.len() != expected {
        return Err(DeError::custom(format!(
            "{}: expected {} integers, got {:?}",
            what, expected, s
        )));
    }
    parts
        .iter()
        .map(|p| {
            p.parse::<u32>().map_err(|_| {
                DeError::custom(format!("{}: {:?} is not a non-negative integer", what, p))
            })
        })
        .collect()
}

/// Pull named `u32` fields out of a serde map, erroring on a missing key.
fn map_fields<'de, A>(mut map: A, keys: &[&'static str]) -> Result<Vec<u32>, A::Error>
where
    A: serde::de::MapAccess<'de>,
{
    let mut values: Vec<Option<u32>> = vec![None; keys.len()];
    while let Some(k) = map.next_key::<String>()? {
        match keys.iter().position(|name| *name == k.as_str()) {
            Some(i) => values[i] = Some(map.next_value()?),
            None => {
                let _: serde::de::IgnoredAny = map.next_value()?;
            }
        }
    }
    values
        .into_iter()
        .zip(keys)
        .map(|(v, k)| v.ok_or_else(|| DeError::missing_field(*k)))
        .collect::<Result<Vec<u32>, _>>()
}

impl<'de> Deserialize<'de> for PointArg {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct V;
        impl<'de> serde::de::Visitor<'de> for V {
            type Value = PointArg;
            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "object {{x, y}} or string \"x y\"")
            }
            fn visit_map<A>(self, map: A) -> Result<PointArg, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let v = map_fields(map, &["x", "y"])?;
                Ok(PointArg { x: v[0], y: v[1] })
            }
            fn visit_str<E: DeError>(self, s: &str) -> Result<PointArg, E> {
                let v = parse_fields(s, 2, "position")?;
                Ok(PointArg { x: v[0], y: v[1] })
            }
        }
        deserializer.deserialize_any(V)
    }
}

impl<'de> Deserialize<'de> for SizeArg {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct V;
        impl<'de> serde::de::Visitor<'de> for V {
            type Value = SizeArg;
            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "object {{width, height}} or string \"width height\"")
            }
            fn visit_map<A>(self, map: A) -> Result<SizeArg, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let v = map_fields(map, &["width", "height"])?;
                Ok(SizeArg {
                    width: v[0],
                    height: v[1],
                })
            }
            fn visit_str<E: DeError>(self, s: &str) -> Result<SizeArg, E> {
                let v = parse_fields(s, 2, "size")?;
                Ok(SizeArg {
                    width: v[0],
                    height: v[1],
                })
            }
        }
        deserializer.deserialize_any(V)
    }
}

impl<'de> Deserialize<'de> for RectArg {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct V;
        impl<'de> serde::de::Visitor<'de> for V {
            type Value = RectArg;
            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(
                    f,
                    "object {{x, y, width, height}} or string \"x y width height\""
                )
            }
            fn visit_map<A>(self, map: A) -> Result<RectArg, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let v = map_fields(map, &["x", "y", "width", "height"])?;
                Ok(RectArg {
                    x: v[0],
                    y: v[1],
                    width: v[2],
                    height: v[3],
                })
            }
            fn visit_str<E: DeError>(self, s: &str) -> Result<RectArg, E> {
                let v = parse_fields(s, 4, "rectangle")?;
                Ok(RectArg {
                    x: v[0],
                    y: v[1],
                    width: v[2],
                    height: v[3],
                })
            }
        }
        deserializer.deserialize_any(V)
    }
}

/// Every geometry operation the control plane accepts.
///
/// Each variant maps 1:1 onto a [`Sizer`](crate::sizer::Sizer) method.
/// On the wire the unit variants are encoded as bare JSON strings
/// (`"Get"`, `"CenterInWorkArea"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Report the focused window's position and size, plus monitor and
    /// work-area sizes.  Mutates nothing.
    Get,

    /// Move the focused window to an absolute position.
    Move(PointArg),

    /// Move and resize the focused window to an absolute rectangle.
    MoveResize(RectArg),

    /// Resize the focused window in place, preserving its current
    /// position exactly.
    Resize(SizeArg),

    /// [`Move`](Command::Move) with the position relative to the origin
    /// of the monitor containing the input focus.
    MoveInMonitor(PointArg),

    /// [`MoveResize`](Command::MoveResize) with the position relative to
    /// the focused monitor's origin.  The size is always absolute.
    MoveResizeInMonitor(RectArg),

    /// [`Move`](Command::Move) with the position relative to the
    /// work-area origin.
    MoveInWorkArea(PointArg),

    /// [`MoveResize`](Command::MoveResize) with the position relative to
    /// the work-area origin.
    MoveResizeInWorkArea(RectArg),

    /// Center the focused window in the work area, size unchanged.
    CenterInWorkArea,
}
