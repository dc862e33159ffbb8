//! Node/edge color palette.
//!
//! Canvas documents store colors as small palette indices (`"1"`..`"6"`). Anything outside the
//! palette, including a missing value, resolves to the neutral slate color.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS `rgba(...)` form with the given alpha.
    pub fn css_with_alpha(&self, alpha: f64) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
    }

    /// Channels normalized to `0.0..=1.0`.
    pub fn to_unit(&self) -> (f32, f32, f32) {
        (
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// A `color` field exactly as it appeared in the document.
///
/// Any JSON value loads; it saves back unchanged. Only strings and whole non-negative numbers
/// name a palette entry, everything else resolves to the fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(Value);

impl Color {
    pub fn new(key: impl Into<String>) -> Self {
        Self(Value::String(key.into()))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// The palette key: strings as written, whole numbers in decimal (`3` reads as `"3"`).
    pub fn key(&self) -> Option<Cow<'_, str>> {
        match &self.0 {
            Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    return Some(Cow::Owned(u.to_string()));
                }
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                    .map(|f| Cow::Owned(format!("{f:.0}")))
            }
            _ => None,
        }
    }
}

impl From<&str> for Color {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Color {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

pub const PALETTE: [Rgb; 6] = [
    Rgb::new(59, 130, 246),
    Rgb::new(249, 115, 22),
    Rgb::new(234, 179, 8),
    Rgb::new(34, 197, 94),
    Rgb::new(6, 182, 212),
    Rgb::new(168, 85, 247),
];

pub const FALLBACK: Rgb = Rgb::new(100, 116, 139);

/// Stroke used for edges that carry no color of their own.
pub const DEFAULT_EDGE: Rgb = Rgb::new(203, 213, 225);

pub fn resolve_color(color: Option<&str>) -> Rgb {
    color
        .and_then(palette_index)
        .map(|idx| PALETTE[idx])
        .unwrap_or(FALLBACK)
}

/// Advances a node color to the next palette entry, wrapping after the last one.
///
/// Unparseable colors count as index `0`, so they step to `"1"`.
pub fn next_color(color: Option<&str>) -> String {
    let current = color
        .and_then(|c| c.trim().parse::<u64>().ok())
        .unwrap_or(0);
    ((current % PALETTE.len() as u64) + 1).to_string()
}

/// Stroke for a node's `color` field.
pub fn node_color(color: Option<&Color>) -> Rgb {
    match color {
        Some(c) => resolve_color(c.key().as_deref()),
        None => FALLBACK,
    }
}

/// Stroke for an edge's `color` field; uncolored edges use [`DEFAULT_EDGE`].
pub fn edge_color(color: Option<&Color>) -> Rgb {
    match color {
        Some(c) => resolve_color(c.key().as_deref()),
        None => DEFAULT_EDGE,
    }
}

fn palette_index(color: &str) -> Option<usize> {
    match color.trim().parse::<usize>().ok()? {
        n @ 1..=6 => Some(n - 1),
        _ => None,
    }
}
