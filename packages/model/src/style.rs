//! Style primitives shared by every block kind.

use serde::{Deserialize, Serialize};
use std::fmt;

/// CSS keyword for "no background"
pub const TRANSPARENT: &str = "transparent";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FontWeight::Normal => "normal",
            FontWeight::Bold => "bold",
        })
    }
}

impl fmt::Display for TextAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        })
    }
}

impl fmt::Display for VerticalAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VerticalAlign::Top => "top",
            VerticalAlign::Middle => "middle",
            VerticalAlign::Bottom => "bottom",
        })
    }
}

/// Four-sided padding box, in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxSides {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

/// Padding stored either as one number or as a box.
///
/// Persisted documents contain both shapes (`10` or
/// `{"top": 4, "right": 8, "bottom": 4, "left": 8}`), so the enum is untagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Padding {
    Uniform(u32),
    Sides(BoxSides),
}

impl Padding {
    /// Expand to four sides
    pub fn sides(&self) -> BoxSides {
        match *self {
            Padding::Uniform(v) => BoxSides {
                top: v,
                right: v,
                bottom: v,
                left: v,
            },
            Padding::Sides(sides) => sides,
        }
    }

    /// Link all sides to the top value (the padding control's "link" toggle)
    pub fn linked(&self) -> Padding {
        Padding::Uniform(self.sides().top)
    }

    /// Set one side, expanding a uniform value into a box first
    pub fn with_side(&self, side: Side, value: u32) -> Padding {
        let mut sides = self.sides();
        match side {
            Side::Top => sides.top = value,
            Side::Right => sides.right = value,
            Side::Bottom => sides.bottom = value,
            Side::Left => sides.left = value,
        }
        Padding::Sides(sides)
    }

    /// CSS shorthand value (`10px` or `4px 8px 4px 8px`)
    pub fn to_css(&self) -> String {
        match self {
            Padding::Uniform(v) => format!("{}px", v),
            Padding::Sides(s) => format!("{}px {}px {}px {}px", s.top, s.right, s.bottom, s.left),
        }
    }
}

impl Default for Padding {
    fn default() -> Self {
        Padding::Uniform(0)
    }
}

impl From<u32> for Padding {
    fn from(v: u32) -> Self {
        Padding::Uniform(v)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

/// True when a color value means "paint nothing"
pub fn is_transparent(color: &str) -> bool {
    color.trim().eq_ignore_ascii_case(TRANSPARENT)
}
