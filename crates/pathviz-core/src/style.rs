//! Colours: [`Color`] and the fixed [`Palette`] lookup table.

use crate::cell::{Marker, VisualState};

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// An RGB colour packed into a `u32` (0x00RRGGBB).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Self = Self(0x000000);
    pub const GRAY: Self = Self(0x808080);
    pub const WHITE: Self = Self(0xffffff);
    pub const RED: Self = Self(0xff0000);
    pub const GREEN: Self = Self(0x00ff00);
    pub const BLUE: Self = Self(0x0000ff);
    pub const YELLOW: Self = Self(0xffff00);
    pub const CYAN: Self = Self(0x00ffff);

    /// Construct from individual RGB components.
    #[inline]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | (b as u32))
    }

    #[inline]
    pub const fn r(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 & 0xFF) as u8
    }
}

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// Colour for every [`VisualState`] and [`Marker`].
///
/// Every field is required, so a lookup can never miss.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Palette {
    pub path: Color,
    pub visited: Color,
    pub visiting: Color,
    pub wall: Color,
    pub default: Color,
    pub start: Color,
    pub end: Color,
}

impl Palette {
    /// Background colour for a cell in `state`.
    pub const fn color(&self, state: VisualState) -> Color {
        match state {
            VisualState::Path => self.path,
            VisualState::Visited => self.visited,
            VisualState::Visiting => self.visiting,
            VisualState::Wall => self.wall,
            VisualState::Default => self.default,
        }
    }

    /// Marker colour, or `None` for unmarked cells.
    pub const fn marker(&self, marker: Marker) -> Option<Color> {
        match marker {
            Marker::None => None,
            Marker::Start => Some(self.start),
            Marker::End => Some(self.end),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            path: Color::YELLOW,
            visited: Color::RED,
            visiting: Color::GREEN,
            wall: Color::GRAY,
            default: Color::BLACK,
            start: Color::CYAN,
            end: Color::BLUE,
        }
    }
}
