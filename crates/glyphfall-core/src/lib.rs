//! Core types shared by the glyphfall crates.

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Size of the drawable area in logical pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Construct a viewport from pixel dimensions.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Pixel viewport covering a terminal grid of `columns` x `rows` cells.
    pub fn from_cells(columns: u16, rows: u16, metrics: CellMetrics) -> Self {
        Self {
            width: u32::from(columns) * u32::from(metrics.width_px),
            height: u32::from(rows) * u32::from(metrics.height_px),
        }
    }

    /// Whether the viewport has no drawable area.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Pixel footprint of a single terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellMetrics {
    /// Width of one terminal column in pixels.
    pub width_px: u16,
    /// Height of one terminal row in pixels.
    pub height_px: u16,
}

impl Default for CellMetrics {
    /// Half-width cell of a 14px monospace font.
    fn default() -> Self {
        Self {
            width_px: 7,
            height_px: 14,
        }
    }
}

/// Opaque RGB color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Attach an alpha channel.
    pub const fn with_alpha(self, a: f32) -> Rgba {
        Rgba {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }

    /// Convert to a ratatui color.
    pub fn to_color(self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(rgb: Rgb) -> Self {
        [rgb.r, rgb.g, rgb.b]
    }
}

/// RGB color with a straight (non-premultiplied) alpha in 0.0-1.0.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Color channels without alpha.
    pub const fn rgb(self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }
}
