//! Drawable surfaces the renderer paints into.

use glyphfall_core::{Rgba, Viewport};
use thiserror::Error;

/// Axis-aligned rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PixelRect {
    /// Rectangle covering the whole viewport.
    pub fn covering(viewport: Viewport) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: viewport.width as f32,
            height: viewport.height as f32,
        }
    }
}

/// A 2D drawing target sized in logical pixels.
pub trait Surface {
    /// Resize to match `viewport`, discarding previous contents.
    fn resize(&mut self, viewport: Viewport);

    /// Current size.
    fn viewport(&self) -> Viewport;

    /// Blend `color` over every pixel of `rect`.
    fn fill_rect(&mut self, rect: PixelRect, color: Rgba);

    /// Draw `glyph` with its left edge at `x` and its baseline at `y`.
    fn fill_glyph(&mut self, glyph: char, x: f32, y: f32, color: Rgba);
}

/// The host could not provide a surface to draw on.
#[derive(Debug, Error)]
#[error("drawing surface unavailable: {reason}")]
pub struct SurfaceUnavailable {
    pub reason: String,
}

impl SurfaceUnavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Hands out surfaces when a background is mounted.
pub trait SurfaceProvider {
    type Surface: Surface;

    /// Acquire a fresh surface.
    fn acquire(&mut self) -> Result<Self::Surface, SurfaceUnavailable>;
}

/// One recorded paint call.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintOp {
    Resize(Viewport),
    FillRect(PixelRect, Rgba),
    FillGlyph {
        glyph: char,
        x: f32,
        y: f32,
        color: Rgba,
    },
}

/// Surface that records paint calls instead of drawing them.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    viewport: Viewport,
    ops: Vec<PaintOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paint calls recorded so far.
    pub fn ops(&self) -> &[PaintOp] {
        &self.ops
    }

    /// Drain the recorded paint calls.
    pub fn take_ops(&mut self) -> Vec<PaintOp> {
        std::mem::take(&mut self.ops)
    }

    /// Number of glyphs painted so far.
    pub fn glyph_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, PaintOp::FillGlyph { .. }))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.ops.push(PaintOp::Resize(viewport));
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn fill_rect(&mut self, rect: PixelRect, color: Rgba) {
        self.ops.push(PaintOp::FillRect(rect, color));
    }

    fn fill_glyph(&mut self, glyph: char, x: f32, y: f32, color: Rgba) {
        self.ops.push(PaintOp::FillGlyph { glyph, x, y, color });
    }
}

/// Provider for [`RecordingSurface`]s, optionally refusing every request.
#[derive(Debug, Clone, Default)]
pub struct RecordingProvider {
    /// When set, every acquisition fails.
    pub unavailable: bool,
}

impl SurfaceProvider for RecordingProvider {
    type Surface = RecordingSurface;

    fn acquire(&mut self) -> Result<RecordingSurface, SurfaceUnavailable> {
        if self.unavailable {
            return Err(SurfaceUnavailable::new("recording disabled"));
        }
        Ok(RecordingSurface::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_surface_records_in_order() {
        let mut surface = RecordingSurface::new();
        let viewport = Viewport::new(28, 28);
        surface.resize(viewport);
        surface.fill_rect(PixelRect::covering(viewport), Rgba::new(0, 0, 0, 0.5));
        surface.fill_glyph('ア', 0.0, 14.0, Rgba::new(0, 255, 255, 0.1));

        assert_eq!(surface.viewport(), viewport);
        assert_eq!(surface.glyph_count(), 1);
        let ops = surface.take_ops();
        assert_eq!(ops.len(), 3);
        assert_eq!(ops[0], PaintOp::Resize(viewport));
        assert!(surface.ops().is_empty());
    }

    #[test]
    fn test_provider_unavailable() {
        let mut provider = RecordingProvider { unavailable: true };
        let err = provider.acquire().unwrap_err();
        assert_eq!(
            err.to_string(),
            "drawing surface unavailable: recording disabled"
        );
        assert!(RecordingProvider::default().acquire().is_ok());
    }
}
