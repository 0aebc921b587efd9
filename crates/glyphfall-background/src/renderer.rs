//! Falling glyph renderer state.

use std::time::Duration;

use glyphfall_core::{Rgb, Rgba, Viewport};

use crate::color::hsla;
use crate::entropy::Entropy;
use crate::rain::{self, RainDrop};
use crate::surface::{PixelRect, Surface};

/// Time between repaints.
pub const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Fill painted over the whole surface each tick instead of clearing it.
pub const TRAIL_FILL: Rgba = Rgb::new(16, 20, 24).with_alpha(0.05);

/// Hue of the glyphs, in degrees.
pub const GLYPH_HUE: f32 = 180.0;

/// Multiplier applied to each drop's opacity when painting.
pub const GLYPH_ATTENUATION: f32 = 0.3;

/// Owns a surface and the drops painted into it.
#[derive(Debug)]
pub struct BackgroundRenderer<S, E> {
    surface: S,
    entropy: E,
    drops: Vec<RainDrop>,
    ticks: u64,
}

impl<S: Surface, E: Entropy> BackgroundRenderer<S, E> {
    /// Size `surface` to `viewport` and seed one drop per column.
    pub fn new(surface: S, viewport: Viewport, entropy: E) -> Self {
        let mut renderer = Self {
            surface,
            entropy,
            drops: Vec::new(),
            ticks: 0,
        };
        renderer.resize(viewport);
        renderer
    }

    /// Resize the surface and rebuild every drop from scratch.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn resize(&mut self, viewport: Viewport) {
        self.surface.resize(viewport);
        self.drops = rain::init_drops(viewport.width, viewport.height, &mut self.entropy);
        tracing::debug!(columns = self.drops.len(), "drops rebuilt");
    }

    /// Paint one frame and advance every drop.
    pub fn tick(&mut self) {
        let viewport = self.surface.viewport();
        self.surface
            .fill_rect(PixelRect::covering(viewport), TRAIL_FILL);

        let height = viewport.height as f32;
        let mut respawned = 0usize;
        let mut shimmered = 0usize;
        for drop in &mut self.drops {
            self.surface
                .fill_glyph(drop.glyph, drop.column_x, drop.y, glyph_color(drop.opacity));

            let step = drop.advance(height, &mut self.entropy);
            respawned += usize::from(step.respawned);
            shimmered += usize::from(step.shimmered);
            *drop = step.drop;
        }

        self.ticks += 1;
        tracing::trace!(tick = self.ticks, respawned, shimmered, "background tick");
    }

    /// Current drops, in column order.
    pub fn drops(&self) -> &[RainDrop] {
        &self.drops
    }

    /// Mutable access to the drops, e.g. to place one at a known position.
    pub fn drops_mut(&mut self) -> &mut [RainDrop] {
        &mut self.drops
    }

    /// Surface being painted.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Current surface size.
    pub fn viewport(&self) -> Viewport {
        self.surface.viewport()
    }

    /// Ticks painted since creation.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

/// Cyan at the drop's attenuated opacity.
pub fn glyph_color(opacity: f32) -> Rgba {
    hsla(GLYPH_HUE, 1.0, 0.5, opacity * GLYPH_ATTENUATION)
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::entropy::SequenceEntropy;
    use crate::surface::{PaintOp, RecordingSurface};

    fn renderer(width: u32, height: u32, seed: u64) -> BackgroundRenderer<RecordingSurface, StdRng> {
        BackgroundRenderer::new(
            RecordingSurface::new(),
            Viewport::new(width, height),
            StdRng::seed_from_u64(seed),
        )
    }

    #[test]
    fn test_mount_size_1400x800() {
        let r = renderer(1400, 800, 3);
        assert_eq!(r.drops().len(), 100);
        assert!(r.drops().iter().all(|d| d.y < 0.0));
        assert_eq!(r.viewport(), Viewport::new(1400, 800));
    }

    #[test]
    fn test_resize_rebuilds_drops() {
        let mut r = renderer(1400, 800, 3);
        for _ in 0..40 {
            r.tick();
        }
        r.resize(Viewport::new(700, 800));
        assert_eq!(r.drops().len(), 50);
        assert!(r.drops().iter().all(|d| d.y < 0.0));
        for (i, drop) in r.drops().iter().enumerate() {
            assert_eq!(drop.column_x, (i * 14) as f32);
        }
        assert_eq!(
            r.surface().ops().last(),
            Some(&PaintOp::Resize(Viewport::new(700, 800)))
        );
    }

    #[test]
    fn test_tick_paints_fill_then_glyphs() {
        let mut r = renderer(56, 100, 5);
        let before: Vec<RainDrop> = r.drops().to_vec();
        r.surface_mut().take_ops();
        r.tick();

        let ops = r.surface().ops();
        assert_eq!(ops.len(), 5);
        assert_eq!(
            ops[0],
            PaintOp::FillRect(PixelRect::covering(Viewport::new(56, 100)), TRAIL_FILL)
        );
        for (op, drop) in ops[1..].iter().zip(&before) {
            assert_eq!(
                op,
                &PaintOp::FillGlyph {
                    glyph: drop.glyph,
                    x: drop.column_x,
                    y: drop.y,
                    color: glyph_color(drop.opacity),
                }
            );
        }
        assert_eq!(r.ticks(), 1);
    }

    #[test]
    fn test_overflowing_drop_respawns_within_tick() {
        let mut r = BackgroundRenderer::new(
            RecordingSurface::new(),
            Viewport::new(14, 800),
            SequenceEntropy::constant(0.5),
        );
        r.drops_mut()[0].y = 801.0;
        r.tick();
        let drop = &r.drops()[0];
        assert!(drop.y < 0.0);
        assert_eq!(drop.column_x, 0.0);
    }

    #[test]
    fn test_column_x_survives_ticks() {
        let mut r = renderer(280, 60, 11);
        let columns: Vec<f32> = r.drops().iter().map(|d| d.column_x).collect();
        for _ in 0..500 {
            r.tick();
        }
        let after: Vec<f32> = r.drops().iter().map(|d| d.column_x).collect();
        assert_eq!(columns, after);
    }

    #[test]
    fn test_narrow_viewport_has_no_drops() {
        let mut r = renderer(10, 800, 1);
        assert!(r.drops().is_empty());
        r.tick();
        assert_eq!(r.surface().glyph_count(), 0);
    }

    #[test]
    fn test_glyph_color_attenuation() {
        let color = glyph_color(0.5);
        assert_eq!(color.rgb(), Rgb::new(0, 255, 255));
        assert!((color.a - 0.15).abs() < f32::EPSILON);
        assert_eq!(glyph_color(0.0).a, 0.0);
    }
}
