//! Terminal cell compositor.
//!
//! Paint calls arrive in pixel coordinates and are blended source-over into
//! per-cell premultiplied accumulators, so a translucent full-surface fill
//! fades older glyphs the same way it would on a canvas. Presenting the
//! surface composites it over a backdrop at the layer opacity and produces
//! one ratatui [`Line`] per terminal row.

use glyphfall_core::{CellMetrics, Rgb, Rgba, Viewport};
use ratatui::{
    style::Style,
    text::{Line, Span},
};
use unicode_width::UnicodeWidthChar;

use crate::surface::{PixelRect, Surface};

/// Glyphs whose ink is this close to the ground on every channel are dropped.
const FADE_EPSILON: f32 = 1.0 / 512.0;

/// Premultiplied RGBA accumulator, channels in 0.0-1.0.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Premul {
    r: f32,
    g: f32,
    b: f32,
    a: f32,
}

impl Premul {
    /// Blend `src` over this value.
    fn over(self, src: Rgba) -> Self {
        let a = src.a.clamp(0.0, 1.0);
        let keep = 1.0 - a;
        Self {
            r: f32::from(src.r) / 255.0 * a + self.r * keep,
            g: f32::from(src.g) / 255.0 * a + self.g * keep,
            b: f32::from(src.b) / 255.0 * a + self.b * keep,
            a: a + self.a * keep,
        }
    }

    /// Composite over an opaque `backdrop`, scaled by `opacity`.
    fn present(self, backdrop: Rgb, opacity: f32) -> Rgb {
        let cover = self.a * opacity;
        let mix = |bg: u8, premul: f32| {
            let v = f32::from(bg) / 255.0 * (1.0 - cover) + premul * opacity;
            (v.clamp(0.0, 1.0) * 255.0).round() as u8
        };
        Rgb::new(
            mix(backdrop.r, self.r),
            mix(backdrop.g, self.g),
            mix(backdrop.b, self.b),
        )
    }

    fn is_close(self, other: Self) -> bool {
        (self.r - other.r).abs() < FADE_EPSILON
            && (self.g - other.g).abs() < FADE_EPSILON
            && (self.b - other.b).abs() < FADE_EPSILON
            && (self.a - other.a).abs() < FADE_EPSILON
    }
}

/// A glyph resident in a cell and the ink painted under its strokes.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Ink {
    glyph: char,
    color: Premul,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Cell {
    /// Pixels not covered by a glyph.
    ground: Premul,
    ink: Option<Ink>,
}

/// Surface backed by a grid of terminal cells.
#[derive(Debug, Clone)]
pub struct CellSurface {
    metrics: CellMetrics,
    viewport: Viewport,
    columns: u16,
    rows: u16,
    cells: Vec<Cell>,
}

impl CellSurface {
    /// Empty surface; call [`Surface::resize`] before painting.
    pub fn new(metrics: CellMetrics) -> Self {
        Self {
            metrics,
            viewport: Viewport::default(),
            columns: 0,
            rows: 0,
            cells: Vec::new(),
        }
    }

    /// Grid size as `(columns, rows)`.
    pub fn grid(&self) -> (u16, u16) {
        (self.columns, self.rows)
    }

    /// Visible glyph at a cell, if any.
    pub fn glyph_at(&self, column: u16, row: u16) -> Option<char> {
        self.cell(column, row)?.ink.map(|ink| ink.glyph)
    }

    /// Number of cells currently holding a glyph.
    pub fn glyph_count(&self) -> usize {
        self.cells.iter().filter(|c| c.ink.is_some()).count()
    }

    /// Presented colors of a cell as `(foreground, background)`.
    pub fn colors_at(
        &self,
        column: u16,
        row: u16,
        backdrop: Rgb,
        layer_opacity: f32,
    ) -> Option<(Rgb, Rgb)> {
        let cell = self.cell(column, row)?;
        let bg = cell.ground.present(backdrop, layer_opacity);
        let fg = cell
            .ink
            .map_or(bg, |ink| ink.color.present(backdrop, layer_opacity));
        Some((fg, bg))
    }

    /// Render the surface as styled lines, one per row.
    ///
    /// Wide glyphs take two columns; one that would overflow the last column
    /// is drawn as a blank.
    pub fn lines(&self, backdrop: Rgb, layer_opacity: f32) -> Vec<Line<'static>> {
        let layer_opacity = layer_opacity.clamp(0.0, 1.0);
        (0..self.rows)
            .map(|row| {
                let mut spans = Vec::with_capacity(self.columns as usize);
                let mut column = 0;
                while column < self.columns {
                    let idx = self.index(column, row);
                    let cell = &self.cells[idx];
                    let bg = cell.ground.present(backdrop, layer_opacity).to_color();

                    let width = cell
                        .ink
                        .map(|ink| ink.glyph.width().unwrap_or(1).max(1) as u16)
                        .unwrap_or(1);
                    match cell.ink {
                        Some(ink) if column + width <= self.columns => {
                            let fg = ink.color.present(backdrop, layer_opacity).to_color();
                            spans.push(Span::styled(
                                ink.glyph.to_string(),
                                Style::new().fg(fg).bg(bg),
                            ));
                            column += width;
                        }
                        _ => {
                            spans.push(Span::styled(" ", Style::new().bg(bg)));
                            column += 1;
                        }
                    }
                }
                Line::from(spans)
            })
            .collect()
    }

    fn cell(&self, column: u16, row: u16) -> Option<&Cell> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.cells.get(self.index(column, row))
    }

    fn index(&self, column: u16, row: u16) -> usize {
        row as usize * self.columns as usize + column as usize
    }

    /// Cell spanned by a glyph drawn at `(x, baseline)`.
    fn glyph_cell(&self, x: f32, baseline: f32) -> Option<(u16, u16)> {
        let cell_w = f32::from(self.metrics.width_px);
        let cell_h = f32::from(self.metrics.height_px);
        let column = (x / cell_w).floor();
        let row = ((baseline - cell_h / 2.0) / cell_h).floor();
        if column < 0.0 || row < 0.0 {
            return None;
        }
        let (column, row) = (column as u32, row as u32);
        if column >= u32::from(self.columns) || row >= u32::from(self.rows) {
            return None;
        }
        Some((column as u16, row as u16))
    }

    /// Half-open column and row ranges overlapped by `rect`.
    fn covered(&self, rect: PixelRect) -> (std::ops::Range<u16>, std::ops::Range<u16>) {
        let cell_w = f32::from(self.metrics.width_px);
        let cell_h = f32::from(self.metrics.height_px);
        let span = |start: f32, len: f32, cell: f32, limit: u16| {
            let lo = (start / cell).floor().clamp(0.0, f32::from(limit)) as u16;
            let hi = ((start + len) / cell).ceil().clamp(0.0, f32::from(limit)) as u16;
            lo..hi.max(lo)
        };
        (
            span(rect.x, rect.width, cell_w, self.columns),
            span(rect.y, rect.height, cell_h, self.rows),
        )
    }
}

impl Surface for CellSurface {
    fn resize(&mut self, viewport: Viewport) {
        let columns = viewport.width / u32::from(self.metrics.width_px.max(1));
        let rows = viewport.height / u32::from(self.metrics.height_px.max(1));
        self.viewport = viewport;
        self.columns = u16::try_from(columns).unwrap_or(u16::MAX);
        self.rows = u16::try_from(rows).unwrap_or(u16::MAX);
        self.cells = vec![Cell::default(); self.columns as usize * self.rows as usize];
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn fill_rect(&mut self, rect: PixelRect, color: Rgba) {
        let (columns, rows) = self.covered(rect);
        for row in rows {
            for column in columns.clone() {
                let idx = self.index(column, row);
                let cell = &mut self.cells[idx];
                cell.ground = cell.ground.over(color);
                cell.ink = cell.ink.and_then(|ink| {
                    let faded = ink.color.over(color);
                    (!faded.is_close(cell.ground)).then_some(Ink {
                        glyph: ink.glyph,
                        color: faded,
                    })
                });
            }
        }
    }

    fn fill_glyph(&mut self, glyph: char, x: f32, y: f32, color: Rgba) {
        let Some((column, row)) = self.glyph_cell(x, y) else {
            return;
        };
        let idx = self.index(column, row);
        let cell = &mut self.cells[idx];
        let base = match cell.ink {
            Some(ink) if ink.glyph == glyph => ink.color,
            _ => cell.ground,
        };
        cell.ink = Some(Ink {
            glyph,
            color: base.over(color),
        });
    }
}
