//! Terminal surfaces for the background layer.

use glyphfall_background::{CellSurface, SurfaceProvider, SurfaceUnavailable};
use glyphfall_core::CellMetrics;

/// Hands out [`CellSurface`]s sized for the terminal.
#[derive(Debug, Clone)]
pub struct TerminalSurfaces {
    metrics: CellMetrics,
    columns: u16,
    rows: u16,
}

impl TerminalSurfaces {
    pub fn new(metrics: CellMetrics) -> Self {
        Self {
            metrics,
            columns: 0,
            rows: 0,
        }
    }

    /// Record the terminal grid size.
    pub fn set_grid(&mut self, columns: u16, rows: u16) {
        self.columns = columns;
        self.rows = rows;
    }

    pub fn metrics(&self) -> CellMetrics {
        self.metrics
    }
}

impl SurfaceProvider for TerminalSurfaces {
    type Surface = CellSurface;

    fn acquire(&mut self) -> Result<CellSurface, SurfaceUnavailable> {
        if self.columns == 0 || self.rows == 0 {
            return Err(SurfaceUnavailable::new(format!(
                "terminal reports an empty {}x{} area",
                self.columns, self.rows
            )));
        }
        Ok(CellSurface::new(self.metrics))
    }
}
