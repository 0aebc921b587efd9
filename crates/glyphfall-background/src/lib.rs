//! Falling glyph background for glyphfall.
//!
//! A [`BackgroundRenderer`] owns a [`Surface`] and one [`RainDrop`] per
//! 14px column. Every tick it darkens the whole surface with a translucent
//! fill, paints each drop's glyph and lets the drop fall, respawning it above
//! the top edge once it passes the bottom. [`mount`] wires a renderer to a
//! [`Scheduler`] so it repaints every 50ms and rebuilds on resize.

mod cells;
mod chars;
mod color;
mod entropy;
mod mount;
mod rain;
mod renderer;
mod scheduler;
mod surface;

pub use cells::CellSurface;
pub use chars::{GLYPHS, is_glyph};
pub use color::{hsl_to_rgb, hsla};
pub use entropy::{Entropy, SequenceEntropy};
pub use mount::{MountedBackground, mount};
pub use rain::{
    Advance, CELL_SIZE, RESPAWN_CEILING, RainDrop, SHIMMER_PROBABILITY, column_count, init_drops,
};
pub use renderer::{
    BackgroundRenderer, GLYPH_ATTENUATION, GLYPH_HUE, TICK_INTERVAL, TRAIL_FILL, glyph_color,
};
pub use scheduler::{IntervalHandle, ListenerHandle, Scheduler};
pub use surface::{
    PaintOp, PixelRect, RecordingProvider, RecordingSurface, Surface, SurfaceProvider,
    SurfaceUnavailable,
};
