//! Falling glyph drops.

use crate::entropy::Entropy;

/// Width of one drop column in pixels, also the glyph font size.
pub const CELL_SIZE: u32 = 14;

/// Respawned drops re-enter from at most this many pixels above the top edge.
pub const RESPAWN_CEILING: f32 = 100.0;

/// Per-tick probability that a drop swaps its glyph without respawning.
pub const SHIMMER_PROBABILITY: f64 = 0.01;

/// State for a single falling glyph.
#[derive(Debug, Clone, PartialEq)]
pub struct RainDrop {
    /// Horizontal pixel position, fixed for the drop's lifetime.
    pub column_x: f32,
    /// Vertical pixel position of the glyph baseline.
    pub y: f32,
    /// Glyph currently drawn.
    pub glyph: char,
    /// Paint opacity in `[0, 1)`.
    pub opacity: f32,
    /// Pixels advanced per tick, in `[1, 3)`.
    pub fall_speed: f32,
}

/// Result of advancing a drop by one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Advance {
    pub drop: RainDrop,
    /// The drop fell past the bottom edge and was respawned.
    pub respawned: bool,
    /// The glyph was resampled by the shimmer roll.
    pub shimmered: bool,
}

/// Number of drop columns that fit in `width` pixels.
pub fn column_count(width: u32) -> usize {
    (width / CELL_SIZE) as usize
}

/// Create the drops for a surface of the given size.
///
/// Start positions are staggered over `[-height, 0)` so columns enter the
/// visible area at different times.
pub fn init_drops(width: u32, height: u32, entropy: &mut impl Entropy) -> Vec<RainDrop> {
    (0..column_count(width))
        .map(|column| {
            let offset = height as f32 * unit_to_offset(entropy.next_unit());
            RainDrop::spawn(column_x(column), offset, entropy)
        })
        .collect()
}

fn column_x(column: usize) -> f32 {
    (column as u32 * CELL_SIZE) as f32
}

/// Map a sample in `[0, 1)` to a factor in `(0, 1]`, so offsets are never zero.
fn unit_to_offset(u: f64) -> f32 {
    (1.0 - u) as f32
}

impl RainDrop {
    /// Create a drop `offset` pixels above the top edge with fresh random fields.
    ///
    /// Samples are drawn in the order glyph, opacity, speed.
    pub fn spawn(column_x: f32, offset: f32, entropy: &mut impl Entropy) -> Self {
        let glyph = entropy.glyph();
        let opacity = entropy.next_unit() as f32;
        let fall_speed = 1.0 + 2.0 * entropy.next_unit() as f32;
        Self {
            column_x,
            y: -offset,
            glyph,
            // f64 -> f32 rounding can land exactly on the upper bound
            opacity: opacity.min(1.0 - f32::EPSILON),
            fall_speed: fall_speed.min(3.0 - 2.0 * f32::EPSILON),
        }
    }

    /// Same column, new position above the top edge and new random fields.
    pub fn respawn(&self, entropy: &mut impl Entropy) -> Self {
        let offset = RESPAWN_CEILING * unit_to_offset(entropy.next_unit());
        Self::spawn(self.column_x, offset, entropy)
    }

    /// Advance by one tick on a surface `height` pixels tall.
    pub fn advance(&self, height: f32, entropy: &mut impl Entropy) -> Advance {
        let mut drop = Self {
            y: self.y + self.fall_speed,
            ..self.clone()
        };

        let respawned = drop.y > height;
        if respawned {
            drop = drop.respawn(entropy);
        }

        let shimmered = entropy.chance(SHIMMER_PROBABILITY);
        if shimmered {
            drop.glyph = entropy.glyph();
        }

        Advance {
            drop,
            respawned,
            shimmered,
        }
    }
}
