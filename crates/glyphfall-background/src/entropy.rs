//! Injectable randomness for the background animation.

use rand::{Rng, rngs::StdRng};

use crate::chars::GLYPHS;

/// Source of uniform samples in `[0, 1)`.
pub trait Entropy {
    /// Next uniform sample in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Uniformly chosen glyph from the alphabet.
    fn glyph(&mut self) -> char {
        let idx = (self.next_unit() * GLYPHS.len() as f64) as usize;
        GLYPHS[idx.min(GLYPHS.len() - 1)]
    }

    /// Whether an event with probability `p` happens on this draw.
    fn chance(&mut self, p: f64) -> bool {
        self.next_unit() < p
    }
}

impl Entropy for StdRng {
    fn next_unit(&mut self) -> f64 {
        self.random::<f64>()
    }
}

impl<E: Entropy + ?Sized> Entropy for Box<E> {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Replays a fixed list of samples, wrapping around at the end.
///
/// Values are clamped into `[0, 1)` so a replayed sequence can never push a
/// drop outside its documented ranges.
#[derive(Debug, Clone)]
pub struct SequenceEntropy {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceEntropy {
    /// Largest sample strictly below 1.0.
    const MAX_SAMPLE: f64 = 1.0 - f64::EPSILON;

    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        let values: Vec<f64> = values
            .into_iter()
            .map(|v| if v.is_nan() { 0.0 } else { v.clamp(0.0, Self::MAX_SAMPLE) })
            .collect();
        Self { values, cursor: 0 }
    }

    /// A source that always yields `value`.
    pub fn constant(value: f64) -> Self {
        Self::new([value])
    }

    /// Number of samples drawn so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl Entropy for SequenceEntropy {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_sequence_wraps() {
        let mut entropy = SequenceEntropy::new([0.1, 0.2]);
        assert_eq!(entropy.next_unit(), 0.1);
        assert_eq!(entropy.next_unit(), 0.2);
        assert_eq!(entropy.next_unit(), 0.1);
        assert_eq!(entropy.draws(), 3);
    }

    #[test]
    fn test_sequence_clamps() {
        let mut entropy = SequenceEntropy::new([-3.0, 1.0, f64::NAN]);
        assert_eq!(entropy.next_unit(), 0.0);
        assert!(entropy.next_unit() < 1.0);
        assert_eq!(entropy.next_unit(), 0.0);
    }

    #[test]
    fn test_empty_sequence_yields_zero() {
        let mut entropy = SequenceEntropy::new(Vec::<f64>::new());
        assert_eq!(entropy.next_unit(), 0.0);
    }

    #[test]
    fn test_glyph_bounds() {
        assert_eq!(SequenceEntropy::constant(0.0).glyph(), GLYPHS[0]);
        assert_eq!(
            SequenceEntropy::constant(0.999_999).glyph(),
            GLYPHS[GLYPHS.len() - 1]
        );
    }

    #[test]
    fn test_chance() {
        assert!(SequenceEntropy::constant(0.005).chance(0.01));
        assert!(!SequenceEntropy::constant(0.01).chance(0.01));
    }

    #[test]
    fn test_std_rng_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let v = rng.next_unit();
            assert!((0.0..1.0).contains(&v));
        }
    }
}
