//! Color utility functions for the background layer.

use glyphfall_core::{Rgb, Rgba};

/// Build a translucent color from HSL components and an alpha.
///
/// `h` is in degrees, `s`, `l` and `a` are in 0.0-1.0.
pub fn hsla(h: f32, s: f32, l: f32, a: f32) -> Rgba {
    hsl_to_rgb(h, s, l).with_alpha(a.clamp(0.0, 1.0))
}

/// Convert HSL to RGB color.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Rgb {
    if s == 0.0 {
        let v = channel(l);
        return Rgb::new(v, v, v);
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    let h = h.rem_euclid(360.0) / 360.0;

    let r = hue_to_rgb(p, q, h + 1.0 / 3.0);
    let g = hue_to_rgb(p, q, h);
    let b = hue_to_rgb(p, q, h - 1.0 / 3.0);

    Rgb::new(channel(r), channel(g), channel(b))
}

fn channel(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_hues() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), Rgb::new(255, 0, 0));
        assert_eq!(hsl_to_rgb(120.0, 1.0, 0.5), Rgb::new(0, 255, 0));
        assert_eq!(hsl_to_rgb(240.0, 1.0, 0.5), Rgb::new(0, 0, 255));
    }

    #[test]
    fn test_cyan() {
        assert_eq!(hsl_to_rgb(180.0, 1.0, 0.5), Rgb::new(0, 255, 255));
    }

    #[test]
    fn test_greyscale() {
        assert_eq!(hsl_to_rgb(42.0, 0.0, 0.0), Rgb::new(0, 0, 0));
        assert_eq!(hsl_to_rgb(42.0, 0.0, 1.0), Rgb::new(255, 255, 255));
    }

    #[test]
    fn test_hsla_clamps_alpha() {
        assert_eq!(hsla(180.0, 1.0, 0.5, 0.15).a, 0.15);
        assert_eq!(hsla(180.0, 1.0, 0.5, 1.5).a, 1.0);
        assert_eq!(hsla(180.0, 1.0, 0.5, -0.5).a, 0.0);
    }
}
