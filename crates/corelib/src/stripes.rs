//! Vertical stripe pattern drawn once into the render target.
//!
//! The surface's horizontal extent is split into fixed-width bands; the fill
//! flips its color flag before every band, so band 0 takes `first`, band 1
//! `second`, and so on. The last band is clamped to the surface width.

use crate::{Color, CoreError, CoreResult};

pub const DEFAULT_BAND_WIDTH: u32 = 12;
pub const DEFAULT_FIRST: Color = Color::new(1.0, 0.0, 0.0, 1.0);
pub const DEFAULT_SECOND: Color = Color::new(1.0, 0.5, 1.0, 1.0);

/// Pixel rectangle, half-open: `[x0, x1) x [y0, y1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl Rect {
    #[inline]
    pub fn width(&self) -> u32 {
        self.x1 - self.x0
    }
}

/// One filled band of the pattern.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Band {
    pub rect: Rect,
    pub color: Color,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StripePattern {
    band_width: u32,
    first: Color,
    second: Color,
}

impl StripePattern {
    pub fn new(band_width: u32, first: Color, second: Color) -> CoreResult<Self> {
        if band_width == 0 {
            return Err(CoreError::InvalidBandWidth);
        }
        Ok(Self {
            band_width,
            first,
            second,
        })
    }

    /// Number of bands covering `surface_width`: `ceil(W / S)`.
    #[inline]
    pub fn band_count(&self, surface_width: u32) -> u32 {
        surface_width.div_ceil(self.band_width)
    }

    /// Bands covering a `surface_width x surface_height` surface, left to right.
    pub fn bands(&self, surface_width: u32, surface_height: u32) -> impl Iterator<Item = Band> + '_ {
        let mut flip = false;
        (0..self.band_count(surface_width)).map(move |i| {
            flip = !flip;
            let x0 = i * self.band_width;
            let x1 = x0.saturating_add(self.band_width).min(surface_width);
            Band {
                rect: Rect {
                    x0,
                    y0: 0,
                    x1,
                    y1: surface_height,
                },
                color: if flip { self.first } else { self.second },
            }
        })
    }
}

impl Default for StripePattern {
    fn default() -> Self {
        Self {
            band_width: DEFAULT_BAND_WIDTH,
            first: DEFAULT_FIRST,
            second: DEFAULT_SECOND,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_count_is_ceiling() {
        let p = StripePattern::default();
        assert_eq!(p.bands(512, 512).count(), 43);
        assert_eq!(p.bands(12, 1).count(), 1);
        assert_eq!(p.bands(13, 1).count(), 2);
        assert_eq!(p.bands(24, 1).count(), 2);
    }

    #[test]
    fn zero_width_has_no_bands() {
        let p = StripePattern::default();
        assert_eq!(p.bands(0, 512).count(), 0);
    }

    #[test]
    fn zero_band_width_rejected() {
        let err = StripePattern::new(0, DEFAULT_FIRST, DEFAULT_SECOND).unwrap_err();
        assert_eq!(err, CoreError::InvalidBandWidth);
    }

    #[test]
    fn bands_tile_surface_and_clamp_last() {
        let p = StripePattern::default();
        let bands: Vec<_> = p.bands(512, 256).collect();
        let mut next_x = 0;
        for b in &bands {
            assert_eq!(b.rect.x0, next_x);
            assert_eq!(b.rect.y0, 0);
            assert_eq!(b.rect.y1, 256);
            assert!(b.rect.width() > 0);
            next_x = b.rect.x1;
        }
        assert_eq!(next_x, 512);
        // 512 = 42 * 12 + 8
        assert_eq!(bands.last().map(|b| b.rect.width()), Some(8));
    }

    #[test]
    fn colors_alternate_from_first() {
        let red = Color::new(1.0, 0.0, 0.0, 1.0);
        let blue = Color::new(0.0, 0.0, 1.0, 1.0);
        let p = StripePattern::new(5, red, blue).unwrap();
        let colors: Vec<_> = p.bands(23, 4).map(|b| b.color).collect();
        assert_eq!(colors, vec![red, blue, red, blue, red]);
    }

    #[test]
    fn wide_band_covers_narrow_surface() {
        let p = StripePattern::new(100, DEFAULT_FIRST, DEFAULT_SECOND).unwrap();
        let bands: Vec<_> = p.bands(30, 10).collect();
        assert_eq!(bands.len(), 1);
        assert_eq!(bands[0].rect.width(), 30);
        assert_eq!(bands[0].color, DEFAULT_FIRST);
    }
}
