use image::{Rgb, RgbImage};

use crate::config::{ColorScheme, RenderConfig};
use crate::frame::IterationGrid;

/// Inside the set.
pub const CONVERGED: Rgb<u8> = Rgb([0, 0, 0]);
/// Point was never evaluated.
pub const UNEVALUATED: Rgb<u8> = Rgb([255, 60, 200]);
/// Pixel that no sample reached.
pub const UNFILLED: Rgb<u8> = Rgb([0, 0, 0]);

pub trait Painter {
    /// Color of a computed count, sentinels excluded.
    fn i_value_color(&self, i_value: f64) -> Rgb<u8>;

    fn color(&self, i_value: f64) -> Rgb<u8> {
        if i_value == -1.0 {
            CONVERGED
        } else if i_value == 0.0 {
            UNEVALUATED
        } else {
            self.i_value_color(i_value)
        }
    }

    /// Grid sides must fit in `u32`; loader grids are capped at `MAX_SIZE`.
    fn paint(&self, i_values: &IterationGrid) -> RgbImage {
        let (height, width) = i_values.dim();
        let mut img = RgbImage::new(width as u32, height as u32);
        for ((y, x), i_value) in i_values.indexed_iter() {
            let color = match i_value {
                Some(i_value) => self.color(*i_value),
                None => UNFILLED,
            };
            img.put_pixel(x as u32, y as u32, color);
        }
        img
    }
}

fn channel(v: f64) -> u8 {
    // `as` saturates and maps NaN to 0
    v.clamp(0.0, 255.0) as u8
}

/// Two-segment scale: black to red up to the threshold, then red to white.
///
/// Counts advance the color every 4 iterations, by `threshold / 127` per
/// step (at least 1), so red saturates before the threshold is reached for
/// the usual thresholds.
#[derive(Clone, Debug)]
pub struct ThresholdPainter {
    threshold: f64,
    gain: f64,
}

impl ThresholdPainter {
    pub fn new(threshold: f64) -> Self {
        let gain = (threshold / 127.0).floor().max(1.0);
        Self { threshold, gain }
    }

    fn scale(&self, v: f64) -> u8 {
        channel((v / 4.0).floor() * self.gain)
    }
}

impl Painter for ThresholdPainter {
    fn i_value_color(&self, i_value: f64) -> Rgb<u8> {
        if i_value < self.threshold {
            Rgb([self.scale(i_value), 0, 0])
        } else {
            let v = self.scale(i_value - self.threshold);
            Rgb([255, v, v])
        }
    }
}

fn band_color(n: usize) -> [u8; 3] {
    match n {
        0 => [0xbe, 0x0a, 0xff],
        1 => [0x58, 0x0a, 0xff],
        2 => [0x14, 0x7d, 0xf5],
        3 => [0x0a, 0xef, 0xff],
        4 => [0x0a, 0xff, 0x99],
        5 => [0xa1, 0xff, 0x0a],
        6 => [0xde, 0xff, 0x0a],
        7 => [0xff, 0xd3, 0x00],
        8 => [0xff, 0x87, 0x00],
        _ => [0xff, 0x00, 0x00],
    }
}

/// Log-scale coloring: counts in `[2^n, 2^(n+1))` share band `n`.
#[derive(Clone, Debug, Default)]
pub struct BandPainter;

impl BandPainter {
    pub fn band(i_value: f64) -> usize {
        if i_value >= 1.0 {
            i_value.log2().floor() as usize
        } else {
            0
        }
    }
}

impl Painter for BandPainter {
    fn i_value_color(&self, i_value: f64) -> Rgb<u8> {
        Rgb(band_color(Self::band(i_value)))
    }
}

/// Painter selected by the configured color scheme.
pub fn from_config(config: &RenderConfig) -> Box<dyn Painter> {
    match config.color_scheme {
        ColorScheme::Threshold => Box::new(ThresholdPainter::new(config.threshold())),
        ColorScheme::Bands => Box::new(BandPainter),
    }
}

#[cfg(test)]
mod test {
    use ndarray::Array2;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_sentinels() {
        let painters: Vec<Box<dyn Painter>> = vec![
            Box::new(ThresholdPainter::new(500.0)),
            Box::new(ThresholdPainter::new(3.0)),
            Box::new(BandPainter),
        ];
        for p in painters {
            assert_eq!(p.color(-1.0), CONVERGED);
            assert_eq!(p.color(0.0), UNEVALUATED);
        }
    }

    #[test]
    fn test_threshold_segments() {
        let p = ThresholdPainter::new(500.0);
        assert_eq!(p.color(1.0), Rgb([0, 0, 0]));
        assert_eq!(p.color(40.0), Rgb([30, 0, 0]));
        assert_eq!(p.color(340.0), Rgb([255, 0, 0]));
        assert_eq!(p.color(500.0), Rgb([255, 0, 0]));
        assert_eq!(p.color(540.0), Rgb([255, 30, 30]));
        assert_eq!(p.color(1000.0), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_threshold_clamps_large_counts() {
        let p = ThresholdPainter::new(500.0);
        // 124 steps * 3 would wrap past 255 without clamping
        assert_eq!(p.color(499.0), Rgb([255, 0, 0]));
        assert_eq!(p.color(1e12), Rgb([255, 255, 255]));
        assert_eq!(p.color(f64::INFINITY), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_small_threshold_still_scales() {
        let p = ThresholdPainter::new(50.0);
        assert_eq!(p.color(8.0), Rgb([2, 0, 0]));
    }

    #[test]
    fn test_bands() {
        assert_eq!(BandPainter::band(0.5), 0);
        assert_eq!(BandPainter::band(1.0), 0);
        assert_eq!(BandPainter::band(3.0), 1);
        assert_eq!(BandPainter::band(4.0), 2);
        assert_eq!(BandPainter::band(1000.0), 9);
        let p = BandPainter;
        assert_eq!(p.color(2.0), Rgb([0x58, 0x0a, 0xff]));
        assert_eq!(p.color(1e9), Rgb([0xff, 0x00, 0x00]));
    }

    #[test]
    fn test_paint_unfilled_is_black() {
        let mut grid: IterationGrid = Array2::from_elem((2, 3), None);
        grid[[0, 2]] = Some(0.0);
        let img = ThresholdPainter::new(500.0).paint(&grid);
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(*img.get_pixel(2, 0), UNEVALUATED);
        assert_eq!(*img.get_pixel(0, 0), UNFILLED);
        assert_eq!(*img.get_pixel(1, 1), UNFILLED);
    }

    #[test]
    fn test_from_config() {
        let config = RenderConfig {
            color_scheme: ColorScheme::Bands,
            ..Default::default()
        };
        assert_eq!(from_config(&config).color(2.0), Rgb([0x58, 0x0a, 0xff]));
        let config = RenderConfig::default();
        assert_eq!(from_config(&config).color(1000.0), Rgb([255, 255, 255]));
    }

    proptest! {
        #[test]
        fn prop_never_panics(i in any::<f64>(), threshold in 1.0f64..1e6) {
            ThresholdPainter::new(threshold).color(i);
            BandPainter.color(i);
        }

        #[test]
        fn prop_red_rises_below_threshold(a in 0.0f64..500.0, b in 0.0f64..500.0) {
            let p = ThresholdPainter::new(500.0);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assume!(lo != 0.0);
            prop_assert!(p.color(lo)[0] <= p.color(hi)[0]);
        }

        #[test]
        fn prop_whitening_rises_above_threshold(a in 500.0f64..1e5, b in 500.0f64..1e5) {
            let p = ThresholdPainter::new(500.0);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let (c_lo, c_hi) = (p.color(lo), p.color(hi));
            prop_assert_eq!(c_lo[0], 255);
            prop_assert!(c_lo[1] <= c_hi[1]);
            prop_assert!(c_lo[2] <= c_hi[2]);
        }
    }
}
