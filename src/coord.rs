use std::cmp::Ordering;

use crate::config::RasterOrder;

/// One parsed line of a frame file.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
    pub iterations: f64,
}

impl Sample {
    pub fn new(x: f64, y: f64, iterations: f64) -> Self {
        // fold -0.0 into 0.0 so both spellings are one key
        Self {
            x: x + 0.0,
            y: y + 0.0,
            iterations,
        }
    }

    /// Ascending x, then ascending y.
    pub fn key_cmp(&self, other: &Self) -> Ordering {
        self.x
            .total_cmp(&other.x)
            .then_with(|| self.y.total_cmp(&other.y))
    }

    pub fn same_key(&self, other: &Self) -> bool {
        self.key_cmp(other) == Ordering::Equal
    }
}

/// Pixel positions `(col, row)` of a square image in raster order,
/// starting at the top-left corner.
pub struct RasterIter {
    size: usize,
    order: RasterOrder,
    major: usize,
    minor: usize,
}

impl RasterIter {
    pub fn new(size: usize, order: RasterOrder) -> Self {
        Self {
            size,
            order,
            major: 0,
            minor: 0,
        }
    }

    fn incr(&mut self) -> (usize, usize) {
        let current = (self.major, self.minor);
        if self.major < self.size {
            if self.minor + 1 < self.size {
                self.minor += 1;
            } else {
                self.major += 1;
                self.minor = 0;
            }
        }
        current
    }
}

impl Iterator for RasterIter {
    type Item = (usize, usize);
    fn next(&mut self) -> Option<(usize, usize)> {
        let (major, minor) = self.incr();
        if major < self.size {
            Some(match self.order {
                RasterOrder::Columns => (major, minor),
                RasterOrder::Rows => (minor, major),
            })
        } else {
            None
        }
    }
}
