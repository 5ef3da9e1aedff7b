//! Reconstruction of one frame from a file of `x, y, iterations` samples.
//!
//! Samples carry plane coordinates, not pixel indices. The loader orders them
//! by `(x, y)` and walks that order through the configured raster, so the
//! layout depends only on which keys are present, never on line order.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use image::RgbImage;
use log::{debug, info, warn};
use ndarray::Array2;

use crate::config::{ConfigError, DuplicatePolicy, RasterOrder, RenderConfig, MAX_SIZE};
use crate::coord::{RasterIter, Sample};
use crate::error::{Error, Result};
use crate::painter::{self, Painter};

/// Iteration values indexed `[[row, col]]`; `None` where no sample landed.
pub type IterationGrid = Array2<Option<f64>>;

const FIELD_SEPARATOR: &str = ", ";

fn parse_field(field: &str, name: &str) -> std::result::Result<f64, String> {
    let v: f64 = field
        .trim()
        .parse()
        .map_err(|_| format!("{} is not a number: {:?}", name, field.trim()))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(format!("{} is not finite: {}", name, v))
    }
}

/// Parse one non-blank line.
pub fn parse_line(line: &str) -> std::result::Result<Sample, String> {
    let fields: Vec<&str> = line.trim_end().split(FIELD_SEPARATOR).collect();
    if fields.len() != 3 {
        return Err(format!("expected 3 fields, found {}", fields.len()));
    }
    let x = parse_field(fields[0], "x")?;
    let y = parse_field(fields[1], "y")?;
    let i = parse_field(fields[2], "iterations")?;
    Ok(Sample::new(x, y, i))
}

/// Parsed samples in file order, each with its 1-based line number.
pub fn parse_samples<R: BufRead>(reader: R, path: &Path) -> Result<Vec<(usize, Sample)>> {
    let mut samples = vec![];
    for (n, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| Error::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let sample = parse_line(&line).map_err(|reason| Error::parse(path, n + 1, reason))?;
        samples.push((n + 1, sample));
    }
    Ok(samples)
}

pub struct FrameLoader {
    size: usize,
    raster: RasterOrder,
    duplicates: DuplicatePolicy,
    painter: Box<dyn Painter>,
}

impl FrameLoader {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            size: config.size,
            raster: config.raster_order,
            duplicates: config.duplicates,
            painter: painter::from_config(config),
        }
    }

    /// Sort by key and collapse duplicates per the configured policy.
    fn dedup(&self, mut samples: Vec<(usize, Sample)>, path: &Path) -> Result<Vec<Sample>> {
        // stable: equal keys stay in file order
        samples.sort_by(|(_, a), (_, b)| a.key_cmp(b));

        let mut unique: Vec<Sample> = Vec::with_capacity(samples.len());
        for (line, sample) in samples {
            match unique.last_mut() {
                Some(last) if last.same_key(&sample) => match self.duplicates {
                    DuplicatePolicy::LastWins => {
                        debug!(
                            "{}:{}: ({}, {}) overrides an earlier sample",
                            path.display(),
                            line,
                            sample.x,
                            sample.y
                        );
                        *last = sample;
                    }
                    DuplicatePolicy::Reject => {
                        return Err(Error::DuplicateKey {
                            path: path.to_path_buf(),
                            line,
                            x: sample.x,
                            y: sample.y,
                        });
                    }
                },
                _ => unique.push(sample),
            }
        }
        Ok(unique)
    }

    /// Place parsed samples into a grid.
    pub fn build_grid(&self, samples: Vec<(usize, Sample)>, path: &Path) -> Result<IterationGrid> {
        if self.size > MAX_SIZE {
            return Err(ConfigError::SizeTooLarge(self.size).into());
        }
        let pixels = self.size * self.size;
        let samples = self.dedup(samples, path)?;
        let count = samples.len();
        if count > pixels {
            return Err(Error::TooManySamples {
                path: path.to_path_buf(),
                size: self.size,
                count,
            });
        }

        let mut grid: IterationGrid = Array2::from_elem((self.size, self.size), None);
        for (sample, (col, row)) in samples.iter().zip(RasterIter::new(self.size, self.raster)) {
            grid[[row, col]] = Some(sample.iterations);
        }

        let unfilled = pixels - count;
        if unfilled > 0 {
            warn!("{}: {} pixels have no sample", path.display(), unfilled);
        }
        Ok(grid)
    }

    pub fn load_grid<P: AsRef<Path>>(&self, path: P) -> Result<IterationGrid> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let samples = parse_samples(BufReader::new(file), path)?;
        self.build_grid(samples, path)
    }

    pub fn load_frame<P: AsRef<Path>>(&self, path: P) -> Result<RgbImage> {
        let path = path.as_ref();
        let grid = self.load_grid(path)?;
        info!("loaded {} ({}x{})", path.display(), self.size, self.size);
        Ok(self.painter.paint(&grid))
    }
}
