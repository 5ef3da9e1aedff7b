//! Render settings shared by the loader, the painters and the sequence
//! assembler.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Order in which numbered frame files are visited, and so played back.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameOrder {
    #[default]
    Ascending,
    Descending,
}

/// Walk used to place sorted samples into pixels. Both start at the top-left.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RasterOrder {
    /// Fill each column top to bottom, columns left to right.
    #[default]
    Columns,
    /// Fill each row left to right, rows top to bottom.
    Rows,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    /// Black to red below the threshold, red to white above it.
    #[default]
    Threshold,
    /// Power-of-two iteration bands over a fixed palette.
    Bands,
}

/// What to do when a frame file holds the same (x, y) key twice.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// The last occurrence in file order decides the pixel.
    #[default]
    LastWins,
    Reject,
}

/// Largest frame side; GIF stores dimensions as 16-bit values.
pub const MAX_SIZE: usize = u16::MAX as usize;

/// Parse an option value by its serialized (snake_case) name.
fn from_name<T: DeserializeOwned>(s: &str) -> std::result::Result<T, ConfigError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| ConfigError::UnknownValue(e.to_string()))
}

macro_rules! impl_from_name {
    ($($t:ty),*) => {
        $(
            impl FromStr for $t {
                type Err = ConfigError;
                fn from_str(s: &str) -> std::result::Result<Self, ConfigError> {
                    from_name(s)
                }
            }
        )*
    };
}

impl_from_name!(FrameOrder, RasterOrder, ColorScheme, DuplicatePolicy);

/// Top-level render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Side length of every frame, in pixels.
    pub size: usize,
    /// Number of frame files to load.
    pub num_frames: usize,
    /// Iteration cap used when the data was computed.
    pub max_iterations: u32,
    /// Iteration count where the color curve switches segment.
    /// Defaults to half of `max_iterations`.
    pub threshold: Option<f64>,
    /// Playback rate in frames per second.
    pub fps: u32,
    pub frame_order: FrameOrder,
    pub raster_order: RasterOrder,
    pub color_scheme: ColorScheme,
    pub duplicates: DuplicatePolicy,
    /// Frame file name prefix, e.g. `frame` for `frame07.txt`.
    pub prefix: String,
    /// Zero padding width of the frame index.
    pub digits: usize,
    /// Frame file extension, without the dot.
    pub extension: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            size: 1024,
            num_frames: 30,
            max_iterations: 1000,
            threshold: None,
            fps: 10,
            frame_order: FrameOrder::default(),
            raster_order: RasterOrder::default(),
            color_scheme: ColorScheme::default(),
            duplicates: DuplicatePolicy::default(),
            prefix: "frame".to_string(),
            digits: 2,
            extension: "txt".to_string(),
        }
    }
}

impl RenderConfig {
    /// Read a JSON configuration; absent keys keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: Self = serde_json::from_str(&text).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
            .unwrap_or_else(|| f64::from(self.max_iterations / 2))
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.size == 0 {
            return Err(ConfigError::ZeroSize);
        }
        if self.size > MAX_SIZE {
            return Err(ConfigError::SizeTooLarge(self.size));
        }
        if self.num_frames == 0 {
            return Err(ConfigError::ZeroFrames);
        }
        if self.fps == 0 {
            return Err(ConfigError::ZeroFps);
        }
        let threshold = self.threshold();
        if !(threshold.is_finite() && threshold > 0.0) {
            return Err(ConfigError::InvalidThreshold(threshold));
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("image size must be non-zero")]
    ZeroSize,
    #[error("image size {0} exceeds the maximum of {max}", max = MAX_SIZE)]
    SizeTooLarge(usize),
    #[error("frame count must be non-zero")]
    ZeroFrames,
    #[error("fps must be non-zero")]
    ZeroFps,
    #[error("threshold must be positive and finite, got {0}")]
    InvalidThreshold(f64),
    #[error("{0}")]
    UnknownValue(String),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
