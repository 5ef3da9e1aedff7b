use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, DynamicImage, RgbImage};
use log::{debug, info};

use crate::config::{FrameOrder, RenderConfig};
use crate::error::{Error, Result};
use crate::frame::FrameLoader;

/// Numbered frame files in a directory, e.g. `frame00.txt` .. `frame29.txt`.
#[derive(Clone, Debug)]
pub struct FrameSource {
    pub dir: PathBuf,
    pub prefix: String,
    pub digits: usize,
    pub extension: String,
    pub count: usize,
    pub order: FrameOrder,
}

impl FrameSource {
    pub fn new<P: Into<PathBuf>>(dir: P, config: &RenderConfig) -> Self {
        Self {
            dir: dir.into(),
            prefix: config.prefix.clone(),
            digits: config.digits,
            extension: config.extension.clone(),
            count: config.num_frames,
            order: config.frame_order,
        }
    }

    pub fn file_name(&self, index: usize) -> String {
        format!(
            "{}{:0width$}.{}",
            self.prefix,
            index,
            self.extension,
            width = self.digits
        )
    }

    /// Paths in visitation order.
    pub fn paths(&self) -> Vec<PathBuf> {
        let indices: Box<dyn Iterator<Item = usize>> = match self.order {
            FrameOrder::Ascending => Box::new(0..self.count),
            FrameOrder::Descending => Box::new((0..self.count).rev()),
        };
        indices.map(|i| self.dir.join(self.file_name(i))).collect()
    }
}

/// Equal-sized frames in playback order, with their playback rate.
#[derive(Clone, Debug, PartialEq)]
pub struct Animation {
    frames: Vec<RgbImage>,
    pub fps: u32,
}

impl Animation {
    pub fn new(fps: u32) -> Self {
        Self {
            frames: vec![],
            fps,
        }
    }

    /// Append a frame; it must match the size of the first one.
    pub fn push(&mut self, frame: RgbImage) -> Result<()> {
        if let Some(first) = self.frames.first() {
            if first.dimensions() != frame.dimensions() {
                return Err(Error::FrameSize {
                    index: self.frames.len(),
                    expected: first.dimensions(),
                    found: frame.dimensions(),
                });
            }
        }
        self.frames.push(frame);
        Ok(())
    }

    pub fn frames(&self) -> &[RgbImage] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame_delay(&self) -> Delay {
        Delay::from_numer_denom_ms(1000, self.fps)
    }

    /// Encode as a looping GIF.
    pub fn write_gif<W: Write>(&self, writer: W) -> Result<()> {
        if self.is_empty() {
            return Err(Error::EmptyAnimation);
        }
        if self.fps == 0 {
            return Err(crate::config::ConfigError::ZeroFps.into());
        }
        let delay = self.frame_delay();
        let mut encoder = GifEncoder::new(writer);
        encoder.set_repeat(Repeat::Infinite)?;
        let frames = self.frames.iter().map(|frame| {
            let rgba = DynamicImage::ImageRgb8(frame.clone()).into_rgba8();
            image::Frame::from_parts(rgba, 0, 0, delay)
        });
        encoder.encode_frames(frames)?;
        Ok(())
    }

    /// Encode in memory, then write `path`; nothing is created on failure.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut buf = vec![];
        self.write_gif(&mut buf)?;
        fs::write(path, &buf).map_err(|e| Error::io(path, e))?;
        info!(
            "wrote {} ({} frames at {} fps, {} bytes)",
            path.display(),
            self.len(),
            self.fps,
            buf.len()
        );
        Ok(())
    }
}

/// Load every path in order into one animation; the first failure aborts.
pub fn build_sequence<P: AsRef<Path>>(
    paths: &[P],
    fps: u32,
    loader: &FrameLoader,
) -> Result<Animation> {
    let mut animation = Animation::new(fps);
    for path in paths {
        debug!("frame {}: {}", animation.len(), path.as_ref().display());
        animation.push(loader.load_frame(path)?)?;
    }
    Ok(animation)
}
