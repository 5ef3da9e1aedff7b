use std::path::Path;

use log::info;

use crate::config::RenderConfig;
use crate::frame::FrameLoader;
use crate::sequence::{build_sequence, Animation, FrameSource};

pub mod config;
pub mod coord;
pub mod error;
pub mod frame;
pub mod painter;
pub mod sequence;

pub use error::{Error, Result};

/// Load the configured frame files from `dir` into an animation.
pub fn render<P: AsRef<Path>>(dir: P, config: &RenderConfig) -> Result<Animation> {
    config.validate()?;
    let source = FrameSource::new(dir.as_ref(), config);
    let loader = FrameLoader::new(config);
    info!(
        "rendering {} frames of {}x{} from {}",
        source.count,
        config.size,
        config.size,
        source.dir.display()
    );
    build_sequence(&source.paths(), config.fps, &loader)
}
