use std::error::Error as _;
use std::path::PathBuf;
use std::process;

use structopt::StructOpt;

use itergif::config::{ColorScheme, DuplicatePolicy, FrameOrder, RasterOrder, RenderConfig};

#[derive(StructOpt, Debug)]
#[structopt(name = "itergif", about = "Render iteration data files into an animated GIF")]
struct Opt {
    /// JSON render configuration; flags below override it.
    #[structopt(long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Directory holding the frame files.
    #[structopt(short, long, default_value = ".", parse(from_os_str))]
    input_dir: PathBuf,

    /// Output GIF path.
    #[structopt(short, long, default_value = "out.gif", parse(from_os_str))]
    output: PathBuf,

    /// Side length of each frame in pixels.
    #[structopt(long)]
    size: Option<usize>,

    /// Number of frame files to load.
    #[structopt(long)]
    frames: Option<usize>,

    /// Iteration count where coloring switches from red to white.
    #[structopt(long)]
    threshold: Option<f64>,

    #[structopt(long)]
    fps: Option<u32>,

    /// Play frames from the highest index down.
    #[structopt(long)]
    descending: bool,

    /// Fill order: columns or rows.
    #[structopt(long)]
    raster: Option<RasterOrder>,

    /// Color scheme: threshold or bands.
    #[structopt(long)]
    scheme: Option<ColorScheme>,

    /// Fail on repeated (x, y) samples instead of keeping the last one.
    #[structopt(long)]
    reject_duplicates: bool,
}

impl Opt {
    fn render_config(&self) -> itergif::Result<RenderConfig> {
        let mut config = match &self.config {
            Some(path) => RenderConfig::load(path)?,
            None => RenderConfig::default(),
        };
        if let Some(size) = self.size {
            config.size = size;
        }
        if let Some(frames) = self.frames {
            config.num_frames = frames;
        }
        if let Some(threshold) = self.threshold {
            config.threshold = Some(threshold);
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if self.descending {
            config.frame_order = FrameOrder::Descending;
        }
        if let Some(raster) = self.raster {
            config.raster_order = raster;
        }
        if let Some(scheme) = self.scheme {
            config.color_scheme = scheme;
        }
        if self.reject_duplicates {
            config.duplicates = DuplicatePolicy::Reject;
        }
        Ok(config)
    }
}

fn run(opt: &Opt) -> itergif::Result<()> {
    let config = opt.render_config()?;
    let animation = itergif::render(&opt.input_dir, &config)?;
    animation.save(&opt.output)
}

fn main() {
    env_logger::init();
    let opt = Opt::from_args();
    if let Err(e) = run(&opt) {
        eprintln!("error: {}", e);
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {}", cause);
            source = cause.source();
        }
        process::exit(1);
    }
}

#[cfg(test)]
mod test {
    use std::fs;

    use super::*;

    fn opt(args: &[&str]) -> Opt {
        Opt::from_iter(std::iter::once("itergif").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults_without_flags() {
        let config = opt(&[]).render_config().unwrap();
        assert_eq!(config, RenderConfig::default());
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("render.json");
        fs::write(
            &path,
            r#"{"size": 64, "fps": 25, "raster_order": "rows", "color_scheme": "bands"}"#,
        )
        .unwrap();
        let path = path.to_str().unwrap();

        let config = opt(&["--config", path]).render_config().unwrap();
        assert_eq!(config.size, 64);
        assert_eq!(config.raster_order, RasterOrder::Rows);

        let config = opt(&[
            "--config",
            path,
            "--size",
            "8",
            "--raster",
            "columns",
            "--scheme",
            "threshold",
            "--descending",
            "--reject-duplicates",
        ])
        .render_config()
        .unwrap();
        assert_eq!(config.size, 8);
        assert_eq!(config.fps, 25);
        assert_eq!(config.raster_order, RasterOrder::Columns);
        assert_eq!(config.color_scheme, ColorScheme::Threshold);
        assert_eq!(config.frame_order, FrameOrder::Descending);
        assert_eq!(config.duplicates, DuplicatePolicy::Reject);
    }

    #[test]
    fn test_unknown_option_value_is_rejected() {
        let result = Opt::from_iter_safe(["itergif", "--raster", "diagonal"]);
        assert!(result.is_err());
    }
}
