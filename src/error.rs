use std::path::PathBuf;

use crate::config::ConfigError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: {reason}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("{}:{line}: duplicate sample at ({x}, {y})", path.display())]
    DuplicateKey {
        path: PathBuf,
        line: usize,
        x: f64,
        y: f64,
    },

    #[error("{}: {count} samples do not fit a {size}x{size} image", path.display())]
    TooManySamples {
        path: PathBuf,
        size: usize,
        count: usize,
    },

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("encoding error: {0}")]
    Encode(#[from] image::ImageError),

    #[error("animation has no frames")]
    EmptyAnimation,

    #[error("frame {index} is {}x{}, animation frames are {}x{}", found.0, found.1, expected.0, expected.1)]
    FrameSize {
        index: usize,
        expected: (u32, u32),
        found: (u32, u32),
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, line: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_error_names_file_and_line() {
        let err = Error::parse("frame03.txt", 7, "expected 3 fields, found 2");
        assert_eq!(
            err.to_string(),
            "frame03.txt:7: expected 3 fields, found 2"
        );
    }

    #[test]
    fn io_error_keeps_source() {
        let base = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = Error::io("frame00.txt", base);
        assert!(err.to_string().contains("frame00.txt"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn config_errors_are_prefixed() {
        let err: Error = ConfigError::ZeroSize.into();
        assert!(err.to_string().starts_with("configuration error:"));
    }
}
