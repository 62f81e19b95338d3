//! Image file loading and decoding.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Open and decode an image file.
pub fn open_image(path: &Path) -> Result<DynamicImage, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_bytes(&bytes)
}

/// Decode in-memory image data (dropped files, clipboard content).
pub fn decode_bytes(bytes: &[u8]) -> Result<DynamicImage, LoadError> {
    Ok(image::load_from_memory(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(matches!(
            decode_bytes(b"definitely not an image"),
            Err(LoadError::Decode(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = open_image(Path::new("/nonexistent/input.png")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/input.png"));
    }
}
