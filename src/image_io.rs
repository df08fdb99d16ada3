//! Reading source photos and writing shattered PNGs

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::{ImageFormat, RgbaImage};
use log::debug;

use crate::error::Result;

/// Decode any supported image file into RGBA
///
/// # Errors
///
/// Returns `ShatterError::Image` if the file is missing or cannot be decoded
pub fn load_rgba<P: AsRef<Path>>(path: P) -> Result<RgbaImage> {
    let image = image::open(path.as_ref())?.to_rgba8();
    debug!(
        "decoded {} ({}x{})",
        path.as_ref().display(),
        image.width(),
        image.height()
    );
    Ok(image)
}

/// Encode `image` as PNG at `path`, replacing any existing file
///
/// # Errors
///
/// * `ShatterError::Io` if the file cannot be created
/// * `ShatterError::Image` if encoding fails
pub fn save_png<P: AsRef<Path>>(image: &RgbaImage, path: P) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    image.write_to(&mut writer, ImageFormat::Png)?;
    debug!("wrote {}", path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShatterError;
    use image::Rgba;
    use std::path::PathBuf;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("shattered_glass_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_png_round_trip() {
        let image = RgbaImage::from_fn(5, 4, |x, y| Rgba([x as u8 * 40, y as u8 * 60, 9, 200]));
        let path = scratch_path("round_trip.png");

        save_png(&image, &path).unwrap();
        let loaded = load_rgba(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded, image);
    }

    #[test]
    fn test_missing_input_is_image_error() {
        let err = load_rgba(scratch_path("does_not_exist.png")).unwrap_err();
        assert!(matches!(err, ShatterError::Image(_)));
    }

    #[test]
    fn test_unwritable_output_is_io_error() {
        let image = RgbaImage::new(2, 2);
        let path = scratch_path("no_such_dir").join("out.png");
        let err = save_png(&image, path).unwrap_err();
        assert!(matches!(err, ShatterError::Io(_)));
    }
}
