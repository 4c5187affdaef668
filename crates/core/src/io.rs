//! Image I/O: template decode and PNG export.

use anyhow::{Context, Result};
use image::{ImageFormat, RgbaImage};
use std::path::Path;

/// Read a month template image and normalize it to RGBA8.
pub fn load_template(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path)
        .with_context(|| format!("Failed to read template image: {}", path.display()))?;
    Ok(img.to_rgba8())
}

/// Encode `raster` as PNG at `path`, overwriting any existing file.
pub fn save_png(raster: &RgbaImage, path: &Path) -> Result<()> {
    raster
        .save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("Failed to write PNG: {}", path.display()))?;
    log::info!(
        "Saved {}x{} canvas to {}",
        raster.width(),
        raster.height(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_save_and_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("card.png");

        let mut raster = RgbaImage::from_pixel(20, 10, Rgba([255, 255, 255, 255]));
        raster.put_pixel(4, 5, Rgba([12, 34, 56, 255]));
        save_png(&raster, &path).unwrap();

        let reloaded = load_template(&path).unwrap();
        assert_eq!(reloaded.dimensions(), (20, 10));
        assert_eq!(*reloaded.get_pixel(4, 5), Rgba([12, 34, 56, 255]));
    }

    #[test]
    fn test_save_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("card.png");

        let first = RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 255]));
        save_png(&first, &path).unwrap();
        let second = RgbaImage::from_pixel(8, 8, Rgba([255, 0, 0, 255]));
        save_png(&second, &path).unwrap();

        let reloaded = load_template(&path).unwrap();
        assert_eq!(*reloaded.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_load_template_missing_file_is_error() {
        let err = load_template(Path::new("/nonexistent/January.png")).unwrap_err();
        assert!(err.to_string().contains("January.png"));
    }
}
