//! Thumbnail generation for the asset browser
//!
//! Thumbnails are a best-effort side effect of loading: a failure here is
//! logged and never fails the load itself.

use std::path::{Path, PathBuf};
use image::{ImageFormat, Rgb, RgbImage};

use super::validate::BMP_HEADER_SIZE;

/// Thumbnail edge length in pixels
pub const THUMBNAIL_SIZE: u32 = 64;

/// Placeholder colour for model thumbnails
const MODEL_SWATCH: Rgb<u8> = Rgb([100, 100, 150]);

/// `<dir>/<name>.bmp`, where `name` is the last path component of
/// `display_name`. The result always stays inside `dir`.
pub fn thumbnail_path(dir: &Path, display_name: &str) -> PathBuf {
    let name = Path::new(display_name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "asset".to_string());
    dir.join(format!("{}.bmp", name))
}

/// Nearest-neighbour downsample of a BMP's pixel block.
///
/// Assumes the pixels directly follow the 54-byte header as tightly packed,
/// bottom-up BGR triples (no row padding). Samples past the end of the
/// buffer are left black.
pub fn texture_thumbnail(data: &[u8], width: u32, height: u32) -> RgbImage {
    let pixels = data.get(BMP_HEADER_SIZE..).unwrap_or(&[]);
    let size = THUMBNAIL_SIZE as usize;
    let (width, height) = (width as usize, height as usize);

    RgbImage::from_fn(THUMBNAIL_SIZE, THUMBNAIL_SIZE, |x, y| {
        // Source rows are stored bottom-up
        let row_from_bottom = size - 1 - y as usize;
        let src_x = (x as usize * width) / size;
        let src_y = (row_from_bottom * height) / size;
        let index = (src_y * width + src_x) * 3;
        match pixels.get(index..index + 3) {
            Some(bgr) => Rgb([bgr[2], bgr[1], bgr[0]]),
            None => Rgb([0, 0, 0]),
        }
    })
}

/// Flat swatch standing in for a rendered model preview
pub fn model_thumbnail() -> RgbImage {
    RgbImage::from_pixel(THUMBNAIL_SIZE, THUMBNAIL_SIZE, MODEL_SWATCH)
}

/// Write a thumbnail as BMP, creating the parent directory
pub fn write_thumbnail(path: &Path, image: &RgbImage) -> Result<(), image::ImageError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(image::ImageError::IoError)?;
    }
    image.save_with_format(path, ImageFormat::Bmp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::validate::tests::bmp_bytes;
    use tempfile::TempDir;

    #[test]
    fn test_texture_thumbnail_samples_bottom_up_bgr() {
        // 2x2 image, bottom row red, top row blue (stored bottom-up, BGR)
        let pixels = [
            0, 0, 255, 0, 0, 255, // bottom row: red
            255, 0, 0, 255, 0, 0, // top row: blue
        ];
        let data = bmp_bytes(2, 2, &pixels);
        let thumb = texture_thumbnail(&data, 2, 2);

        assert_eq!(thumb.dimensions(), (THUMBNAIL_SIZE, THUMBNAIL_SIZE));
        assert_eq!(*thumb.get_pixel(0, 0), Rgb([0, 0, 255]));
        assert_eq!(*thumb.get_pixel(63, 63), Rgb([255, 0, 0]));
    }

    #[test]
    fn test_truncated_pixels_stay_black() {
        let data = bmp_bytes(16, 16, &[200; 3]);
        let thumb = texture_thumbnail(&data, 16, 16);
        assert_eq!(*thumb.get_pixel(0, 63), Rgb([200, 200, 200]));
        assert_eq!(*thumb.get_pixel(32, 32), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_thumbnail_path_stays_in_dir() {
        let dir = Path::new("thumbs");
        assert_eq!(thumbnail_path(dir, "Crate"), dir.join("Crate.bmp"));
        assert_eq!(thumbnail_path(dir, "/tmp/props/crate.obj"), dir.join("crate.obj.bmp"));
        assert_eq!(thumbnail_path(dir, "../../etc/owned"), dir.join("owned.bmp"));
        assert_eq!(thumbnail_path(dir, ".."), dir.join("asset.bmp"));
        assert_eq!(thumbnail_path(dir, ""), dir.join("asset.bmp"));
    }

    #[test]
    fn test_write_creates_directory() {
        let dir = TempDir::new().unwrap();
        let path = thumbnail_path(&dir.path().join("thumbs"), "Crate");
        write_thumbnail(&path, &model_thumbnail()).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[0..2], b"BM");
    }
}
