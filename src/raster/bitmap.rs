use std::path::Path;

use image::{GrayImage, ImageReader};
use log::debug;

use crate::raster::error::RasterError;

/// The sample value of a pixel which fires a drop.
pub const FIRE: u8 = 0;
/// The sample value of a pixel which leaves the paper blank.
pub const NO_FIRE: u8 = 255;

///
/// A decoded monochrome image, row-major. A sample of 0 fires, anything else does not.
///
/// # Fields:
/// - `width`: The number of pixels per row
/// - `height`: The number of rows
/// - `pixels`: The samples, `width * height` of them
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Bitmap {
    ///
    /// Creates a new bitmap. If a `Bitmap` is returned, the buffer matches the dimensions.
    ///
    /// # Parameters:
    /// - `width`: The number of pixels per row
    /// - `height`: The number of rows
    /// - `pixels`: The samples, row after row
    ///
    /// # Returns:
    /// - A valid `Bitmap`
    /// - An error explaining why the buffer was rejected
    ///
    pub fn new(width: usize, height: usize, pixels: Vec<u8>) -> Result<Bitmap, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::EmptyImage);
        }

        if width.checked_mul(height) != Some(pixels.len()) {
            return Err(RasterError::MalformedImage { width, height, len: pixels.len() });
        }

        Ok(Bitmap { width, height, pixels })
    }

    ///
    /// Thresholds a grayscale image: dark pixels (luma below 128) fire.
    ///
    pub fn from_gray_image(image: &GrayImage) -> Result<Bitmap, RasterError> {
        let pixels = image.pixels().map(|p| if p.0[0] < 128 { FIRE } else { NO_FIRE }).collect();
        Self::new(image.width() as usize, image.height() as usize, pixels)
    }

    ///
    /// Opens and decodes an image file (PNG or TIFF), then thresholds it.
    ///
    /// # Parameters:
    /// - `path`: The path of the image file
    ///
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Bitmap, RasterError> {
        let image = ImageReader::open(path.as_ref())
            .map_err(|err| RasterError::Decode(image::ImageError::IoError(err)))?
            .decode()
            .map_err(RasterError::Decode)?
            .into_luma8();

        debug!("File decoded {};{}", image.width(), image.height());

        Self::from_gray_image(&image)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    ///
    /// # Returns:
    /// - Whether the pixel at (x, y) fires, or `None` outside of the image
    ///
    pub fn fires(&self, x: usize, y: usize) -> Option<bool> {
        if x >= self.width || y >= self.height {
            return None;
        }

        Some(self.pixels[y * self.width + x] == FIRE)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn dimensions_must_match_buffer() {
        assert!(Bitmap::new(2, 2, vec![0, 255, 255, 0]).is_ok());
        assert!(matches!(Bitmap::new(2, 2, vec![0, 255, 255]), Err(RasterError::MalformedImage { width: 2, height: 2, len: 3 })));
        assert!(matches!(Bitmap::new(0, 2, vec![]), Err(RasterError::EmptyImage)));
    }

    #[test]
    fn fires_is_row_major() {
        let bitmap = Bitmap::new(3, 2, vec![255, 0, 255, 0, 255, 255]).unwrap();
        assert_eq!(bitmap.fires(1, 0), Some(true));
        assert_eq!(bitmap.fires(0, 1), Some(true));
        assert_eq!(bitmap.fires(2, 1), Some(false));
        assert_eq!(bitmap.fires(3, 0), None);
    }

    #[test]
    fn gray_image_threshold() {
        let mut image = GrayImage::from_pixel(2, 1, Luma([255]));
        image.put_pixel(1, 0, Luma([20]));

        let bitmap = Bitmap::from_gray_image(&image).unwrap();
        assert_eq!(bitmap.pixels(), &[NO_FIRE, FIRE]);
    }

    #[test]
    fn open_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("swatch.png");
        let mut image = GrayImage::from_pixel(4, 2, Luma([255]));
        image.put_pixel(3, 1, Luma([0]));
        image.save(&path).unwrap();

        let bitmap = Bitmap::open(&path).unwrap();
        assert_eq!((bitmap.width(), bitmap.height()), (4, 2));
        assert_eq!(bitmap.fires(3, 1), Some(true));
        assert_eq!(bitmap.pixels().iter().filter(|p| **p == FIRE).count(), 1);
    }

    #[test]
    fn open_missing_file() {
        assert!(matches!(Bitmap::open("/nonexistent/print.tiff"), Err(RasterError::Decode(_))));
    }
}
