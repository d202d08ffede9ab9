use image::Rgb;
use image::RgbImage;
use imageproc::drawing::draw_filled_circle_mut;

use crate::hardware::layout::Nozzle;
use crate::printer::printbar::InkColor;
use crate::raster::InkDrop;
use crate::raster::error::RasterError;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

///
/// A canvas image with appropriate handling methods, to generate previews of prints.
///
/// # Fields:
/// - `width`: The width of the canvas, in pixels
/// - `height`: The height of the canvas, in pixels
/// - `scale`: The number of canvas pixels per millimetre
/// - `origin`: The physical position drawn at the top left pixel, in millimetres
///
pub struct PreviewCanvas {
    pub width: u32,
    pub height: u32,
    pub scale: f64,
    pub origin: (f64, f64),

    pub buffer: RgbImage,
}

impl PreviewCanvas {
    ///
    /// Creates a new instance of the image canvas, with a white image buffer.
    ///
    /// # Parameters:
    /// - `width`: The width of the canvas in pixels
    /// - `height`: The height of the canvas in pixels
    /// - `scale`: The number of canvas pixels per millimetre
    /// - `origin`: The physical position of the top left pixel
    ///
    /// # Returns:
    /// - A new `PreviewCanvas` instance
    ///
    pub fn new(width: u32, height: u32, scale: f64, origin: (f64, f64)) -> PreviewCanvas {
        let buffer = RgbImage::from_pixel(width.max(1), height.max(1), BACKGROUND);

        PreviewCanvas { width: buffer.width(), height: buffer.height(), scale, origin, buffer }
    }

    ///
    /// Saves the preview to a PNG file on the disk.
    ///
    /// # Parameters:
    /// - `path`: The path to save the image file to
    ///
    pub fn save(&self, path: &str) -> Result<(), RasterError> {
        self.buffer.save_with_format(path, image::ImageFormat::Png).map_err(RasterError::Save)
    }

    ///
    /// Draws an existing nozzle as a dot colored by its display hue. Masked nozzles are
    /// skipped.
    ///
    pub fn nozzle(&mut self, nozzle: &Nozzle, radius: i32) {
        if !nozzle.exists_physically {
            return;
        }

        let center = self.to_canvas(nozzle.x, nozzle.y);
        draw_filled_circle_mut(&mut self.buffer, center, radius, hue_to_rgb(nozzle.display_tag));
    }

    ///
    /// Draws a drop in the ink of its printbar, moved down by `y_offset` millimetres.
    ///
    pub fn drop(&mut self, drop: &InkDrop, radius: i32, y_offset: f64) {
        let center = self.to_canvas(drop.x(), drop.y() + y_offset);
        let color = Rgb(InkColor::from_index(drop.nozzle.printbar_index).rgb());
        draw_filled_circle_mut(&mut self.buffer, center, radius, color);
    }

    fn to_canvas(&self, x: f64, y: f64) -> (i32, i32) {
        scale_floor_coordinates(x - self.origin.0, y - self.origin.1, self.scale)
    }
}

///
/// Scales and floors an (f64, f64) pair of coordinates. This is to make the values ready to reference
/// pixels on the canvas.
///
/// # Parameters:
/// - `x`: The unscaled x value
/// - `y`: The unscaled y value
/// - `scale`: The scalar value of the coordinates
///
fn scale_floor_coordinates(x: f64, y: f64, scale: f64) -> (i32, i32) {
    ((x * scale).floor() as i32, (y * scale).floor() as i32)
}

///
/// Converts a hue in degrees to a fully saturated color.
///
fn hue_to_rgb(hue: f64) -> Rgb<u8> {
    let sector = hue.rem_euclid(360.) / 60.;
    let rising = ((1. - (sector % 2. - 1.).abs()) * 255.).round() as u8;

    match sector as u8 {
        0 => Rgb([255, rising, 0]),
        1 => Rgb([rising, 255, 0]),
        2 => Rgb([0, 255, rising]),
        3 => Rgb([0, rising, 255]),
        4 => Rgb([rising, 0, 255]),
        _ => Rgb([255, 0, rising]),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::layout::generate_layout;
    use crate::hardware::DEFAULT_CONSTANTS;

    #[test]
    fn masked_nozzles_are_not_drawn() {
        let nozzles = generate_layout(&DEFAULT_CONSTANTS, 0, 0, 0.);
        let mut canvas = PreviewCanvas::new(20, 20, 1., (nozzles[1].x - 10., nozzles[1].y - 10.));

        canvas.nozzle(&nozzles[1], 2);
        assert_eq!(*canvas.buffer.get_pixel(10, 10), BACKGROUND);
    }

    #[test]
    fn drops_take_the_printbar_ink() {
        let mut nozzle = generate_layout(&DEFAULT_CONSTANTS, 0, 0, 0.).swap_remove(500);
        nozzle.x = 2.;
        nozzle.y = 1.;
        let drop = InkDrop { nozzle, column: 500, row: 0 };

        let mut canvas = PreviewCanvas::new(40, 40, 10., (0., 0.));
        canvas.drop(&drop, 1, 0.5);
        assert_eq!(*canvas.buffer.get_pixel(20, 15), Rgb([0, 255, 255]));

        let mut nozzle = drop.nozzle.clone();
        nozzle.printbar_index = 3;
        canvas.drop(&InkDrop { nozzle, column: 500, row: 0 }, 1, 0.5);
        assert_eq!(*canvas.buffer.get_pixel(20, 15), Rgb([0, 0, 0]));
    }

    #[test]
    fn nozzles_are_colored_by_hue() {
        let nozzles = generate_layout(&DEFAULT_CONSTANTS, 0, 0, 0.);
        // pixel index 32 starts a column
        let nozzle = &nozzles[160];
        assert_eq!(nozzle.display_tag, 0.);

        let mut canvas = PreviewCanvas::new(20, 20, 1., (nozzle.x - 10., nozzle.y - 10.));
        canvas.nozzle(nozzle, 2);
        assert_eq!(*canvas.buffer.get_pixel(10, 10), Rgb([255, 0, 0]));
    }

    #[test]
    fn hue_wheel() {
        assert_eq!(hue_to_rgb(0.), Rgb([255, 0, 0]));
        assert_eq!(hue_to_rgb(120.), Rgb([0, 255, 0]));
        assert_eq!(hue_to_rgb(180.), Rgb([0, 255, 255]));
        assert_eq!(hue_to_rgb(240.), Rgb([0, 0, 255]));
        assert_eq!(hue_to_rgb(360.), Rgb([255, 0, 0]));
    }
}
