//!
//! Image-based preview generation of the heads and their drops
//!

use image::RgbImage;
use rand::Rng;

use crate::hardware::layout::Nozzle;
use crate::printer::Printer;
use crate::raster::InkDrop;
use crate::raster::error::RasterError;

pub mod canvas;

///
/// Rendering parameters of a preview.
///
/// # Fields:
/// - `scale`: The number of canvas pixels per millimetre
/// - `margin`: The blank border around the drawing, and between nozzles and print, in millimetres
/// - `nozzle_radius`: The radius of a nozzle dot, in canvas pixels
/// - `drop_radius`: The radius of a drop dot, in canvas pixels
/// - `coverage`: The share of drops drawn, between 0 and 1, picked at random
///
#[derive(Clone, Debug)]
pub struct PreviewOptions {
    pub scale: f64,
    pub margin: f64,
    pub nozzle_radius: i32,
    pub drop_radius: i32,
    pub coverage: f64,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        PreviewOptions { scale: 10., margin: 1., nozzle_radius: 1, drop_radius: 1, coverage: 1. }
    }
}

///
/// Renders every existing nozzle of the printer, with the print drawn below the heads.
///
/// # Parameters:
/// - `printer`: The printer whose heads are drawn
/// - `drops`: The drops to draw, usually the output of `Printer::rasterize`
/// - `options`: The rendering parameters
///
/// # Returns:
/// - The rendered image
///
pub fn render_preview(printer: &Printer, drops: &[InkDrop], options: &PreviewOptions) -> RgbImage {
    draw_preview(printer, drops, options).buffer
}

fn existing_nozzles(printer: &Printer) -> impl Iterator<Item = &Nozzle> {
    printer.printbars().iter().flat_map(|pb| pb.nozzles()).filter(|n| n.exists_physically)
}

fn draw_preview(printer: &Printer, drops: &[InkDrop], options: &PreviewOptions) -> canvas::PreviewCanvas {
    let mut min = (f64::INFINITY, f64::INFINITY);
    let mut max = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for nozzle in existing_nozzles(printer) {
        min = (min.0.min(nozzle.x), min.1.min(nozzle.y));
        max = (max.0.max(nozzle.x), max.1.max(nozzle.y));
    }
    if !min.1.is_finite() {
        min.1 = 0.;
        max.1 = 0.;
    }

    // the print sits under the nozzles
    let print_top = max.1 + options.margin;
    let mut bottom = max.1;
    for drop in drops {
        min.0 = min.0.min(drop.x());
        max.0 = max.0.max(drop.x());
        bottom = bottom.max(print_top + drop.y());
    }
    if !min.0.is_finite() {
        min.0 = 0.;
        max.0 = 0.;
    }

    let origin = (min.0 - options.margin, min.1 - options.margin);
    let width = ((max.0 - origin.0 + options.margin) * options.scale).ceil() as u32;
    let height = ((bottom - origin.1 + options.margin) * options.scale).ceil() as u32;

    let mut preview_canvas = canvas::PreviewCanvas::new(width, height, options.scale, origin);

    for nozzle in existing_nozzles(printer) {
        preview_canvas.nozzle(nozzle, options.nozzle_radius);
    }

    let mut rng = rand::rng();
    for drop in drops {
        if options.coverage < 1. && rng.random::<f64>() > options.coverage {
            continue;
        }
        preview_canvas.drop(drop, options.drop_radius, print_top);
    }

    preview_canvas
}

///
/// Renders a preview and saves it as a PNG file.
///
/// # Parameters:
/// - `path`: The path to save the preview image to - *no checks are done to confirm the directory exists*
///
/// # Returns:
/// - Void if the preview was saved
/// - `RasterError::Save` if the file could not be written
///
pub fn generate_preview(printer: &Printer, drops: &[InkDrop], options: &PreviewOptions, path: &str) -> Result<(), RasterError> {
    draw_preview(printer, drops, options).save(path)
}
