//!
//! The printer: printbars, heads, nozzle queries and the loaded print
//!

use std::sync::Arc;

use log::{info, warn};
use nalgebra::Point2;

use crate::hardware::GeometryConstants;
use crate::hardware::error::GeometryError;
use crate::hardware::layout::Nozzle;
use crate::raster::error::RasterError;
use crate::raster::{Bitmap, InkDrop, rasterize};

pub mod head;
pub mod printbar;

use head::Head;
use printbar::Printbar;

/// The search radius used for pointer hit-testing, in millimetres.
pub const DEFAULT_QUERY_RADIUS: f64 = 1.;

///
/// A set of printbars and the image currently loaded for printing. Drops are never stored,
/// callers rasterize again after changing the image or any head.
///
/// # Fields:
/// - `constants`: The geometry shared by every head
/// - `printbars`: The printbars, in printer order
/// - `image`: The loaded image, if any
///
#[derive(Clone, Debug)]
pub struct Printer {
    constants: Arc<GeometryConstants>,
    printbars: Vec<Printbar>,
    image: Option<Bitmap>,
}

impl Printer {
    ///
    /// Creates a printer with every head at its nominal position.
    ///
    /// # Parameters:
    /// - `constants`: The shared head geometry
    /// - `number_of_printbars`: The number of printbars, one per ink
    /// - `heads_per_printbar`: The number of heads on each printbar
    ///
    /// # Returns:
    /// - A new `Printer` without an image
    /// - A `GeometryError` if the constants cannot produce a layout
    ///
    pub fn new(constants: Arc<GeometryConstants>, number_of_printbars: usize, heads_per_printbar: usize) -> Result<Printer, GeometryError> {
        constants.validate()?;

        let printbars = (0..number_of_printbars)
            .map(|pb| Printbar::new(constants.clone(), pb, heads_per_printbar))
            .collect();

        Ok(Printer { constants, printbars, image: None })
    }

    pub fn constants(&self) -> &GeometryConstants {
        &self.constants
    }

    pub fn printbars(&self) -> &[Printbar] {
        &self.printbars
    }

    pub fn printbars_mut(&mut self) -> &mut [Printbar] {
        &mut self.printbars
    }

    ///
    /// Finds the closest nozzle around a point. Printbars are asked in order and the first
    /// one with a match wins, even if a later printbar has a closer nozzle.
    ///
    /// # Parameters:
    /// - `point`: The query point, in millimetres
    /// - `radius`: The search radius, in millimetres
    /// - `include_non_existent`: Whether masked nozzles may be returned
    ///
    /// # Returns:
    /// - The matching nozzle, or `None` if no printbar has one within `radius`
    ///
    pub fn nearest_nozzle(&self, point: &Point2<f64>, radius: f64, include_non_existent: bool) -> Option<&Nozzle> {
        self.printbars.iter().find_map(|pb| pb.nearest_nozzle(point, radius, include_non_existent))
    }

    ///
    /// # Returns:
    /// - The head owning the nozzle found by `nearest_nozzle`, or `None`
    ///
    pub fn head_at(&self, point: &Point2<f64>, radius: f64, include_non_existent: bool) -> Option<&Head> {
        let (printbar, head) = self.locate_head(point, radius, include_non_existent)?;
        self.printbars.get(printbar)?.head(head)
    }

    ///
    /// Same as `head_at`, for adjusting the stitch or rotation of the head under a pointer.
    ///
    pub fn head_at_mut(&mut self, point: &Point2<f64>, radius: f64, include_non_existent: bool) -> Option<&mut Head> {
        let (printbar, head) = self.locate_head(point, radius, include_non_existent)?;
        self.printbars.get_mut(printbar)?.head_mut(head)
    }

    fn locate_head(&self, point: &Point2<f64>, radius: f64, include_non_existent: bool) -> Option<(usize, usize)> {
        self.nearest_nozzle(point, radius, include_non_existent).map(|n| (n.printbar_index, n.head_index))
    }

    ///
    /// Applies the same firing pattern to every head of the first printbar.
    ///
    /// # Parameters:
    /// - `pattern`: The firing state, indexed by address
    ///
    pub fn set_firing_pattern(&mut self, pattern: &[bool]) {
        if let Some(printbar) = self.printbars.first_mut() {
            for head in printbar.heads_mut() {
                head.set_firing_pattern(pattern);
            }
        }
    }

    ///
    /// Sets every head of the first printbar to fire its stitch alignment marks.
    ///
    pub fn fire_stitch_check(&mut self) {
        if let Some(printbar) = self.printbars.first_mut() {
            for head in printbar.heads_mut() {
                head.fire_stitch_check();
            }
        }
    }

    ///
    /// Replaces the loaded image.
    ///
    pub fn load_image(&mut self, image: Bitmap) {
        info!("Image loaded {};{}", image.width(), image.height());
        self.image = Some(image);
    }

    ///
    /// Loads an image from decoded samples. A rejected buffer leaves the previous image in
    /// place.
    ///
    /// # Parameters:
    /// - `width`: The number of pixels per row
    /// - `height`: The number of rows
    /// - `pixels`: The samples, row after row, 0 fires
    ///
    /// # Returns:
    /// - Void if the image was loaded
    /// - A `RasterError` explaining why the buffer was rejected
    ///
    pub fn load_raw_image(&mut self, width: usize, height: usize, pixels: Vec<u8>) -> Result<(), RasterError> {
        match Bitmap::new(width, height, pixels) {
            Ok(image) => {
                self.load_image(image);
                Ok(())
            }
            Err(err) => {
                warn!("Image rejected: {}", err);
                Err(err)
            }
        }
    }

    pub fn clear_image(&mut self) {
        self.image = None;
    }

    pub fn image(&self) -> Option<&Bitmap> {
        self.image.as_ref()
    }

    ///
    /// Rasterizes the loaded image.
    ///
    /// # Returns:
    /// - The drops in scan order, empty when no image is loaded
    ///
    pub fn rasterize(&self) -> Vec<InkDrop> {
        match &self.image {
            Some(image) => self.rasterize_image(image),
            None => Vec::new(),
        }
    }

    ///
    /// Rasterizes an image against the geometry of the first printbar.
    ///
    pub fn rasterize_image(&self, image: &Bitmap) -> Vec<InkDrop> {
        match self.printbars.first() {
            Some(printbar) => rasterize(printbar, image, self.constants.pixel_size()),
            None => Vec::new(),
        }
    }
}
