//!
//! Conversion of a monochrome bitmap into ink drops
//!

use log::debug;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::hardware::layout::Nozzle;
use crate::printer::printbar::Printbar;

pub mod bitmap;
pub mod error;

pub use bitmap::Bitmap;

///
/// One realised ink placement: a copy of the firing nozzle taken at rasterisation time,
/// with `y` replaced by the position of the image row.
///
/// # Fields:
/// - `nozzle`: The snapshot of the nozzle, never aliased to the head
/// - `column`: The image column the drop comes from
/// - `row`: The image row the drop comes from
///
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct InkDrop {
    pub nozzle: Nozzle,
    pub column: usize,
    pub row: usize,
}

impl InkDrop {
    pub fn x(&self) -> f64 {
        self.nozzle.x
    }

    pub fn y(&self) -> f64 {
        self.nozzle.y
    }

    pub fn position(&self) -> Point2<f64> {
        self.nozzle.position()
    }
}

///
/// Checks whether an image is a single-head test pattern: its width evenly divides the
/// nozzle count, so every head reprints the same columns.
///
pub fn is_test_pattern(nozzle_count: usize, width: usize) -> bool {
    nozzle_count % width == 0
}

///
/// Walks the bitmap in row-major order and emits a drop for every firing pixel that lands
/// on an existing nozzle. A test pattern is repeated on every head, each head reading its
/// own block of `width` nozzles; any other image addresses the nozzles of the printbar
/// directly, one column per nozzle. Nozzles past the end of the printbar produce nothing.
///
/// The output order is the scan order (rows, then columns, then heads), so the drops of
/// one image row are contiguous. Nothing is mutated.
///
/// # Parameters:
/// - `printbar`: The printbar whose geometry places the drops
/// - `bitmap`: The image to print
/// - `pixel_size`: The size of one image row, in millimetres
///
/// # Returns:
/// - The drops, in scan order
///
pub fn rasterize(printbar: &Printbar, bitmap: &Bitmap, pixel_size: f64) -> Vec<InkDrop> {
    let nozzles: Vec<&Nozzle> = printbar.nozzles().collect();
    let width = bitmap.width();
    let test_pattern = is_test_pattern(nozzles.len(), width);
    let passes = if test_pattern { printbar.heads().len() } else { 1 };

    let mut drops = Vec::new();
    let mut discarded = 0;

    for (i, sample) in bitmap.pixels().iter().enumerate() {
        if *sample != bitmap::FIRE {
            continue;
        }

        let x = i % width;
        let y = (i - x) / width;

        for head in 0..passes {
            let index = if test_pattern { x + head * width } else { x };

            let Some(nozzle) = nozzles.get(index) else {
                discarded += 1;
                continue;
            };

            // firing into a masked nozzle prints nothing
            if !nozzle.exists_physically {
                discarded += 1;
                continue;
            }

            let mut snapshot = (*nozzle).clone();
            snapshot.y = y as f64 * pixel_size;
            drops.push(InkDrop { nozzle: snapshot, column: x, row: y });
        }
    }

    debug!(
        "Rasterized {}x{} image ({}): {} drops, {} discarded",
        width, bitmap.height(), if test_pattern { "test pattern" } else { "stitched line" }, drops.len(), discarded
    );

    drops
}
