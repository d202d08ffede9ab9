//!
//! Inkjet printbar modelling: nozzle geometry of stitched print heads, nozzle lookup by
//! physical position, and conversion of monochrome bitmaps into ink drops.
//!
//! ```rust,no_run
//! use ijcore::{DEFAULT_CONSTANTS, Printer};
//!
//! let mut printer = Printer::new(DEFAULT_CONSTANTS.clone(), 1, 2).unwrap();
//! printer.load_raw_image(2, 1, vec![0, 255]).unwrap();
//! let drops = printer.rasterize();
//! ```
//!

pub mod hardware;
pub mod preview;
pub mod printer;
pub mod raster;

pub use crate::{
    hardware::{DEFAULT_CONSTANTS, GeometryConstants, error::GeometryError, layout::Nozzle},
    printer::{Printer, head::Head, printbar::{InkColor, Printbar}},
    raster::{Bitmap, InkDrop, error::RasterError},
};
