//!
//! Physical print head representations and handling
//!

use std::path::Path;
use std::sync::Arc;

use log::debug;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::hardware::error::GeometryError;

pub mod error;
pub mod layout;
pub mod mask;
pub mod math;

/// Total skew measured across the reference head, in millimetres.
const REFERENCE_HEAD_SKEW: f64 = 1.3123;

///
/// The geometry shared by the whole process, built from the reference hardware defaults.
///
pub static DEFAULT_CONSTANTS: Lazy<Arc<GeometryConstants>> = Lazy::new(|| Arc::new(GeometryConstants::default()));

///
/// A container for the physical and layout constants of the print heads.
/// Lengths are measured in millimetres, positions along a head in nozzle addresses.
/// All features have an associated getter function, the record is immutable once built.
///
/// # Fields:
/// - `resolution`: The native resolution of a head, in dots per inch
/// - `nozzles_per_head`: The number of nozzles outside of the stitch overlap
/// - `stitch_zones`: Ascending address boundaries of the 300, 600 and 900 dpi stitch zones
/// - `nozzles_per_column`: The number of nozzles sharing one column of the nozzle plate
/// - `column_group_order`: The physical interleave of the nozzle groups
/// - `nozzle_plate_zone_gap`: The vertical gap between the two rows of groups
/// - `nozzle_row_pitch`: The vertical distance between two nozzle rows, in pixels
/// - `skew_rate_per_nozzle`: The vertical skew accumulated per address
///
#[derive(getset::Getters, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[get = "pub"]
#[serde(try_from = "RawGeometryConstants")]
pub struct GeometryConstants {
    resolution: f64,
    nozzles_per_head: usize,
    stitch_zones: [usize; 3],
    nozzles_per_column: usize,
    column_group_order: Vec<usize>,
    nozzle_plate_zone_gap: f64,
    nozzle_row_pitch: f64,
    skew_rate_per_nozzle: f64,
}

impl Default for GeometryConstants {
    fn default() -> Self {
        let nozzles_per_head = 2048;
        let stitch_zones = [32, 96, 128];

        GeometryConstants {
            resolution: 1200.,
            nozzles_per_head,
            stitch_zones,
            nozzles_per_column: 32,
            column_group_order: vec![0, 2, 1, 3],
            nozzle_plate_zone_gap: 5.,
            nozzle_row_pitch: 60.,
            skew_rate_per_nozzle: REFERENCE_HEAD_SKEW / (nozzles_per_head + 2 * stitch_zones[2]) as f64,
        }
    }
}

///
/// The unchecked form of `GeometryConstants` read from configuration files. Missing fields
/// take the reference defaults.
///
#[derive(Deserialize)]
#[serde(default)]
struct RawGeometryConstants {
    resolution: f64,
    nozzles_per_head: usize,
    stitch_zones: [usize; 3],
    nozzles_per_column: usize,
    column_group_order: Vec<usize>,
    nozzle_plate_zone_gap: f64,
    nozzle_row_pitch: f64,
    skew_rate_per_nozzle: f64,
}

impl Default for RawGeometryConstants {
    fn default() -> Self {
        let k = GeometryConstants::default();

        RawGeometryConstants {
            resolution: k.resolution,
            nozzles_per_head: k.nozzles_per_head,
            stitch_zones: k.stitch_zones,
            nozzles_per_column: k.nozzles_per_column,
            column_group_order: k.column_group_order,
            nozzle_plate_zone_gap: k.nozzle_plate_zone_gap,
            nozzle_row_pitch: k.nozzle_row_pitch,
            skew_rate_per_nozzle: k.skew_rate_per_nozzle,
        }
    }
}

impl TryFrom<RawGeometryConstants> for GeometryConstants {
    type Error = GeometryError;

    fn try_from(raw: RawGeometryConstants) -> Result<Self, Self::Error> {
        GeometryConstants::new(
            raw.resolution,
            raw.nozzles_per_head,
            raw.stitch_zones,
            raw.nozzles_per_column,
            raw.column_group_order,
            raw.nozzle_plate_zone_gap,
            raw.nozzle_row_pitch,
            raw.skew_rate_per_nozzle,
        )
    }
}

impl GeometryConstants {
    ///
    /// Creates a new, validated set of geometry constants.
    ///
    /// # Returns:
    /// - A new `GeometryConstants` instance
    /// - A `GeometryError` if the derived layout would be inconsistent
    ///
    #[allow(clippy::too_many_arguments)]
    pub fn new(resolution: f64, nozzles_per_head: usize, stitch_zones: [usize; 3], nozzles_per_column: usize, column_group_order: Vec<usize>, nozzle_plate_zone_gap: f64, nozzle_row_pitch: f64, skew_rate_per_nozzle: f64) -> Result<GeometryConstants, GeometryError> {
        let constants = GeometryConstants {
            resolution,
            nozzles_per_head,
            stitch_zones,
            nozzles_per_column,
            column_group_order,
            nozzle_plate_zone_gap,
            nozzle_row_pitch,
            skew_rate_per_nozzle,
        };
        constants.validate()?;

        Ok(constants)
    }

    ///
    /// Parses constants from a JSON document. Missing fields take the reference defaults.
    ///
    /// # Parameters:
    /// - `json`: The JSON document
    ///
    /// # Returns:
    /// - The validated constants
    /// - A `GeometryError` if the document is malformed or the geometry inconsistent
    ///
    pub fn from_json_str(json: &str) -> Result<GeometryConstants, GeometryError> {
        // parsed unchecked first, so geometry errors keep their own variant
        let raw: RawGeometryConstants = serde_json::from_str(json)?;
        let constants = GeometryConstants::try_from(raw)?;
        debug!("Loaded geometry constants: {} addresses per head", constants.number_of_addresses());

        Ok(constants)
    }

    ///
    /// Reads and parses constants from a JSON file.
    ///
    /// # Parameters:
    /// - `path`: The path of the configuration file
    ///
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<GeometryConstants, GeometryError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    ///
    /// Checks that every derived value is consistent.
    ///
    /// # Returns:
    /// - Void if the constants can produce a layout
    /// - A `GeometryError` describing the first inconsistency found
    ///
    pub fn validate(&self) -> Result<(), GeometryError> {
        if !self.resolution.is_finite() || self.resolution <= 0. {
            return Err(GeometryError::InvalidResolution(self.resolution));
        }

        if self.nozzles_per_head == 0 {
            return Err(GeometryError::InvalidParameter { name: "nozzles_per_head", reason: "must be positive".to_owned() });
        }

        let [s0, s1, s2] = self.stitch_zones;
        if !(s0 < s1 && s1 < s2) {
            return Err(GeometryError::StitchZonesNotAscending { zones: self.stitch_zones });
        }

        if self.number_of_addresses() == 0 {
            return Err(GeometryError::NoAddresses);
        }

        if self.column_group_order.is_empty() {
            return Err(GeometryError::EmptyGroupOrder);
        }

        let mut seen = vec![false; self.column_group_order.len()];
        for &group in &self.column_group_order {
            match seen.get_mut(group) {
                Some(slot) if !*slot => *slot = true,
                _ => return Err(GeometryError::InvalidGroupOrder { order: self.column_group_order.clone() }),
            }
        }

        if self.nozzles_per_column == 0 {
            return Err(GeometryError::InvalidParameter { name: "nozzles_per_column", reason: "must be positive".to_owned() });
        }

        if self.nozzles_per_column % self.group_count() != 0 {
            return Err(GeometryError::UnevenGroups { nozzles_per_column: self.nozzles_per_column, groups: self.group_count() });
        }

        for (name, value) in [
            ("nozzle_plate_zone_gap", self.nozzle_plate_zone_gap),
            ("nozzle_row_pitch", self.nozzle_row_pitch),
            ("skew_rate_per_nozzle", self.skew_rate_per_nozzle),
        ] {
            if !value.is_finite() {
                return Err(GeometryError::InvalidParameter { name, reason: format!("{} is not finite", value) });
            }
        }

        Ok(())
    }

    ///
    /// # Returns:
    /// - The size of one addressable pixel, in millimetres
    ///
    pub fn pixel_size(&self) -> f64 {
        math::pixel_size(self.resolution)
    }

    ///
    /// # Returns:
    /// - The number of addresses on one head, stitch overlap included
    ///
    pub fn number_of_addresses(&self) -> usize {
        self.nozzles_per_head + 2 * self.stitch_zones[2]
    }

    pub fn group_count(&self) -> usize {
        self.column_group_order.len()
    }

    pub fn nozzles_per_group(&self) -> usize {
        self.nozzles_per_column / self.group_count()
    }

    ///
    /// # Returns:
    /// - The vertical distance between two nozzle rows, in millimetres
    ///
    pub fn nozzle_y_distance(&self) -> f64 {
        self.pixel_size() * self.nozzle_row_pitch
    }

    ///
    /// # Returns:
    /// - The vertical extent of one nozzle group, in millimetres
    ///
    pub fn group_size(&self) -> f64 {
        self.nozzles_per_group() as f64 * self.nozzle_y_distance()
    }

    ///
    /// Mirrors the stitch zone boundaries onto the far edge of the head.
    ///
    /// # Returns:
    /// - `number_of_addresses - stitch_zones[k]` for each boundary, in the same order
    ///
    pub fn right_stitch_zones(&self) -> [usize; 3] {
        let addresses = self.number_of_addresses();
        self.stitch_zones.map(|zone| addresses - zone)
    }
}
