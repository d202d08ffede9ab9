//!
//! Nozzle records and the generation of a head's nozzle layout
//!

use log::debug;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::hardware::GeometryConstants;
use crate::hardware::mask::{is_in_stitch_zone, nozzle_exists};

///
/// A single physical ink ejector.
///
/// # Fields:
/// - `printbar_index`: The index of the owning printbar within the printer
/// - `head_index`: The index of the owning head within its printbar
/// - `address`: The address of the nozzle within its head
/// - `x`: The lateral position, in millimetres
/// - `y`: The position along the print direction, in millimetres
/// - `exists_physically`: Whether the nozzle survives the stitch zone mask
/// - `is_in_stitch_zone`: Whether the nozzle sits in a stitch overlap
/// - `pixel_index`: The column of the stitched print line this nozzle addresses
/// - `firing`: Whether the nozzle is currently set to fire
/// - `drop_size`: A scalar multiplier of the ejected drop
/// - `display_tag`: A hue in degrees, for presentation only
///
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Nozzle {
    pub printbar_index: usize,
    pub head_index: usize,
    pub address: usize,
    pub x: f64,
    pub y: f64,
    pub exists_physically: bool,
    pub is_in_stitch_zone: bool,
    pub pixel_index: i64,
    pub firing: bool,
    pub drop_size: f64,
    pub display_tag: f64,
}

impl Nozzle {
    pub fn position(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }

    pub(crate) fn set_position(&mut self, position: Point2<f64>) {
        self.x = position.x;
        self.y = position.y;
    }
}

///
/// Computes the x translation of a head's origin: heads sit side by side every
/// `nozzles_per_head` pixels, then shift by their own lateral offset.
///
/// # Parameters:
/// - `constants`: The head geometry
/// - `head_index`: The index of the head within its printbar
/// - `lateral_offset`: The lateral offset of the head, in nozzles
///
/// # Returns:
/// - The x position of address 0 before any transform, in millimetres
///
pub fn head_origin_x(constants: &GeometryConstants, head_index: usize, lateral_offset: f64) -> f64 {
    let pixel_size = constants.pixel_size();
    (head_index * constants.nozzles_per_head()) as f64 * pixel_size + lateral_offset * pixel_size
}

///
/// Maps a nozzle address to its column in the stitched print line. Adjacent heads
/// produce overlapping indices at the seams, the overlap is kept.
///
pub fn pixel_index(constants: &GeometryConstants, head_index: usize, address: usize) -> i64 {
    let addresses = constants.number_of_addresses() as i64;
    let inner = constants.stitch_zones()[2] as i64;
    let head = head_index as i64;

    head * addresses + (address as i64 - inner) - head * inner
}

///
/// # Returns:
/// - A hue in degrees, cycling once per column of the nozzle plate
///
pub fn display_tag(constants: &GeometryConstants, pixel_index: i64) -> f64 {
    let column = *constants.nozzles_per_column() as i64;
    360. * pixel_index.rem_euclid(column) as f64 / column as f64
}

///
/// Generates every nozzle of a head, in address order. The runtime is linear in the number
/// of addresses.
///
/// # Parameters:
/// - `constants`: The head geometry
/// - `printbar_index`: The index of the owning printbar, stored on every nozzle
/// - `head_index`: The index of the head within its printbar
/// - `lateral_offset`: The lateral offset of the head, in nozzles
///
/// # Returns:
/// - A vector of `number_of_addresses` nozzles
///
pub fn generate_layout(constants: &GeometryConstants, printbar_index: usize, head_index: usize, lateral_offset: f64) -> Vec<Nozzle> {
    let addresses = constants.number_of_addresses();
    let pixel_size = constants.pixel_size();
    let nozzle_y_distance = constants.nozzle_y_distance();
    let group_size = constants.group_size();
    let group_count = constants.group_count();
    let nozzles_per_column = *constants.nozzles_per_column();
    let origin_x = head_origin_x(constants, head_index, lateral_offset);

    let mut nozzles = Vec::with_capacity(addresses);

    for n in 0..addresses {
        let x = n as f64 * pixel_size;

        // position of the nozzle inside its column
        let column_position = ((n % nozzles_per_column) as f64 * nozzle_y_distance) / group_count as f64;

        // groups are interleaved following the column group order, the second row sits
        // below the plate gap
        let group = constants.column_group_order()[(n % nozzles_per_column) % group_count];
        let mut group_position = group as f64 * group_size;
        if group > 1 {
            group_position += constants.nozzle_plate_zone_gap();
        }

        let skew = n as f64 * constants.skew_rate_per_nozzle();
        let pixel_index = pixel_index(constants, head_index, n);

        nozzles.push(Nozzle {
            printbar_index,
            head_index,
            address: n,
            x: x + origin_x,
            y: group_position + column_position + skew,
            exists_physically: nozzle_exists(constants, n),
            is_in_stitch_zone: is_in_stitch_zone(constants, n),
            pixel_index,
            firing: false,
            drop_size: 1.,
            display_tag: display_tag(constants, pixel_index),
        });
    }

    debug!(
        "Generated {} nozzles for printbar {} head {}, {} exist",
        nozzles.len(), printbar_index, head_index, nozzles.iter().filter(|n| n.exists_physically).count()
    );

    nozzles
}
