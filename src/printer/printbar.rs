use std::sync::Arc;

use nalgebra::Point2;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::hardware::GeometryConstants;
use crate::hardware::layout::Nozzle;
use crate::hardware::math::distance;
use crate::printer::head::Head;

///
/// The ink channel of a printbar.
///
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum InkColor {
    Cyan,
    Magenta,
    Yellow,
    Black,
}

impl InkColor {
    const PALETTE: [InkColor; 4] = [InkColor::Cyan, InkColor::Magenta, InkColor::Yellow, InkColor::Black];

    ///
    /// # Returns:
    /// - The ink of the printbar at `index`, cycling through cyan, magenta, yellow and black
    ///
    pub fn from_index(index: usize) -> InkColor {
        Self::PALETTE[index % Self::PALETTE.len()]
    }

    ///
    /// # Returns:
    /// - The ink as an sRGB triplet
    ///
    pub fn rgb(&self) -> [u8; 3] {
        match self {
            InkColor::Cyan => [0, 255, 255],
            InkColor::Magenta => [255, 0, 255],
            InkColor::Yellow => [255, 255, 0],
            InkColor::Black => [0, 0, 0],
        }
    }
}

///
/// A set of heads sharing one ink channel.
///
/// # Fields:
/// - `index`: The index of the printbar within the printer
/// - `color`: The ink of the printbar
/// - `heads`: The heads, in lateral order
///
#[derive(Clone, Debug)]
pub struct Printbar {
    index: usize,
    color: InkColor,
    heads: Vec<Head>,
}

impl Printbar {
    ///
    /// Creates a printbar with `number_of_heads` heads at their nominal positions.
    ///
    /// # Parameters:
    /// - `constants`: The shared head geometry
    /// - `index`: The index of the printbar within the printer, which also picks its ink
    /// - `number_of_heads`: The number of heads on the printbar
    ///
    pub fn new(constants: Arc<GeometryConstants>, index: usize, number_of_heads: usize) -> Printbar {
        let heads = (0..number_of_heads).map(|h| Head::new(constants.clone(), index, h)).collect();

        Printbar { index, color: InkColor::from_index(index), heads }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn color(&self) -> InkColor {
        self.color
    }

    pub fn heads(&self) -> &[Head] {
        &self.heads
    }

    pub fn heads_mut(&mut self) -> &mut [Head] {
        &mut self.heads
    }

    pub fn head(&self, index: usize) -> Option<&Head> {
        self.heads.get(index)
    }

    pub fn head_mut(&mut self, index: usize) -> Option<&mut Head> {
        self.heads.get_mut(index)
    }

    ///
    /// # Returns:
    /// - Every nozzle of the printbar, head by head and in address order within a head
    ///
    pub fn nozzles(&self) -> impl Iterator<Item = &Nozzle> {
        self.heads.iter().flat_map(|h| h.nozzles().iter())
    }

    pub fn nozzle_count(&self) -> usize {
        self.heads.iter().map(|h| h.nozzles().len()).sum()
    }

    ///
    /// Finds the nozzles around a point. Every nozzle is checked, which is fine for
    /// pointer-driven queries.
    ///
    /// # Parameters:
    /// - `point`: The query point, in millimetres
    /// - `radius`: The search radius, exclusive, in millimetres
    /// - `include_non_existent`: Whether nozzles masked out of the stitch zones are returned
    ///
    /// # Returns:
    /// - The matching nozzles from closest to farthest, equal distances in enumeration order
    ///
    pub fn nearest_nozzles(&self, point: &Point2<f64>, radius: f64, include_non_existent: bool) -> Vec<&Nozzle> {
        let mut candidates: Vec<(f64, &Nozzle)> = self.nozzles()
            .filter(|n| n.exists_physically || include_non_existent)
            .map(|n| (distance(&n.position(), point), n))
            .filter(|(d, _)| *d < radius)
            .collect();

        // stable, so ties keep the enumeration order
        candidates.sort_by_key(|(d, _)| OrderedFloat(*d));

        candidates.into_iter().map(|(_, n)| n).collect()
    }

    ///
    /// # Returns:
    /// - The closest nozzle within `radius` of the point, or `None`
    ///
    pub fn nearest_nozzle(&self, point: &Point2<f64>, radius: f64, include_non_existent: bool) -> Option<&Nozzle> {
        self.nearest_nozzles(point, radius, include_non_existent).into_iter().next()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::DEFAULT_CONSTANTS;

    fn printbar() -> Printbar {
        Printbar::new(DEFAULT_CONSTANTS.clone(), 0, 2)
    }

    #[test]
    fn enumeration_is_head_major() {
        let pb = printbar();
        let nozzles: Vec<&Nozzle> = pb.nozzles().collect();

        assert_eq!(nozzles.len(), 4608);
        assert_eq!(pb.nozzle_count(), 4608);
        assert_eq!((nozzles[0].head_index, nozzles[0].address), (0, 0));
        assert_eq!((nozzles[2303].head_index, nozzles[2303].address), (0, 2303));
        assert_eq!((nozzles[2304].head_index, nozzles[2304].address), (1, 0));
    }

    #[test]
    fn coincident_query_returns_that_nozzle() {
        let pb = printbar();
        let target = pb.heads()[1].nozzles()[700].clone();

        let found = pb.nearest_nozzle(&target.position(), 1., false).unwrap();
        assert_eq!((found.head_index, found.address), (1, 700));
        assert!(distance(&found.position(), &target.position()) < 1e-12);
    }

    #[test]
    fn masked_nozzles_are_skipped_by_default() {
        let pb = printbar();
        let masked = pb.heads()[0].nozzles()[2176].clone();
        assert!(!masked.exists_physically);

        // the stitch overlap puts the second head right next to it
        let found = pb.nearest_nozzle(&masked.position(), 1., false).unwrap();
        assert!(found.exists_physically);
        assert_eq!((found.head_index, found.address), (1, 132));
        assert!(pb.nearest_nozzles(&masked.position(), 1., false).iter().all(|n| n.exists_physically));

        let found = pb.nearest_nozzle(&masked.position(), 1., true).unwrap();
        assert_eq!((found.head_index, found.address), (0, 2176));
    }

    #[test]
    fn results_are_sorted_by_distance() {
        let pb = printbar();
        let point = pb.heads()[0].nozzles()[1000].position();
        let found = pb.nearest_nozzles(&point, 2., false);

        assert!(found.len() > 1);
        for pair in found.windows(2) {
            assert!(distance(&pair[0].position(), &point) <= distance(&pair[1].position(), &point));
        }
        assert!(found.iter().all(|n| distance(&n.position(), &point) < 2.));
    }

    #[test]
    fn miss_is_none() {
        let pb = printbar();
        assert!(pb.nearest_nozzle(&Point2::new(-100., -100.), 1., true).is_none());
        assert!(pb.nearest_nozzles(&Point2::new(-100., -100.), 1., true).is_empty());
    }

    #[test]
    fn ink_cycles_with_index() {
        assert_eq!(Printbar::new(DEFAULT_CONSTANTS.clone(), 1, 1).color(), InkColor::Magenta);
        assert_eq!(InkColor::from_index(4), InkColor::Cyan);
        assert_eq!(InkColor::from_index(3), InkColor::Black);
        assert_eq!(InkColor::from_index(2).rgb(), [255, 255, 0]);
    }
}
