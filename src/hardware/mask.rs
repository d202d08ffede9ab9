//!
//! Nozzle existence inside the stitch zones
//!
//! The density of a head thins out towards both edges (1200 -> 900 -> 600 -> 300 dpi) so
//! that neighbouring heads can overlap across the stitch seam. The far edge mirrors the
//! near edge with inverted predicates.
//!

use crate::hardware::GeometryConstants;
use crate::hardware::layout::Nozzle;

/// The period, in print line pixels, of the stitch alignment marks.
const STITCH_CHECK_PERIOD: i64 = 16;

///
/// Checks whether a nozzle exists at the given address.
///
/// # Parameters:
/// - `constants`: The head geometry
/// - `address`: The nozzle address, must be below `number_of_addresses`
///
/// # Returns:
/// - `true` if the nozzle is physically present
///
/// # Panics:
/// - If `address` is outside of the head, which means the layout generation is broken
///
pub fn nozzle_exists(constants: &GeometryConstants, address: usize) -> bool {
    let addresses = constants.number_of_addresses();
    assert!(address < addresses, "nozzle address {} outside of a head with {} addresses", address, addresses);

    let [s0, s1, s2] = *constants.stitch_zones();
    let [r0, r1, r2] = constants.right_stitch_zones();

    if address < s0 {
        return address % 4 == 0;
    }
    if address < s1 {
        return address % 2 == 0;
    }
    if address < s2 {
        return address % 4 != 3;
    }

    if address >= r0 {
        return address % 4 == 3;
    }
    if address >= r1 {
        return address % 2 != 0;
    }
    if address >= r2 {
        return address % 4 != 0;
    }

    true
}

///
/// Generates the existence mask of a whole head, indexed by address.
///
pub fn generate_mask(constants: &GeometryConstants) -> Vec<bool> {
    (0..constants.number_of_addresses()).map(|address| nozzle_exists(constants, address)).collect()
}

///
/// # Returns:
/// - `true` if the address lies in either stitch overlap of the head
///
pub fn is_in_stitch_zone(constants: &GeometryConstants, address: usize) -> bool {
    let inner = constants.stitch_zones()[2];
    address < inner || address >= constants.number_of_addresses() - inner
}

///
/// Selects the nozzles firing the stitch alignment marks: two lines every
/// `STITCH_CHECK_PERIOD` pixels, inside the stitch overlaps only, so that neighbouring heads
/// print interleaved marks across the seam.
///
/// # Returns:
/// - `true` if the nozzle takes part in the stitch check
///
pub fn is_stitch_check(nozzle: &Nozzle) -> bool {
    let phase = nozzle.pixel_index.rem_euclid(STITCH_CHECK_PERIOD);
    (phase == 0 || phase == 9) && nozzle.is_in_stitch_zone
}


#[cfg(test)]
mod tests {
    use super::*;

    fn count(mask: &[bool], range: std::ops::Range<usize>) -> usize {
        mask[range].iter().filter(|e| **e).count()
    }

    #[test]
    fn default_head_population() {
        let mask = generate_mask(&GeometryConstants::default());
        assert_eq!(mask.len(), 2304);
        assert_eq!(mask.iter().filter(|e| **e).count(), 2176);
    }

    #[test]
    fn default_zone_densities() {
        let mask = generate_mask(&GeometryConstants::default());
        assert_eq!(count(&mask, 0..32), 8);
        assert_eq!(count(&mask, 32..96), 32);
        assert_eq!(count(&mask, 96..128), 24);
        assert_eq!(count(&mask, 128..2176), 2048);
        assert_eq!(count(&mask, 2176..2208), 24);
        assert_eq!(count(&mask, 2208..2272), 32);
        assert_eq!(count(&mask, 2272..2304), 8);
    }

    #[test]
    fn edges_mirror_each_other() {
        let k = GeometryConstants::default();
        assert!(nozzle_exists(&k, 0));
        assert!(!nozzle_exists(&k, 1));
        assert!(!nozzle_exists(&k, 99));
        assert!(nozzle_exists(&k, 2303));
        assert!(!nozzle_exists(&k, 2302));
        assert!(!nozzle_exists(&k, 2176));
        assert!(nozzle_exists(&k, 2177));
    }

    #[test]
    fn mask_is_deterministic() {
        let k = GeometryConstants::default();
        assert_eq!(generate_mask(&k), generate_mask(&k));
    }

    #[test]
    fn stitch_membership() {
        let k = GeometryConstants::default();
        assert!(is_in_stitch_zone(&k, 127));
        assert!(!is_in_stitch_zone(&k, 128));
        assert!(!is_in_stitch_zone(&k, 2175));
        assert!(is_in_stitch_zone(&k, 2176));
    }

    #[test]
    fn stitch_check_addresses() {
        let k = GeometryConstants::default();
        let selected: Vec<usize> = crate::hardware::layout::generate_layout(&k, 0, 0, 0.)
            .iter()
            .filter(|n| is_stitch_check(n))
            .map(|n| n.address)
            .collect();

        assert_eq!(selected.len(), 32);
        assert_eq!(selected[..4], [0, 9, 16, 25]);
        assert_eq!(selected[14..18], [112, 121, 2176, 2185]);
        assert_eq!(selected[31], 2297);
    }

    #[test]
    fn stitch_check_follows_pixel_index() {
        // the second head is offset by 2048 pixels, a whole number of periods
        let k = GeometryConstants::default();
        let first = crate::hardware::layout::generate_layout(&k, 0, 0, 0.);
        let second = crate::hardware::layout::generate_layout(&k, 0, 1, 0.);

        for (n, m) in first.iter().zip(&second) {
            assert_eq!(is_stitch_check(n), is_stitch_check(m));
        }
        assert!(!is_stitch_check(&first[128]));
        assert!(!is_stitch_check(&first[1024]));
    }

    #[test]
    #[should_panic]
    fn address_outside_head() {
        nozzle_exists(&GeometryConstants::default(), 2304);
    }
}
