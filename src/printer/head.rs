use std::sync::Arc;

use nalgebra::{Point2, Rotation2};

use crate::hardware::GeometryConstants;
use crate::hardware::layout::{Nozzle, generate_layout, head_origin_x};
use crate::hardware::mask::is_stitch_check;
use crate::hardware::math::rotate_with;

///
/// A linear array of nozzles mounted on a printbar, with its mechanical adjustments.
///
/// # Fields:
/// - `constants`: The geometry the layout is generated from
/// - `printbar_index`: The index of the owning printbar
/// - `index`: The index of the head within its printbar
/// - `lateral_offset`: The initial lateral position of the head, in nozzles
/// - `anchor`: The fixed center every rotation turns around
/// - `rotation`: The accumulated rotation, in radians
/// - `displacement`: The accumulated lateral translation, in millimetres
/// - `nozzles`: The nozzles of the head, in address order
///
#[derive(getset::Getters, getset::CopyGetters, Clone, Debug)]
pub struct Head {
    #[getset(get = "pub")]
    constants: Arc<GeometryConstants>,
    #[getset(get_copy = "pub")]
    printbar_index: usize,
    #[getset(get_copy = "pub")]
    index: usize,
    #[getset(get_copy = "pub")]
    lateral_offset: f64,
    #[getset(get_copy = "pub")]
    anchor: Point2<f64>,
    #[getset(get_copy = "pub")]
    rotation: f64,
    #[getset(get_copy = "pub")]
    displacement: f64,

    nozzles: Vec<Nozzle>,
}

impl Head {
    ///
    /// Creates a head at its nominal position within the printbar.
    ///
    /// # Parameters:
    /// - `constants`: The shared head geometry
    /// - `printbar_index`: The index of the owning printbar
    /// - `index`: The index of the head within its printbar
    ///
    /// # Returns:
    /// - A new `Head` with a freshly generated layout
    ///
    pub fn new(constants: Arc<GeometryConstants>, printbar_index: usize, index: usize) -> Head {
        Self::with_lateral_offset(constants, printbar_index, index, 0.)
    }

    ///
    /// Creates a head shifted laterally from its nominal position.
    ///
    /// # Parameters:
    /// - `lateral_offset`: The shift, in nozzles
    ///
    pub fn with_lateral_offset(constants: Arc<GeometryConstants>, printbar_index: usize, index: usize, lateral_offset: f64) -> Head {
        let anchor = Point2::new(head_origin_x(&constants, index, lateral_offset), 0.);
        let nozzles = generate_layout(&constants, printbar_index, index, lateral_offset);

        Head { constants, printbar_index, index, lateral_offset, anchor, rotation: 0., displacement: 0., nozzles }
    }

    pub fn nozzles(&self) -> &[Nozzle] {
        &self.nozzles
    }

    ///
    /// Moves every nozzle of the head along x.
    ///
    /// # Parameters:
    /// - `delta`: The translation, in millimetres
    ///
    pub fn move_x(&mut self, delta: f64) {
        for nozzle in self.nozzles.iter_mut() {
            nozzle.x += delta;
        }
        self.displacement += delta;
    }

    ///
    /// Adjusts the stitch between this head and its neighbours, same as `move_x`.
    ///
    pub fn adjust_stitch(&mut self, delta: f64) {
        self.move_x(delta);
    }

    ///
    /// Rotates every nozzle around the head anchor. Rotations accumulate. The anchor does
    /// not follow `move_x`, so translating then rotating differs from rotating then
    /// translating.
    ///
    /// # Parameters:
    /// - `angle`: The rotation angle, in radians
    ///
    pub fn rotate(&mut self, angle: f64) {
        let rotation = Rotation2::new(angle);

        for nozzle in self.nozzles.iter_mut() {
            let rotated = rotate_with(&nozzle.position(), &self.anchor, &rotation);
            nozzle.set_position(rotated);
        }
        self.rotation += angle;
    }

    ///
    /// Sets the firing state of the nozzles, address by address. Addresses past the end
    /// of `pattern` keep their current state.
    ///
    /// # Parameters:
    /// - `pattern`: The firing state, indexed by address
    ///
    pub fn set_firing_pattern(&mut self, pattern: &[bool]) {
        for (nozzle, firing) in self.nozzles.iter_mut().zip(pattern) {
            nozzle.firing = *firing;
        }
    }

    ///
    /// # Returns:
    /// - The stitch check selection of the head, indexed by address
    ///
    pub fn stitch_check_pattern(&self) -> Vec<bool> {
        self.nozzles.iter().map(is_stitch_check).collect()
    }

    ///
    /// Fires the stitch alignment marks only.
    ///
    pub fn fire_stitch_check(&mut self) {
        let pattern = self.stitch_check_pattern();
        self.set_firing_pattern(&pattern);
    }

    ///
    /// Regenerates the layout, discarding every transform and firing state.
    ///
    pub fn reset(&mut self) {
        self.nozzles = generate_layout(&self.constants, self.printbar_index, self.index, self.lateral_offset);
        self.rotation = 0.;
        self.displacement = 0.;
    }

    ///
    /// # Returns:
    /// - The lateral position of every nozzle, in address order
    ///
    pub fn line(&self) -> Vec<f64> {
        self.nozzles.iter().map(|n| n.x).collect()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::DEFAULT_CONSTANTS;

    const EPSILON: f64 = 1e-9;

    fn head() -> Head {
        Head::new(DEFAULT_CONSTANTS.clone(), 0, 1)
    }

    fn assert_same_positions(a: &Head, b: &Head) {
        for (n, m) in a.nozzles().iter().zip(b.nozzles()) {
            assert!((n.x - m.x).abs() < EPSILON, "x differs at address {}", n.address);
            assert!((n.y - m.y).abs() < EPSILON, "y differs at address {}", n.address);
        }
    }

    #[test]
    fn reset_reproduces_layout() {
        let fresh = generate_layout(&DEFAULT_CONSTANTS, 0, 1, 0.);
        let mut h = head();
        h.rotate(0.02);
        h.move_x(1.5);
        h.set_firing_pattern(&[true; 10]);
        h.reset();

        assert_eq!(h.nozzles(), fresh.as_slice());
        assert_eq!(h.rotation(), 0.);
        assert_eq!(h.displacement(), 0.);
    }

    #[test]
    fn move_x_translates_every_nozzle() {
        let before = head();
        let mut h = head();
        h.adjust_stitch(0.25);

        for (n, m) in before.nozzles().iter().zip(h.nozzles()) {
            assert!((m.x - n.x - 0.25).abs() < EPSILON);
            assert_eq!(m.y, n.y);
            assert_eq!(m.pixel_index, n.pixel_index);
        }
        assert_eq!(h.displacement(), 0.25);
    }

    #[test]
    fn rotations_compose() {
        let mut twice = head();
        twice.rotate(0.01);
        twice.rotate(0.03);

        let mut once = head();
        once.rotate(0.04);

        assert_same_positions(&twice, &once);
        assert!((twice.rotation() - 0.04).abs() < 1e-15);
    }

    #[test]
    fn translation_and_rotation_do_not_commute() {
        let mut move_first = head();
        move_first.move_x(2.);
        move_first.rotate(0.1);

        let mut rotate_first = head();
        rotate_first.rotate(0.1);
        rotate_first.move_x(2.);

        let n = &move_first.nozzles()[500];
        let m = &rotate_first.nozzles()[500];
        assert!((n.x - m.x).abs() > 1e-3 || (n.y - m.y).abs() > 1e-3);
    }

    #[test]
    fn rotation_keeps_identity_fields() {
        let before = head();
        let mut h = head();
        h.rotate(0.3);

        for (n, m) in before.nozzles().iter().zip(h.nozzles()) {
            assert_eq!(n.address, m.address);
            assert_eq!(n.pixel_index, m.pixel_index);
            assert_eq!(n.exists_physically, m.exists_physically);
        }
    }

    #[test]
    fn partial_firing_pattern_keeps_tail() {
        let mut h = head();
        h.set_firing_pattern(&vec![true; h.nozzles().len()]);
        h.set_firing_pattern(&[false, false, true]);

        let nozzles = h.nozzles();
        assert!(!nozzles[0].firing);
        assert!(!nozzles[1].firing);
        assert!(nozzles[2].firing);
        assert!(nozzles[3..].iter().all(|n| n.firing));
    }

    #[test]
    fn stitch_check_replaces_firing_state() {
        let mut h = head();
        h.set_firing_pattern(&vec![true; h.nozzles().len()]);
        h.fire_stitch_check();

        let firing: Vec<usize> = h.nozzles().iter().filter(|n| n.firing).map(|n| n.address).collect();
        assert_eq!(firing.len(), 32);
        assert_eq!(firing[..3], [0, 9, 16]);
        assert!(h.nozzles().iter().all(|n| n.firing == is_stitch_check(n)));
    }

    #[test]
    fn line_is_lateral_projection() {
        let h = Head::with_lateral_offset(DEFAULT_CONSTANTS.clone(), 0, 0, 10.);
        let line = h.line();
        let px = DEFAULT_CONSTANTS.pixel_size();

        assert_eq!(line.len(), 2304);
        assert!((line[0] - 10. * px).abs() < EPSILON);
        assert!((h.anchor().x - 10. * px).abs() < EPSILON);
        assert_eq!(h.lateral_offset(), 10.);
    }
}
