use nalgebra::{Point2, Rotation2};

/// The length of an inch, in millimetres.
pub const INCH: f64 = 25.4;

///
/// Calculates the physical size of one addressable pixel.
///
/// # Parameters:
/// - `resolution`: The resolution in dots per inch
///
/// # Returns:
/// - The pixel size in millimetres
///
pub fn pixel_size(resolution: f64) -> f64 {
    INCH / resolution
}

///
/// # Returns:
/// - The Euclidean distance between two points, in millimetres
///
pub fn distance(a: &Point2<f64>, b: &Point2<f64>) -> f64 {
    nalgebra::distance(a, b)
}

///
/// Rotates a point around a center. Positive angles turn from +x towards +y.
///
/// # Parameters:
/// - `point`: The point to rotate
/// - `center`: The fixed center of the rotation
/// - `angle`: The rotation angle, in radians
///
/// # Returns:
/// - The rotated point
///
pub fn rotate_about(point: &Point2<f64>, center: &Point2<f64>, angle: f64) -> Point2<f64> {
    rotate_with(point, center, &Rotation2::new(angle))
}

///
/// Same as `rotate_about`, with a prebuilt rotation so that bulk callers compute the
/// sine and cosine once.
///
pub fn rotate_with(point: &Point2<f64>, center: &Point2<f64>, rotation: &Rotation2<f64>) -> Point2<f64> {
    center + rotation * (point - center)
}
