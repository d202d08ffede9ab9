use thiserror::Error;

///
/// All errors emitted from the raster module.
///
/// - `MalformedImage`: When the pixel buffer does not match the image dimensions
///     Parameters:
///     - `width`: The declared width
///     - `height`: The declared height
///     - `len`: The length of the pixel buffer
/// - `EmptyImage`: When the image has no width or no height
/// - `Decode`: When an image file could not be opened or decoded
/// - `Save`: When a preview could not be written to disk
///
#[derive(Error, Debug)]
pub enum RasterError {
    #[error("Image of {}x{} pixels does not match a buffer of {} samples", .width, .height, .len)]
    MalformedImage { width: usize, height: usize, len: usize },

    #[error("The image has no pixels")]
    EmptyImage,

    #[error("Can't load image: {}", .0)]
    Decode(image::ImageError),

    #[error("Can't save preview: {}", .0)]
    Save(image::ImageError),
}
