mod camera;
pub use camera::*;
mod display;
pub use display::*;

/// One decoded image as handed out by a camera, 8-bit BGR.
pub type Frame = opencv::core::Mat;
