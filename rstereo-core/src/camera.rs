use std::fmt;

use serde::Deserialize;

use crate::Frame;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CameraError {
    #[error("camera {0} is not available")]
    Unavailable(i32),
    #[error("failed to query camera {index}: {reason}")]
    Query { index: i32, reason: String },
    #[error("camera {0} did not deliver a frame")]
    NoFrame(i32),
    #[error("camera {0} has already been released")]
    Released(i32),
    #[error("OpenCV error: {0}")]
    OpenCv(#[from] opencv::Error),
}

/// An open camera handle.
///
/// A handle is owned by whoever opened it and must be released exactly once.
/// Implementations keep `release` idempotent so a drop guard can call it
/// again without touching the device twice.
pub trait CameraDevice {
    fn index(&self) -> i32;

    fn is_opened(&self) -> bool;

    /// Frame size the device currently reports.
    fn frame_size(&self) -> Result<Resolution, CameraError>;

    /// Asks the device for `size`. The device may coerce or ignore the
    /// request; read `frame_size` back to learn what it settled on.
    fn request_frame_size(&mut self, size: Resolution) -> Result<(), CameraError>;

    /// Blocks until the next frame is available or the device gives up.
    fn read_frame(&mut self) -> Result<Frame, CameraError>;

    fn release(&mut self);
}

pub trait CameraBackend {
    type Device: CameraDevice;

    fn open(&mut self, index: i32) -> Result<Self::Device, CameraError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_display() {
        assert_eq!(Resolution::new(640, 480).to_string(), "640x480");
    }

    #[test]
    fn camera_error_display() {
        assert_eq!(CameraError::Unavailable(3).to_string(), "camera 3 is not available");
        assert_eq!(
            CameraError::NoFrame(4).to_string(),
            "camera 4 did not deliver a frame"
        );
    }
}
