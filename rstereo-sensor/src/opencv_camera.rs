//! Camera handles backed by OpenCV's `VideoCapture`.

use opencv::{
    core::Mat,
    prelude::*,
    videoio::{self, VideoCapture},
};
use rstereo_core::{CameraBackend, CameraDevice, CameraError, Frame, Resolution};

pub struct OpenCvCamera {
    index: i32,
    cam: Option<VideoCapture>,
}

impl OpenCvCamera {
    /// Opens device `index` through the given `videoio` API preference.
    ///
    /// Returns `CameraError::Unavailable` when OpenCV creates the capture
    /// object but cannot open the device behind it.
    pub fn open(index: i32, api_preference: i32) -> Result<Self, CameraError> {
        let cam = VideoCapture::new(index, api_preference)?;
        if !cam.is_opened().unwrap_or(false) {
            return Err(CameraError::Unavailable(index));
        }
        Ok(Self {
            index,
            cam: Some(cam),
        })
    }

    fn property(&self, prop_id: i32) -> Result<u32, CameraError> {
        let cam = self.cam.as_ref().ok_or(CameraError::Released(self.index))?;
        let value = cam.get(prop_id)?;
        if !value.is_finite() || value < 0.0 {
            return Err(CameraError::Query {
                index: self.index,
                reason: format!("property {prop_id} reported {value}"),
            });
        }
        Ok(value.round() as u32)
    }

    fn set_property(&mut self, prop_id: i32, value: u32) -> Result<(), CameraError> {
        let index = self.index;
        let cam = self.cam.as_mut().ok_or(CameraError::Released(index))?;
        if !cam.set(prop_id, f64::from(value))? {
            // the backend is free to refuse; the caller reads the size back
            log::debug!("camera {index} refused property {prop_id} = {value}");
        }
        Ok(())
    }
}

impl CameraDevice for OpenCvCamera {
    fn index(&self) -> i32 {
        self.index
    }

    fn is_opened(&self) -> bool {
        self.cam
            .as_ref()
            .map(|cam| cam.is_opened().unwrap_or(false))
            .unwrap_or(false)
    }

    fn frame_size(&self) -> Result<Resolution, CameraError> {
        Ok(Resolution::new(
            self.property(videoio::CAP_PROP_FRAME_WIDTH)?,
            self.property(videoio::CAP_PROP_FRAME_HEIGHT)?,
        ))
    }

    fn request_frame_size(&mut self, size: Resolution) -> Result<(), CameraError> {
        self.set_property(videoio::CAP_PROP_FRAME_WIDTH, size.width)?;
        self.set_property(videoio::CAP_PROP_FRAME_HEIGHT, size.height)
    }

    fn read_frame(&mut self) -> Result<Frame, CameraError> {
        let index = self.index;
        let cam = self.cam.as_mut().ok_or(CameraError::Released(index))?;
        let mut frame = Mat::default();
        if cam.read(&mut frame)? && !frame.empty() {
            Ok(frame)
        } else {
            Err(CameraError::NoFrame(index))
        }
    }

    fn release(&mut self) {
        if let Some(mut cam) = self.cam.take() {
            if let Err(e) = cam.release() {
                log::warn!("failed to release camera {}: {e}", self.index);
            }
        }
    }
}

impl Drop for OpenCvCamera {
    fn drop(&mut self) {
        self.release();
    }
}

/// Opens [`OpenCvCamera`] handles by device index.
#[derive(Clone, Copy, Debug)]
pub struct OpenCvBackend {
    api_preference: i32,
}

impl OpenCvBackend {
    pub fn new(api_preference: i32) -> Self {
        Self { api_preference }
    }
}

impl Default for OpenCvBackend {
    fn default() -> Self {
        Self::new(videoio::CAP_ANY)
    }
}

impl CameraBackend for OpenCvBackend {
    type Device = OpenCvCamera;

    fn open(&mut self, index: i32) -> Result<OpenCvCamera, CameraError> {
        OpenCvCamera::open(index, self.api_preference)
    }
}
