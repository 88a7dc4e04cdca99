pub mod highgui_display;
pub mod opencv_camera;
pub mod rig_calibration;

pub use highgui_display::HighGuiDisplay;
pub use opencv_camera::{OpenCvBackend, OpenCvCamera};
pub use rig_calibration::RigCalibration;
