pub mod capture_session;
pub mod compose;
pub mod config;
pub mod prober;

pub use capture_session::{
    CaptureError, CaptureExit, CaptureSession, CaptureState, CaptureSummary, StreamSide,
};
pub use compose::{side_by_side, ComposeError, FrameShape};
pub use config::{ProbeSettings, SessionSettings, StereoCaptureCfg, StereoCaptureSettings};
pub use prober::{probe_devices, ProbeOutcome, ProbeReport};
