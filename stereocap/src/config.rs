use std::{ops::RangeInclusive, path::Path, path::PathBuf, time::Duration};

use anyhow::{ensure, Context, Result};
use rstereo_core::Resolution;
use rstereo_pair_writer::PairLayout;
use rstereo_sensor::RigCalibration;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StereoCaptureCfg {
    // devices 0..=probe_max_index are probed before capturing
    pub probe_max_index: i32,
    // oversized request that makes the driver fall back to its maximum
    pub probe_request: Resolution,

    pub left_index: i32,
    pub right_index: i32,
    pub resolution: Resolution,

    pub left_dir: PathBuf,
    pub right_dir: PathBuf,
    pub image_extension: String,

    pub window_title: String,
    pub key_poll_timeout_ms: u64,

    pub calibration: RigCalibration,
}

impl Default for StereoCaptureCfg {
    fn default() -> Self {
        Self {
            probe_max_index: 4,
            probe_request: Resolution::new(9999, 9999),

            left_index: 2,
            right_index: 4,
            resolution: Resolution::new(640, 480),

            left_dir: PathBuf::from("left"),
            right_dir: PathBuf::from("right"),
            image_extension: String::from("jpg"),

            window_title: String::from("Stereo Camera Output (Left | Right)"),
            key_poll_timeout_ms: 1,

            calibration: RigCalibration::default(),
        }
    }
}

impl StereoCaptureCfg {
    /// Parses a TOML document. Keys that are left out keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))
    }

    pub fn finalize(self) -> Result<StereoCaptureSettings> {
        ensure!(
            self.probe_max_index >= 0,
            "probe_max_index must not be negative, got {}",
            self.probe_max_index
        );
        ensure!(
            self.probe_request.width > 0 && self.probe_request.height > 0,
            "probe_request must be non-zero, got {}",
            self.probe_request
        );
        ensure!(
            self.left_index >= 0 && self.right_index >= 0,
            "camera indices must not be negative, got left {} right {}",
            self.left_index,
            self.right_index
        );
        ensure!(
            self.left_index != self.right_index,
            "left and right camera share device index {}",
            self.left_index
        );
        ensure!(
            self.resolution.width > 0 && self.resolution.height > 0,
            "resolution must be non-zero, got {}",
            self.resolution
        );
        ensure!(
            !self.left_dir.as_os_str().is_empty() && !self.right_dir.as_os_str().is_empty(),
            "output directories must not be empty"
        );
        ensure!(
            !self.image_extension.is_empty() && !self.image_extension.contains('.'),
            "image_extension must be a bare extension such as \"jpg\", got {:?}",
            self.image_extension
        );
        ensure!(!self.window_title.is_empty(), "window_title must not be empty");
        ensure!(
            self.key_poll_timeout_ms > 0,
            "key_poll_timeout_ms must be at least 1"
        );

        log::debug!(
            "rig: left->robot {} cm, right->robot {} cm, baseline {} cm",
            self.calibration.left_camera_to_robot_cm,
            self.calibration.right_camera_to_robot_cm,
            self.calibration.baseline_cm
        );

        Ok(StereoCaptureSettings {
            probe: ProbeSettings {
                indices: 0..=self.probe_max_index,
                max_request: self.probe_request,
            },
            session: SessionSettings {
                left_index: self.left_index,
                right_index: self.right_index,
                resolution: self.resolution,
                window_title: self.window_title,
                key_poll_timeout: Duration::from_millis(self.key_poll_timeout_ms),
            },
            layout: PairLayout::new(self.left_dir, self.right_dir, self.image_extension),
            calibration: self.calibration,
        })
    }
}

#[derive(Clone, Debug)]
pub struct ProbeSettings {
    pub indices: RangeInclusive<i32>,
    pub max_request: Resolution,
}

#[derive(Clone, Debug)]
pub struct SessionSettings {
    pub left_index: i32,
    pub right_index: i32,
    pub resolution: Resolution,
    pub window_title: String,
    pub key_poll_timeout: Duration,
}

/// Validated configuration, split by the phase that consumes it.
#[derive(Clone, Debug)]
pub struct StereoCaptureSettings {
    pub probe: ProbeSettings,
    pub session: SessionSettings,
    pub layout: PairLayout,
    pub calibration: RigCalibration,
}
