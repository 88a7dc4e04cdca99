//! Diagnostic sweep over a range of camera indices.
//!
//! Each index is opened, asked for its default and its maximum frame size,
//! and released again before the next index is touched. Nothing found here is
//! carried over into the capture session.

use rstereo_core::{CameraBackend, CameraDevice, CameraError, Resolution};

use crate::config::ProbeSettings;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProbeOutcome {
    NotAvailable,
    Available {
        default_size: Resolution,
        max_size: Resolution,
    },
    // the device opened but would not report its frame size
    QueryFailed(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeReport {
    pub index: i32,
    pub outcome: ProbeOutcome,
}

pub fn probe_devices<B: CameraBackend>(
    backend: &mut B,
    settings: &ProbeSettings,
) -> Vec<ProbeReport> {
    settings
        .indices
        .clone()
        .map(|index| ProbeReport {
            index,
            outcome: probe_device(backend, index, settings.max_request),
        })
        .collect()
}

fn probe_device<B: CameraBackend>(
    backend: &mut B,
    index: i32,
    max_request: Resolution,
) -> ProbeOutcome {
    let mut device = match backend.open(index) {
        Ok(device) => device,
        Err(e) => {
            log::debug!("opening camera {index} failed: {e}");
            log::info!("Camera {index} is NOT available");
            return ProbeOutcome::NotAvailable;
        }
    };
    log::info!("Camera {index} is available");

    let outcome = match query_sizes(&mut device, max_request) {
        Ok((default_size, max_size)) => ProbeOutcome::Available {
            default_size,
            max_size,
        },
        Err(e) => {
            log::warn!("Camera {index} did not report its resolution: {e}");
            ProbeOutcome::QueryFailed(e.to_string())
        }
    };
    device.release();
    outcome
}

fn query_sizes<D: CameraDevice>(
    device: &mut D,
    max_request: Resolution,
) -> Result<(Resolution, Resolution), CameraError> {
    let default_size = device.frame_size()?;
    log::info!("Default Resolution: {default_size}");

    if let Err(e) = device.request_frame_size(max_request) {
        log::warn!("Camera {} rejected {max_request}: {e}", device.index());
    }
    let max_size = device.frame_size()?;
    log::info!("Max Resolution: {max_size}");

    Ok((default_size, max_size))
}
