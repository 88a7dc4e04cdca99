//! Two-camera capture loop.
//!
//! A session owns both camera handles and the display. It moves through
//! `Idle -> Streaming -> {Saving -> Streaming, Terminated}` and releases the
//! handles exactly once on whichever path it ends, including failed startup.

use std::fmt;

use rstereo_core::{
    CameraBackend, CameraDevice, CameraError, DisplayError, Frame, FrameDisplay, KeyCommand,
};
use rstereo_pair_writer::PairWriter;

use crate::{
    compose::{self, ComposeError},
    config::SessionSettings,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Streaming,
    Saving,
    Terminated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamSide {
    Left,
    Right,
}

impl fmt::Display for StreamSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamSide::Left => write!(f, "left"),
            StreamSide::Right => write!(f, "right"),
        }
    }
}

#[derive(Debug)]
pub enum CaptureExit {
    QuitRequested,
    ReadFailed { side: StreamSide, error: CameraError },
}

#[derive(Debug)]
pub struct CaptureSummary {
    pub exit: CaptureExit,
    pub saved_pairs: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("could not open the {side} camera (device {index}): {source}")]
    Open {
        side: StreamSide,
        index: i32,
        source: CameraError,
    },
    #[error("the {side} camera (device {index}) is not opened")]
    NotOpened { side: StreamSide, index: i32 },
    #[error(transparent)]
    Compose(#[from] ComposeError),
    #[error("display failed: {0}")]
    Display(#[from] DisplayError),
}

pub struct CaptureSession<D: CameraDevice, W: FrameDisplay> {
    left: D,
    right: D,
    display: W,
    settings: SessionSettings,
    state: CaptureState,
    saved_pairs: u64,
    shut_down: bool,
}

impl<D: CameraDevice, W: FrameDisplay> CaptureSession<D, W> {
    /// Opens both cameras, requests the configured resolution and checks that
    /// both handles are usable.
    ///
    /// On error every handle acquired so far has been released.
    pub fn open<B>(
        backend: &mut B,
        settings: SessionSettings,
        display: W,
    ) -> Result<Self, CaptureError>
    where
        B: CameraBackend<Device = D>,
    {
        let mut left = backend
            .open(settings.left_index)
            .map_err(|source| CaptureError::Open {
                side: StreamSide::Left,
                index: settings.left_index,
                source,
            })?;
        let right = match backend.open(settings.right_index) {
            Ok(right) => right,
            Err(source) => {
                left.release();
                return Err(CaptureError::Open {
                    side: StreamSide::Right,
                    index: settings.right_index,
                    source,
                });
            }
        };

        // from here on Drop takes care of both handles
        let mut session = Self {
            left,
            right,
            display,
            settings,
            state: CaptureState::Idle,
            saved_pairs: 0,
            shut_down: false,
        };
        session.configure()?;
        Ok(session)
    }

    fn configure(&mut self) -> Result<(), CaptureError> {
        let requested = self.settings.resolution;
        for (side, cam) in [
            (StreamSide::Left, &mut self.left),
            (StreamSide::Right, &mut self.right),
        ] {
            if let Err(e) = cam.request_frame_size(requested) {
                log::warn!(
                    "{side} camera (device {}) rejected {requested}: {e}",
                    cam.index()
                );
            }
            if !cam.is_opened() {
                return Err(CaptureError::NotOpened {
                    side,
                    index: cam.index(),
                });
            }
            match cam.frame_size() {
                Ok(actual) if actual != requested => log::warn!(
                    "{side} camera (device {}) runs at {actual} instead of {requested}",
                    cam.index()
                ),
                Ok(actual) => {
                    log::info!("{side} camera (device {}) runs at {actual}", cam.index())
                }
                Err(e) => log::warn!(
                    "{side} camera (device {}) did not report its size: {e}",
                    cam.index()
                ),
            }
        }
        Ok(())
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn saved_pairs(&self) -> u64 {
        self.saved_pairs
    }

    /// Streams until quit is requested or a camera stops delivering frames,
    /// then shuts the session down.
    ///
    /// A failed read ends the loop with `CaptureExit::ReadFailed`; a frame
    /// pair that cannot be composed or shown is returned as an error.
    pub fn run(&mut self, writer: &PairWriter) -> Result<CaptureSummary, CaptureError> {
        let exit = self.stream(writer);
        self.shutdown();
        Ok(CaptureSummary {
            exit: exit?,
            saved_pairs: self.saved_pairs,
        })
    }

    fn stream(&mut self, writer: &PairWriter) -> Result<CaptureExit, CaptureError> {
        self.state = CaptureState::Streaming;
        log::info!("streaming, press 's' to save a pair or 'q' to quit");

        loop {
            let left = self.left.read_frame();
            let right = self.right.read_frame();
            let (left, right) = match (left, right) {
                (Ok(left), Ok(right)) => (left, right),
                (Err(error), _) => return Ok(read_failed(StreamSide::Left, error)),
                (_, Err(error)) => return Ok(read_failed(StreamSide::Right, error)),
            };

            let combined = compose::side_by_side(&left, &right)?;
            self.display.show(&self.settings.window_title, &combined)?;

            match self.display.poll_key(self.settings.key_poll_timeout)? {
                Some(KeyCommand::Save) => self.save_pair(writer, &left, &right),
                Some(KeyCommand::Quit) => {
                    log::info!("quit requested");
                    return Ok(CaptureExit::QuitRequested);
                }
                Some(KeyCommand::Other(_)) | None => {}
            }
        }
    }

    fn save_pair(&mut self, writer: &PairWriter, left: &Frame, right: &Frame) {
        self.state = CaptureState::Saving;
        match writer.write_pair(self.saved_pairs, left, right) {
            Ok(saved) => {
                log::info!("Saved {} and {}", saved.left.display(), saved.right.display());
                self.saved_pairs += 1;
            }
            Err(e) => log::error!("could not save pair {}: {e}", self.saved_pairs),
        }
        self.state = CaptureState::Streaming;
    }

    fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        self.state = CaptureState::Terminated;

        self.left.release();
        self.right.release();
        if let Err(e) = self.display.close_all() {
            log::warn!("failed to close display windows: {e}");
        }
    }
}

impl<D: CameraDevice, W: FrameDisplay> Drop for CaptureSession<D, W> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn read_failed(side: StreamSide, error: CameraError) -> CaptureExit {
    log::error!("could not read a frame from the {side} camera: {error}");
    CaptureExit::ReadFailed { side, error }
}
