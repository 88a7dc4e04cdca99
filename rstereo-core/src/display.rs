use std::time::Duration;

use crate::Frame;

/// What a single keypress asks the capture loop to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    Save,
    Quit,
    Other(u8),
}

impl KeyCommand {
    /// Maps a raw key code from the windowing layer. Negative codes mean no
    /// key was pressed within the poll timeout; only the low byte is
    /// significant otherwise.
    pub fn from_key_code(code: i32) -> Option<Self> {
        if code < 0 {
            return None;
        }
        let key = (code & 0xFF) as u8;
        Some(match key {
            b's' => KeyCommand::Save,
            b'q' => KeyCommand::Quit,
            other => KeyCommand::Other(other),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    #[error("OpenCV error: {0}")]
    OpenCv(#[from] opencv::Error),
}

pub trait FrameDisplay {
    /// Creates the named window on first use, otherwise replaces its content.
    fn show(&mut self, window: &str, frame: &Frame) -> Result<(), DisplayError>;

    /// Waits at most `timeout` for one keypress.
    fn poll_key(&mut self, timeout: Duration) -> Result<Option<KeyCommand>, DisplayError>;

    fn close_all(&mut self) -> Result<(), DisplayError>;
}
