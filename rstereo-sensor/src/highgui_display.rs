use std::{collections::BTreeSet, time::Duration};

use opencv::highgui;
use rstereo_core::{DisplayError, Frame, FrameDisplay, KeyCommand};

/// Shows frames in OpenCV `highgui` windows and reads keys from them.
#[derive(Debug, Default)]
pub struct HighGuiDisplay {
    windows: BTreeSet<String>,
}

impl HighGuiDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameDisplay for HighGuiDisplay {
    fn show(&mut self, window: &str, frame: &Frame) -> Result<(), DisplayError> {
        if !self.windows.contains(window) {
            highgui::named_window(window, highgui::WINDOW_AUTOSIZE)?;
            self.windows.insert(window.to_owned());
        }
        highgui::imshow(window, frame)?;
        Ok(())
    }

    fn poll_key(&mut self, timeout: Duration) -> Result<Option<KeyCommand>, DisplayError> {
        // wait_key(0) blocks forever
        let delay = timeout.as_millis().clamp(1, i32::MAX as u128) as i32;
        Ok(KeyCommand::from_key_code(highgui::wait_key(delay)?))
    }

    fn close_all(&mut self) -> Result<(), DisplayError> {
        if !self.windows.is_empty() {
            highgui::destroy_all_windows()?;
            self.windows.clear();
        }
        Ok(())
    }
}
