use std::fmt;

use opencv::{core, prelude::*};
use rstereo_core::Frame;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameShape {
    pub cols: i32,
    pub rows: i32,
    // OpenCV element type, e.g. CV_8UC3
    pub typ: i32,
}

impl FrameShape {
    pub fn of(frame: &Frame) -> Self {
        Self {
            cols: frame.cols(),
            rows: frame.rows(),
            typ: frame.typ(),
        }
    }
}

impl fmt::Display for FrameShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} (type {})", self.cols, self.rows, self.typ)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("mismatched frame size: left {left}, right {right}")]
    MismatchedFrameSize { left: FrameShape, right: FrameShape },
    #[error("OpenCV error: {0}")]
    OpenCv(#[from] opencv::Error),
}

/// Places `left` and `right` next to each other in one image.
///
/// Both frames need the same height and element type. Widths may differ.
pub fn side_by_side(left: &Frame, right: &Frame) -> Result<Frame, ComposeError> {
    let left_shape = FrameShape::of(left);
    let right_shape = FrameShape::of(right);
    if left_shape.rows != right_shape.rows || left_shape.typ != right_shape.typ {
        return Err(ComposeError::MismatchedFrameSize {
            left: left_shape,
            right: right_shape,
        });
    }

    let mut combined = Frame::default();
    core::hconcat2(left, right, &mut combined)?;
    Ok(combined)
}
