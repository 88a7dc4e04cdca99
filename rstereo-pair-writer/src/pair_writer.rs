//! On-disk layout of saved stereo pairs.
//!
//! Pair `n` is stored as `<left_dir>/left_<n>.<ext>` and
//! `<right_dir>/right_<n>.<ext>`, encoded by OpenCV from the extension.

use std::path::{Path, PathBuf};

use opencv::{core::Vector, imgcodecs};
use rstereo_core::Frame;

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("failed to create directory '{}': {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("path '{}' is not valid UTF-8", .0.display())]
    NonUtf8Path(PathBuf),
    #[error("failed to encode '{}': {source}", path.display())]
    Encode {
        path: PathBuf,
        source: opencv::Error,
    },
    #[error("image writer refused '{}'", .0.display())]
    Rejected(PathBuf),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PairLayout {
    left_dir: PathBuf,
    right_dir: PathBuf,
    extension: String,
}

impl PairLayout {
    pub fn new(
        left_dir: impl Into<PathBuf>,
        right_dir: impl Into<PathBuf>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            left_dir: left_dir.into(),
            right_dir: right_dir.into(),
            extension: extension.into(),
        }
    }

    pub fn left_dir(&self) -> &Path {
        &self.left_dir
    }

    pub fn right_dir(&self) -> &Path {
        &self.right_dir
    }

    pub fn left_path(&self, index: u64) -> PathBuf {
        self.left_dir.join(format!("left_{index}.{}", self.extension))
    }

    pub fn right_path(&self, index: u64) -> PathBuf {
        self.right_dir.join(format!("right_{index}.{}", self.extension))
    }

    /// Same layout rooted below `base`.
    pub fn rooted_at(&self, base: &Path) -> Self {
        Self {
            left_dir: base.join(&self.left_dir),
            right_dir: base.join(&self.right_dir),
            extension: self.extension.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavedPair {
    pub left: PathBuf,
    pub right: PathBuf,
}

pub struct PairWriter {
    layout: PairLayout,
}

impl PairWriter {
    /// Creates both output directories if they are missing.
    pub fn create(layout: PairLayout) -> Result<Self, SaveError> {
        for dir in [layout.left_dir(), layout.right_dir()] {
            std::fs::create_dir_all(dir).map_err(|source| SaveError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        log::debug!(
            "writing pairs to {} and {}",
            layout.left_dir().display(),
            layout.right_dir().display()
        );
        Ok(Self { layout })
    }

    pub fn layout(&self) -> &PairLayout {
        &self.layout
    }

    /// Writes the left frame, then the right frame, as pair `index`.
    ///
    /// The left file may already be on disk when writing the right one fails.
    /// A later call with the same index overwrites it.
    pub fn write_pair(
        &self,
        index: u64,
        left: &Frame,
        right: &Frame,
    ) -> Result<SavedPair, SaveError> {
        let left_path = self.layout.left_path(index);
        let right_path = self.layout.right_path(index);
        write_image(&left_path, left)?;
        write_image(&right_path, right)?;
        Ok(SavedPair {
            left: left_path,
            right: right_path,
        })
    }
}

fn write_image(path: &Path, frame: &Frame) -> Result<(), SaveError> {
    let name = path
        .to_str()
        .ok_or_else(|| SaveError::NonUtf8Path(path.to_path_buf()))?;
    let written = imgcodecs::imwrite(name, frame, &Vector::<i32>::new()).map_err(|source| {
        SaveError::Encode {
            path: path.to_path_buf(),
            source,
        }
    })?;
    if !written {
        return Err(SaveError::Rejected(path.to_path_buf()));
    }
    Ok(())
}
