pub mod fs;
pub mod mem;
mod record;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::frame::Frame;

/// Logical step number assigned by the runtime; strictly increasing, gaps allowed.
pub type Height = u64;

#[derive(Debug, Error)]
pub enum FrameStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Cbor(#[from] serde_cbor::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("corrupt frame record: {0}")]
    Corrupt(String),
    #[error("frame height {got} does not advance past head {head}")]
    NonMonotonicHeight { head: Height, got: Height },
}

/// Read side of the frame history. This is all a panel ever receives.
///
/// Frames come back as `Arc<Frame>`: shared and immutable. A reader that
/// needs to change something clones first.
pub trait FrameSource: Send + Sync {
    /// Most recently appended frame, the live head.
    fn latest(&self) -> Option<Arc<Frame>>;

    /// Frame with exactly this height, if one was recorded.
    fn at(&self, height: Height) -> Option<Arc<Frame>>;

    /// Whole history, oldest first (position 0 is the oldest frame).
    fn history(&self) -> Vec<Arc<Frame>>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Position of `height` inside `history()`.
    fn position_of(&self, height: Height) -> Option<usize> {
        find_height(&self.history(), height)
    }
}

/// Write side, used only by whatever plays the runtime's role.
pub trait FrameStore: FrameSource {
    /// Appends a sealed frame and returns its height. Rejects heights that do
    /// not advance past the current head.
    fn append(&mut self, frame: Frame) -> Result<Height, FrameStoreError>;
}

/// Binary search over a height-ordered history. Tolerates gaps.
pub(crate) fn find_height(history: &[Arc<Frame>], height: Height) -> Option<usize> {
    history
        .binary_search_by_key(&height, |frame| frame.height)
        .ok()
}

pub(crate) fn check_advances(head: Option<Height>, got: Height) -> Result<(), FrameStoreError> {
    match head {
        Some(head) if got <= head => {
            log::warn!("rejecting frame at height {got}: head is already {head}");
            Err(FrameStoreError::NonMonotonicHeight { head, got })
        }
        _ => Ok(()),
    }
}

/// On-disk record wrapping a frame; shared by the filesystem backend and tests
/// that inspect raw bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DiskRecord {
    height: Height,
    frame: Frame,
}

/// Reads the runtime's JSON export: an array of frames, oldest first.
pub fn load_frames_json(path: impl AsRef<Path>) -> Result<Vec<Frame>, FrameStoreError> {
    let file = File::open(path.as_ref())?;
    let frames: Vec<Frame> = serde_json::from_reader(BufReader::new(file))?;
    Ok(frames)
}
