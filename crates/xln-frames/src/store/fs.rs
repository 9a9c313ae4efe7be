use std::fs::{self, File, OpenOptions};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::record::{RecordReader, write_record};
use super::{
    DiskRecord, FrameSource, FrameStore, FrameStoreError, Height, check_advances, find_height,
};
use crate::frame::Frame;

const FRAMES_DIR: &str = "frames";
const FRAMES_FILE: &str = "frames.log";

/// Filesystem-backed frame history: length-prefixed CBOR records appended to
/// `<root>/frames/frames.log`. The whole log is decoded once at open and kept
/// in memory for reads.
#[derive(Debug)]
pub struct FsFrameStore {
    path: PathBuf,
    frames: Vec<Arc<Frame>>,
}

impl FsFrameStore {
    pub fn open(root: impl AsRef<Path>) -> Result<Self, FrameStoreError> {
        let frames_dir = root.as_ref().join(FRAMES_DIR);
        fs::create_dir_all(&frames_dir)?;
        let path = frames_dir.join(FRAMES_FILE);
        if !path.exists() {
            File::create(&path)?;
        }
        let frames = read_all_records(&path)?;
        Ok(Self { path, frames })
    }

    /// Opens read-only without creating anything; a missing log is an empty history.
    pub fn open_existing(root: impl AsRef<Path>) -> Result<Self, FrameStoreError> {
        let path = root.as_ref().join(FRAMES_DIR).join(FRAMES_FILE);
        let frames = if path.exists() {
            read_all_records(&path)?
        } else {
            Vec::new()
        };
        Ok(Self { path, frames })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FrameSource for FsFrameStore {
    fn latest(&self) -> Option<Arc<Frame>> {
        self.frames.last().cloned()
    }

    fn at(&self, height: Height) -> Option<Arc<Frame>> {
        find_height(&self.frames, height).map(|idx| self.frames[idx].clone())
    }

    fn history(&self) -> Vec<Arc<Frame>> {
        self.frames.clone()
    }

    fn len(&self) -> usize {
        self.frames.len()
    }

    fn position_of(&self, height: Height) -> Option<usize> {
        find_height(&self.frames, height)
    }
}

impl FrameStore for FsFrameStore {
    fn append(&mut self, frame: Frame) -> Result<Height, FrameStoreError> {
        check_advances(self.frames.last().map(|f| f.height), frame.height)?;
        let record = DiskRecord {
            height: frame.height,
            frame,
        };
        let bytes = serde_cbor::to_vec(&record)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        write_record(&mut file, &bytes)?;
        file.sync_all()?;

        let height = record.height;
        self.frames.push(Arc::new(record.frame));
        log::debug!("persisted frame {height} to {}", self.path.display());
        Ok(height)
    }
}

/// Decodes the whole log, checking that heights agree and strictly increase.
fn read_all_records(path: &Path) -> Result<Vec<Arc<Frame>>, FrameStoreError> {
    let mut reader = RecordReader::new(BufReader::new(File::open(path)?));
    let mut frames: Vec<Arc<Frame>> = Vec::new();
    while let Some(payload) = reader.next_record()? {
        let DiskRecord { height, frame } = serde_cbor::from_slice(&payload)?;
        if height != frame.height {
            return Err(FrameStoreError::Corrupt(format!(
                "record height {height} disagrees with frame height {}",
                frame.height
            )));
        }
        if let Some(prev) = frames.last().filter(|prev| height <= prev.height) {
            return Err(FrameStoreError::Corrupt(format!(
                "height {height} follows {}",
                prev.height
            )));
        }
        frames.push(Arc::new(frame));
    }
    Ok(frames)
}
