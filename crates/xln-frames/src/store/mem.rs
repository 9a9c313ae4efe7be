use std::sync::{Arc, RwLock};

use super::{FrameSource, FrameStore, FrameStoreError, Height, check_advances, find_height};
use crate::frame::Frame;

/// In-memory frame history. Clones share the same history, so a runtime
/// handle can append while panels hold read handles.
#[derive(Debug, Default, Clone)]
pub struct MemFrameStore {
    frames: Arc<RwLock<Vec<Arc<Frame>>>>,
}

impl MemFrameStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_frames(frames: Vec<Frame>) -> Result<Self, FrameStoreError> {
        let mut store = Self::new();
        for frame in frames {
            store.append(frame)?;
        }
        Ok(store)
    }
}

impl FrameSource for MemFrameStore {
    fn latest(&self) -> Option<Arc<Frame>> {
        self.frames.read().unwrap().last().cloned()
    }

    fn at(&self, height: Height) -> Option<Arc<Frame>> {
        let guard = self.frames.read().unwrap();
        find_height(&guard, height).map(|idx| guard[idx].clone())
    }

    fn history(&self) -> Vec<Arc<Frame>> {
        self.frames.read().unwrap().clone()
    }

    fn len(&self) -> usize {
        self.frames.read().unwrap().len()
    }

    fn position_of(&self, height: Height) -> Option<usize> {
        find_height(&self.frames.read().unwrap(), height)
    }
}

impl FrameStore for MemFrameStore {
    fn append(&mut self, frame: Frame) -> Result<Height, FrameStoreError> {
        let mut guard = self.frames.write().unwrap();
        check_advances(guard.last().map(|f| f.height), frame.height)?;
        let height = frame.height;
        guard.push(Arc::new(frame));
        log::debug!("appended frame {height} ({} total)", guard.len());
        Ok(height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_and_read_back() {
        let mut store = MemFrameStore::new();
        assert!(store.latest().is_none());
        store.append(Frame::new(1, 10)).unwrap();
        store.append(Frame::new(4, 20)).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.latest().unwrap().height, 4);
        assert_eq!(store.at(1).unwrap().timestamp, 10);
        assert!(store.at(2).is_none());
        assert_eq!(store.position_of(4), Some(1));
    }

    #[test]
    fn rejects_non_advancing_height() {
        let mut store = MemFrameStore::new();
        store.append(Frame::new(3, 0)).unwrap();
        let err = store.append(Frame::new(3, 0)).unwrap_err();
        assert!(matches!(
            err,
            FrameStoreError::NonMonotonicHeight { head: 3, got: 3 }
        ));
        assert!(store.append(Frame::new(2, 0)).is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn readers_share_history_with_writer() {
        let mut writer = MemFrameStore::new();
        let reader = writer.clone();
        writer.append(Frame::new(1, 0)).unwrap();
        let seen = reader.latest().unwrap();
        writer.append(Frame::new(2, 0)).unwrap();
        // The handle taken earlier still points at the frame it saw.
        assert_eq!(seen.height, 1);
        assert_eq!(reader.latest().unwrap().height, 2);
    }
}
