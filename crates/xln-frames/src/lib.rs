//! Frame history model for the XLN inspection panels: immutable per-step
//! snapshots, their structured logs, and the append-only store they live in.

pub mod amount;
pub mod collection;
pub mod frame;
pub mod logs;
pub mod store;

pub use amount::{Amount, AmountParseError};
pub use collection::KeyedCollection;
pub use frame::{
    AccountState, Frame, GossipProfile, GossipSnapshot, JMachineSnapshot, ReplicaState,
    RuntimeInput, RuntimeOutput,
};
pub use logs::{LogCategory, LogEntry, LogLevel};
pub use store::fs::FsFrameStore;
pub use store::mem::MemFrameStore;
pub use store::{FrameSource, FrameStore, FrameStoreError, Height, load_frames_json};
