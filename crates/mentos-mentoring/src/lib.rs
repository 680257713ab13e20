//! Mentos mentoring lifecycle
//!
//! Models mentoring requests between a mentor and a menti, the status
//! machine they move through, and the engine that enforces it against a
//! pluggable record store.

pub mod engine;
pub mod error;
pub mod mentoring;
pub mod store;

pub use engine::{MentoringEngine, PartyNicknames};
pub use error::{MentoringError, Result, StoreError};
pub use mentoring::{
    MemberId, MentoringAction, MentoringId, MentoringRequest, MentoringStatus, Party,
};
pub use store::{InMemoryRecordStore, RecordStore, StatusUpdate};
