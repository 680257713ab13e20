//! Mentoring record storage.
//!
//! [`RecordStore`] is the seam between the lifecycle engine and whatever
//! persists mentoring requests. Implementations must make
//! [`RecordStore::update_status`] an atomic compare-and-swap on the current
//! status: of two racing updates from the same status, exactly one wins.
//!
//! [`InMemoryRecordStore`] is the bundled implementation, backed by a
//! `tokio::sync::Mutex`.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::StoreError;
use crate::mentoring::{MemberId, MentoringId, MentoringRequest, MentoringStatus};

/// Outcome of a compare-and-swap status update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusUpdate {
    /// The record held the expected status and now holds the new one.
    Updated(MentoringRequest),
    /// The record held a different status; nothing was written.
    Conflict(MentoringStatus),
    /// No record exists with this identifier.
    Missing,
}

/// Persistence for mentoring requests and member nicknames.
#[async_trait]
pub trait RecordStore: Send + Sync + std::fmt::Debug {
    /// Inserts a new `Pending` request and returns it with its assigned id.
    async fn create(
        &self,
        mentor_id: MemberId,
        menti_id: MemberId,
    ) -> Result<MentoringRequest, StoreError>;

    /// Fetches a request by id.
    async fn get(&self, id: MentoringId) -> Result<Option<MentoringRequest>, StoreError>;

    /// Sets the status of `id` to `next` only if it currently holds `expected`.
    async fn update_status(
        &self,
        id: MentoringId,
        expected: MentoringStatus,
        next: MentoringStatus,
    ) -> Result<StatusUpdate, StoreError>;

    /// Fetches the nickname of a member.
    async fn nickname(&self, member: MemberId) -> Result<Option<String>, StoreError>;
}

// ============================================================================
// InMemoryRecordStore
// ============================================================================

#[derive(Debug, Default)]
struct Tables {
    next_id: i64,
    mentorings: HashMap<MentoringId, MentoringRequest>,
    nicknames: HashMap<MemberId, String>,
}

/// Process-local record store.
///
/// All tables live behind a single mutex, so every operation, including the
/// status compare-and-swap, observes and mutates a consistent snapshot.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    tables: Mutex<Tables>,
}

impl InMemoryRecordStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with the given member nicknames registered.
    ///
    /// # Examples
    ///
    /// ```
    /// use mentos_mentoring::{InMemoryRecordStore, MemberId};
    ///
    /// let store = InMemoryRecordStore::with_members([
    ///     (MemberId(1), "alice".to_string()),
    ///     (MemberId(2), "bob".to_string()),
    /// ]);
    /// ```
    #[must_use]
    pub fn with_members(members: impl IntoIterator<Item = (MemberId, String)>) -> Self {
        let tables = Tables {
            nicknames: members.into_iter().collect(),
            ..Tables::default()
        };
        Self {
            tables: Mutex::new(tables),
        }
    }

    /// Registers or renames a member.
    pub async fn register_member(&self, member: MemberId, nickname: impl Into<String>) {
        self.tables
            .lock()
            .await
            .nicknames
            .insert(member, nickname.into());
    }

    /// Returns the number of stored mentoring requests.
    pub async fn len(&self) -> usize {
        self.tables.lock().await.mentorings.len()
    }

    /// Returns `true` if no mentoring request has been stored.
    pub async fn is_empty(&self) -> bool {
        self.tables.lock().await.mentorings.is_empty()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn create(
        &self,
        mentor_id: MemberId,
        menti_id: MemberId,
    ) -> Result<MentoringRequest, StoreError> {
        let mut tables = self.tables.lock().await;
        let id = tables
            .next_id
            .checked_add(1)
            .ok_or(StoreError::IdExhausted)?;
        tables.next_id = id;

        let request = MentoringRequest::new(MentoringId(id), mentor_id, menti_id);
        tables.mentorings.insert(request.id, request.clone());
        debug!(mentoring_id = %request.id, "Stored mentoring request");
        Ok(request)
    }

    async fn get(&self, id: MentoringId) -> Result<Option<MentoringRequest>, StoreError> {
        Ok(self.tables.lock().await.mentorings.get(&id).cloned())
    }

    async fn update_status(
        &self,
        id: MentoringId,
        expected: MentoringStatus,
        next: MentoringStatus,
    ) -> Result<StatusUpdate, StoreError> {
        let mut tables = self.tables.lock().await;
        let Some(record) = tables.mentorings.get_mut(&id) else {
            return Ok(StatusUpdate::Missing);
        };

        if record.status != expected {
            return Ok(StatusUpdate::Conflict(record.status));
        }

        record.set_status(next);
        Ok(StatusUpdate::Updated(record.clone()))
    }

    async fn nickname(&self, member: MemberId) -> Result<Option<String>, StoreError> {
        Ok(self.tables.lock().await.nicknames.get(&member).cloned())
    }
}

// ============================================================================
// Tests
// ============================================================================
