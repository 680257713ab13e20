//! Mentoring lifecycle engine.
//!
//! [`MentoringEngine`] validates every operation against the transition
//! table on [`MentoringAction`] and issues at most one write to the record
//! store per call. The acting member is always passed in explicitly.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use mentos_mentoring::{InMemoryRecordStore, MemberId, MentoringEngine, MentoringStatus};
//!
//! # tokio_test::block_on(async {
//! let engine = MentoringEngine::new(Arc::new(InMemoryRecordStore::new()));
//!
//! let request = engine.create(MemberId(1), MemberId(2)).await.unwrap();
//! let accepted = engine.decide(request.id, MemberId(1), true).await.unwrap();
//! assert_eq!(accepted.status, MentoringStatus::Accepted);
//! # });
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{MentoringError, Result};
use crate::mentoring::{MemberId, MentoringAction, MentoringId, MentoringRequest};
use crate::store::{RecordStore, StatusUpdate};

/// Nicknames of both sides of a prospective mentoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyNicknames {
    /// Nickname of the requested mentor.
    pub mentor_nickname: String,
    /// Nickname of the acting menti.
    pub menti_nickname: String,
}

/// Executes mentoring lifecycle operations against a [`RecordStore`].
#[derive(Debug, Clone)]
pub struct MentoringEngine {
    store: Arc<dyn RecordStore>,
}

impl MentoringEngine {
    /// Creates an engine over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Registers a new `Pending` mentoring request from `menti_id` to `mentor_id`.
    ///
    /// # Errors
    ///
    /// Returns `MentoringError::SelfReference` if both ids are the same member;
    /// nothing is written in that case.
    pub async fn create(&self, mentor_id: MemberId, menti_id: MemberId) -> Result<MentoringRequest> {
        if mentor_id == menti_id {
            warn!(member = %mentor_id, "Refusing self-referencing mentoring request");
            return Err(MentoringError::self_reference(mentor_id));
        }

        let request = self.store.create(mentor_id, menti_id).await?;
        info!(
            mentoring_id = %request.id,
            mentor = %mentor_id,
            menti = %menti_id,
            "Mentoring request registered"
        );
        Ok(request)
    }

    /// Accepts (`accept == true`) or rejects a pending request as its mentor.
    ///
    /// # Errors
    ///
    /// `MentoringNotFound`, `Unauthorized` if `actor` is not the mentor, or
    /// `InvalidState` if the request is no longer pending.
    pub async fn decide(
        &self,
        id: MentoringId,
        actor: MemberId,
        accept: bool,
    ) -> Result<MentoringRequest> {
        self.transition(id, actor, MentoringAction::decision(accept))
            .await
    }

    /// Ends an accepted mentoring.
    ///
    /// # Errors
    ///
    /// `MentoringNotFound`, `Unauthorized` if `actor` is neither party, or
    /// `InvalidState` if the mentoring is not currently accepted.
    pub async fn stop(&self, id: MentoringId, actor: MemberId) -> Result<MentoringRequest> {
        self.transition(id, actor, MentoringAction::Stop).await
    }

    /// Withdraws a pending request as its menti.
    ///
    /// The record is kept with status `Cancelled`.
    ///
    /// # Errors
    ///
    /// `MentoringNotFound`, `Unauthorized` if `actor` is not the menti, or
    /// `InvalidState` if the request is no longer pending.
    pub async fn cancel(&self, id: MentoringId, actor: MemberId) -> Result<MentoringRequest> {
        self.transition(id, actor, MentoringAction::Cancel).await
    }

    /// Looks up the nickname of `mentor_id` on behalf of `actor`.
    ///
    /// # Errors
    ///
    /// `SelfReference` if `actor` is `mentor_id`, `MemberNotFound` if the
    /// mentor has no registered nickname.
    pub async fn counterpart_nickname(&self, mentor_id: MemberId, actor: MemberId) -> Result<String> {
        if mentor_id == actor {
            return Err(MentoringError::self_reference(actor));
        }
        self.nickname_of(mentor_id).await
    }

    /// Looks up the nicknames of `mentor_id` and of `actor` as the menti.
    ///
    /// # Errors
    ///
    /// Same as [`Self::counterpart_nickname`], plus `MemberNotFound` for the actor.
    pub async fn party_nicknames(
        &self,
        mentor_id: MemberId,
        actor: MemberId,
    ) -> Result<PartyNicknames> {
        let mentor_nickname = self.counterpart_nickname(mentor_id, actor).await?;
        let menti_nickname = self.nickname_of(actor).await?;
        Ok(PartyNicknames {
            mentor_nickname,
            menti_nickname,
        })
    }

    async fn nickname_of(&self, member: MemberId) -> Result<String> {
        self.store
            .nickname(member)
            .await?
            .ok_or(MentoringError::member_not_found(member))
    }

    /// Applies `action` to `id` after the existence, party and status checks.
    ///
    /// The final status check is the store's compare-and-swap, so a request
    /// raced by another caller between the read and the write is reported as
    /// `InvalidState` with the status the winner left behind.
    async fn transition(
        &self,
        id: MentoringId,
        actor: MemberId,
        action: MentoringAction,
    ) -> Result<MentoringRequest> {
        let record = self
            .store
            .get(id)
            .await?
            .ok_or(MentoringError::mentoring_not_found(id))?;

        if !record.is_party(actor, action.authorized_party()) {
            warn!(
                mentoring_id = %id,
                actor = %actor,
                action = %action,
                "Member is not allowed to perform mentoring action"
            );
            return Err(MentoringError::unauthorized(id, actor, action));
        }

        let expected = action.required_status();
        if record.status != expected {
            debug!(mentoring_id = %id, current = %record.status, action = %action, "Illegal transition");
            return Err(MentoringError::invalid_state(id, action, record.status));
        }

        match self
            .store
            .update_status(id, expected, action.target_status())
            .await?
        {
            StatusUpdate::Updated(updated) => {
                info!(
                    mentoring_id = %id,
                    actor = %actor,
                    action = %action,
                    status = %updated.status,
                    "Mentoring status changed"
                );
                Ok(updated)
            }
            StatusUpdate::Conflict(current) => {
                warn!(mentoring_id = %id, current = %current, action = %action, "Lost status race");
                Err(MentoringError::invalid_state(id, action, current))
            }
            StatusUpdate::Missing => Err(MentoringError::mentoring_not_found(id)),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
