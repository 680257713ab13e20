//! Error types for the mentoring lifecycle.
//!
//! [`MentoringError`] covers every way a lifecycle operation can be refused.
//! [`StoreError`] is what a record store reports when its backend fails;
//! it is carried through unchanged inside [`MentoringError::Store`].

use crate::mentoring::{MemberId, MentoringAction, MentoringId, MentoringStatus, Party};

/// A specialized `Result` type for mentoring operations.
pub type Result<T> = std::result::Result<T, MentoringError>;

/// Errors that can occur while executing a mentoring operation.
#[derive(Debug, thiserror::Error)]
pub enum MentoringError {
    // ========================================================================
    // Precondition Errors
    // ========================================================================
    /// The acting member targeted themselves as the counterpart.
    #[error("Member {member} cannot be both mentor and menti")]
    SelfReference {
        /// The member on both sides.
        member: MemberId,
    },

    // ========================================================================
    // Lookup Errors
    // ========================================================================
    /// No mentoring request exists with this identifier.
    #[error("Mentoring request {id} not found")]
    MentoringNotFound {
        /// The unknown identifier.
        id: MentoringId,
    },

    /// No nickname is registered for this member.
    #[error("Member {id} not found")]
    MemberNotFound {
        /// The unknown member.
        id: MemberId,
    },

    // ========================================================================
    // Transition Errors
    // ========================================================================
    /// The acting member is not the party allowed to perform the action.
    #[error("Member {actor} is not allowed to {action} mentoring {id}: only the {party} may")]
    Unauthorized {
        /// The mentoring request acted on.
        id: MentoringId,
        /// The acting member.
        actor: MemberId,
        /// The attempted action.
        action: MentoringAction,
        /// The party the action is reserved for.
        party: Party,
    },

    /// The action is not legal from the record's current status.
    #[error("Cannot {action} mentoring {id}: status is {current}, expected {expected}")]
    InvalidState {
        /// The mentoring request acted on.
        id: MentoringId,
        /// The attempted action.
        action: MentoringAction,
        /// The status observed at the time of the write.
        current: MentoringStatus,
        /// The status the action requires.
        expected: MentoringStatus,
    },

    // ========================================================================
    // Backend Errors
    // ========================================================================
    /// The record store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl MentoringError {
    /// Creates a new `SelfReference` error.
    #[must_use]
    pub const fn self_reference(member: MemberId) -> Self {
        Self::SelfReference { member }
    }

    /// Creates a new `MentoringNotFound` error.
    #[must_use]
    pub const fn mentoring_not_found(id: MentoringId) -> Self {
        Self::MentoringNotFound { id }
    }

    /// Creates a new `MemberNotFound` error.
    #[must_use]
    pub const fn member_not_found(id: MemberId) -> Self {
        Self::MemberNotFound { id }
    }

    /// Creates a new `Unauthorized` error for `action`.
    #[must_use]
    pub const fn unauthorized(id: MentoringId, actor: MemberId, action: MentoringAction) -> Self {
        Self::Unauthorized {
            id,
            actor,
            action,
            party: action.authorized_party(),
        }
    }

    /// Creates a new `InvalidState` error for `action`.
    #[must_use]
    pub const fn invalid_state(
        id: MentoringId,
        action: MentoringAction,
        current: MentoringStatus,
    ) -> Self {
        Self::InvalidState {
            id,
            action,
            current,
            expected: action.required_status(),
        }
    }

    /// Returns `true` if the error was caused by the caller rather than the backend.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}

/// Errors reported by a record store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend could not be reached or refused the operation.
    #[error("Record store unavailable: {0}")]
    Unavailable(String),

    /// The backend ran out of identifiers.
    #[error("Record store exhausted its identifier space")]
    IdExhausted,
}
