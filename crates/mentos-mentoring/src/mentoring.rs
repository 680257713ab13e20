//! Mentoring request types.
//!
//! This module defines the identifiers, the status machine and the record
//! type for a mentoring relationship between a mentor and a menti.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Identifiers
// ============================================================================

/// Identifier of a registered member (either side of a mentoring).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub i64);

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a mentoring request, assigned by the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MentoringId(pub i64);

impl std::fmt::Display for MentoringId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// MentoringStatus
// ============================================================================

/// Lifecycle status of a mentoring request.
///
/// The status transitions through these states:
/// - `Pending` -> `Accepted` (mentor accepts)
/// - `Pending` -> `Rejected` (mentor rejects)
/// - `Pending` -> `Cancelled` (menti withdraws the request)
/// - `Accepted` -> `Stopped` (either party ends the mentoring)
///
/// `Rejected`, `Cancelled` and `Stopped` are terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MentoringStatus {
    /// Requested by the menti, waiting for the mentor's decision.
    #[default]
    Pending,
    /// Accepted by the mentor; the mentoring is in progress.
    Accepted,
    /// Rejected by the mentor.
    Rejected,
    /// Ended after having been accepted.
    Stopped,
    /// Withdrawn by the menti before a decision was made.
    Cancelled,
}

impl MentoringStatus {
    /// Returns `true` if no further transition is possible from this status.
    ///
    /// # Examples
    ///
    /// ```
    /// use mentos_mentoring::MentoringStatus;
    ///
    /// assert!(MentoringStatus::Stopped.is_terminal());
    /// assert!(!MentoringStatus::Accepted.is_terminal());
    /// ```
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Stopped | Self::Cancelled)
    }

    /// Returns the wire name of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
            Self::Stopped => "STOPPED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for MentoringStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Party and MentoringAction
// ============================================================================

/// Which side of a mentoring may perform an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    /// Only the mentor.
    Mentor,
    /// Only the menti.
    Menti,
    /// Either the mentor or the menti.
    Either,
}

impl std::fmt::Display for Party {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mentor => write!(f, "mentor"),
            Self::Menti => write!(f, "menti"),
            Self::Either => write!(f, "mentor or menti"),
        }
    }
}

/// A state-changing action on an existing mentoring request.
///
/// Each action has exactly one legal source status, one target status and
/// one authorized party:
///
/// | Action   | From       | To          | Party  |
/// |----------|------------|-------------|--------|
/// | `Accept` | `Pending`  | `Accepted`  | mentor |
/// | `Reject` | `Pending`  | `Rejected`  | mentor |
/// | `Stop`   | `Accepted` | `Stopped`   | either |
/// | `Cancel` | `Pending`  | `Cancelled` | menti  |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MentoringAction {
    /// Mentor accepts a pending request.
    Accept,
    /// Mentor rejects a pending request.
    Reject,
    /// A party ends an accepted mentoring.
    Stop,
    /// Menti withdraws a pending request.
    Cancel,
}

impl MentoringAction {
    /// Builds the decision action for an accept flag.
    #[must_use]
    pub const fn decision(accept: bool) -> Self {
        if accept {
            Self::Accept
        } else {
            Self::Reject
        }
    }

    /// The only status this action may be applied from.
    #[must_use]
    pub const fn required_status(&self) -> MentoringStatus {
        match self {
            Self::Accept | Self::Reject | Self::Cancel => MentoringStatus::Pending,
            Self::Stop => MentoringStatus::Accepted,
        }
    }

    /// The status a record holds after this action succeeds.
    #[must_use]
    pub const fn target_status(&self) -> MentoringStatus {
        match self {
            Self::Accept => MentoringStatus::Accepted,
            Self::Reject => MentoringStatus::Rejected,
            Self::Stop => MentoringStatus::Stopped,
            Self::Cancel => MentoringStatus::Cancelled,
        }
    }

    /// The party allowed to perform this action.
    #[must_use]
    pub const fn authorized_party(&self) -> Party {
        match self {
            Self::Accept | Self::Reject => Party::Mentor,
            Self::Stop => Party::Either,
            Self::Cancel => Party::Menti,
        }
    }
}

impl std::fmt::Display for MentoringAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Accept => write!(f, "accept"),
            Self::Reject => write!(f, "reject"),
            Self::Stop => write!(f, "stop"),
            Self::Cancel => write!(f, "cancel"),
        }
    }
}

// ============================================================================
// MentoringRequest
// ============================================================================

/// A mentoring request record as held by the record store.
///
/// Invariant: `mentor_id != menti_id`. Records are never deleted; a
/// cancelled request keeps its row with status `Cancelled`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentoringRequest {
    /// Store-assigned identifier.
    pub id: MentoringId,

    /// The member being asked to mentor.
    pub mentor_id: MemberId,

    /// The member who sent the request.
    pub menti_id: MemberId,

    /// Current lifecycle status.
    pub status: MentoringStatus,

    /// When the request was registered.
    pub created_at: DateTime<Utc>,

    /// When the status last changed.
    pub updated_at: DateTime<Utc>,
}

impl MentoringRequest {
    /// Creates a new `Pending` request with the current timestamp.
    #[must_use]
    pub fn new(id: MentoringId, mentor_id: MemberId, menti_id: MemberId) -> Self {
        let now = Utc::now();
        Self {
            id,
            mentor_id,
            menti_id,
            status: MentoringStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns `true` if `actor` belongs to the given party of this mentoring.
    ///
    /// # Examples
    ///
    /// ```
    /// use mentos_mentoring::{MemberId, MentoringId, MentoringRequest, Party};
    ///
    /// let request = MentoringRequest::new(MentoringId(1), MemberId(10), MemberId(20));
    /// assert!(request.is_party(MemberId(10), Party::Mentor));
    /// assert!(!request.is_party(MemberId(10), Party::Menti));
    /// assert!(request.is_party(MemberId(20), Party::Either));
    /// ```
    #[must_use]
    pub fn is_party(&self, actor: MemberId, party: Party) -> bool {
        match party {
            Party::Mentor => actor == self.mentor_id,
            Party::Menti => actor == self.menti_id,
            Party::Either => actor == self.mentor_id || actor == self.menti_id,
        }
    }

    /// Sets a new status and updates the `updated_at` timestamp.
    pub fn set_status(&mut self, status: MentoringStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}

// ============================================================================
// Tests
// ============================================================================
