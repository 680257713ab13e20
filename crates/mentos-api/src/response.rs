//! Response envelope and status table.
//!
//! Every endpoint answers with a [`BaseResponse`]: a success flag, a numeric
//! service code, a message and, on success, a result payload. The service
//! code and the HTTP status for each outcome come from [`ResponseStatus`].

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Every outcome an endpoint can report.
///
/// Codes are grouped by range:
/// - `1000` success
/// - `2xxx` request rejected before any service call
/// - `3xxx` request refused by the mentoring service
/// - `4xxx` backend failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    /// The request succeeded.
    Success,

    /// A parameter or body field is missing or malformed.
    InvalidRequest,
    /// The identity header is absent.
    EmptyIdentity,
    /// The identity header does not hold a member id.
    InvalidIdentity,
    /// The caller named themselves as the mentor.
    SameMentoMenti,

    /// The mentoring service refused a self-referencing operation.
    SelfReference,
    /// The mentoring request does not exist.
    MentoringNotFound,
    /// The member does not exist.
    MemberNotFound,
    /// The caller is not the party allowed to act on the mentoring.
    NotMentoringParty,
    /// The mentoring is not in a status that allows the action.
    InvalidMentoringState,

    /// The record store failed.
    DatabaseError,
    /// The complaint mail could not be built.
    EmailMakeError,
    /// The complaint mail could not be delivered.
    EmailSendError,
}

impl ResponseStatus {
    /// The service code carried in the envelope.
    #[must_use]
    pub const fn code(&self) -> u32 {
        match self {
            Self::Success => 1000,
            Self::InvalidRequest => 2000,
            Self::EmptyIdentity => 2001,
            Self::InvalidIdentity => 2002,
            Self::SameMentoMenti => 2030,
            Self::SelfReference => 3030,
            Self::MentoringNotFound => 3031,
            Self::MemberNotFound => 3032,
            Self::NotMentoringParty => 3033,
            Self::InvalidMentoringState => 3034,
            Self::DatabaseError => 4000,
            Self::EmailMakeError => 4010,
            Self::EmailSendError => 4011,
        }
    }

    /// The HTTP status the response is sent with.
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,
            Self::InvalidRequest | Self::SameMentoMenti => StatusCode::BAD_REQUEST,
            Self::EmptyIdentity | Self::InvalidIdentity => StatusCode::UNAUTHORIZED,
            Self::SelfReference => StatusCode::UNPROCESSABLE_ENTITY,
            Self::MentoringNotFound | Self::MemberNotFound => StatusCode::NOT_FOUND,
            Self::NotMentoringParty => StatusCode::FORBIDDEN,
            Self::InvalidMentoringState => StatusCode::CONFLICT,
            Self::DatabaseError | Self::EmailMakeError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::EmailSendError => StatusCode::BAD_GATEWAY,
        }
    }

    /// The default message for this status.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Success => "Request succeeded.",
            Self::InvalidRequest => "Invalid request.",
            Self::EmptyIdentity => "Member identity is missing.",
            Self::InvalidIdentity => "Member identity is invalid.",
            Self::SameMentoMenti => "Mentor and menti must be different members.",
            Self::SelfReference => "A member cannot mentor themselves.",
            Self::MentoringNotFound => "Mentoring request does not exist.",
            Self::MemberNotFound => "Member does not exist.",
            Self::NotMentoringParty => "Member is not allowed to act on this mentoring.",
            Self::InvalidMentoringState => "Mentoring is not in a state that allows this action.",
            Self::DatabaseError => "Database error.",
            Self::EmailMakeError => "Failed to build the complaint mail.",
            Self::EmailSendError => "Failed to send the complaint mail.",
        }
    }
}

/// Uniform response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseResponse<T> {
    /// `true` only for [`ResponseStatus::Success`].
    pub is_success: bool,
    /// Service code from [`ResponseStatus::code`].
    pub code: u32,
    /// Human-readable description.
    pub message: String,
    /// Payload, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
}

impl<T> BaseResponse<T> {
    /// Wraps a successful result.
    pub fn success(result: T) -> Self {
        let status = ResponseStatus::Success;
        Self {
            is_success: true,
            code: status.code(),
            message: status.message().to_string(),
            result: Some(result),
        }
    }

    /// Builds a failure envelope with a specific message.
    pub fn failure(status: ResponseStatus, message: impl Into<String>) -> Self {
        Self {
            is_success: false,
            code: status.code(),
            message: message.into(),
            result: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    const ALL: [ResponseStatus; 13] = [
        ResponseStatus::Success,
        ResponseStatus::InvalidRequest,
        ResponseStatus::EmptyIdentity,
        ResponseStatus::InvalidIdentity,
        ResponseStatus::SameMentoMenti,
        ResponseStatus::SelfReference,
        ResponseStatus::MentoringNotFound,
        ResponseStatus::MemberNotFound,
        ResponseStatus::NotMentoringParty,
        ResponseStatus::InvalidMentoringState,
        ResponseStatus::DatabaseError,
        ResponseStatus::EmailMakeError,
        ResponseStatus::EmailSendError,
    ];

    #[test]
    fn test_codes_are_unique() {
        let codes: HashSet<u32> = ALL.iter().map(ResponseStatus::code).collect();
        assert_eq!(codes.len(), ALL.len());
    }

    #[test]
    fn test_only_success_is_2xx() {
        for status in ALL {
            assert_eq!(
                status.http_status().is_success(),
                status == ResponseStatus::Success,
                "{status:?}"
            );
        }
    }

    #[test]
    fn test_boundary_and_service_self_reference_differ() {
        assert_ne!(
            ResponseStatus::SameMentoMenti.code(),
            ResponseStatus::SelfReference.code()
        );
    }

    #[test]
    fn test_success_serialization() {
        let json = serde_json::to_string(&BaseResponse::success(7)).unwrap();
        assert_eq!(
            json,
            r#"{"isSuccess":true,"code":1000,"message":"Request succeeded.","result":7}"#
        );
    }

    #[test]
    fn test_failure_omits_result() {
        let response: BaseResponse<()> =
            BaseResponse::failure(ResponseStatus::MentoringNotFound, "Mentoring request 9 not found");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""isSuccess":false"#));
        assert!(json.contains(r#""code":3031"#));
        assert!(!json.contains("result"));
    }
}
