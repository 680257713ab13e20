//! Caller identity.
//!
//! Authentication happens in front of this service. The gateway forwards
//! the authenticated member id in a request header, and an
//! [`IdentityProvider`] turns that header into a [`MemberId`]. Handlers get
//! the result through the [`Actor`] extractor and pass it explicitly into
//! every mentoring call.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, HeaderName},
};
use mentos_mentoring::MemberId;

use crate::api::{ApiError, AppState};
use crate::error::ConfigError;

/// Errors resolving the caller's identity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    /// The identity header is absent or empty.
    #[error("Missing '{header}' header")]
    Missing {
        /// Name of the expected header.
        header: String,
    },

    /// The identity header is present but not a positive member id.
    #[error("Header '{header}' does not hold a member id: '{value}'")]
    Invalid {
        /// Name of the header.
        header: String,
        /// The rejected value.
        value: String,
    },
}

/// Resolves the acting member for a request.
pub trait IdentityProvider: Send + Sync + std::fmt::Debug {
    /// Returns the member id of the caller.
    ///
    /// # Errors
    ///
    /// Returns an `IdentityError` if the request carries no usable identity.
    fn current_actor_id(&self, headers: &HeaderMap) -> Result<MemberId, IdentityError>;
}

/// Reads the member id from a header set by a trusted gateway.
#[derive(Debug, Clone)]
pub struct HeaderIdentity {
    header: HeaderName,
}

impl HeaderIdentity {
    /// Creates a provider reading the given header.
    #[must_use]
    pub const fn new(header: HeaderName) -> Self {
        Self { header }
    }

    /// Creates a provider from a header name string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if `name` is not a valid header name.
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        HeaderName::from_bytes(name.as_bytes())
            .map(Self::new)
            .map_err(|e| {
                ConfigError::validation(
                    format!("identityHeader '{name}' is not a valid header name: {e}"),
                    "Use a lowercase token such as x-member-id",
                )
            })
    }
}

impl IdentityProvider for HeaderIdentity {
    fn current_actor_id(&self, headers: &HeaderMap) -> Result<MemberId, IdentityError> {
        let header = self.header.as_str();
        let raw = headers
            .get(&self.header)
            .map(|value| value.to_str().map(str::trim))
            .transpose()
            .map_err(|_| IdentityError::Invalid {
                header: header.to_string(),
                value: "<non-ascii>".to_string(),
            })?
            .filter(|value| !value.is_empty())
            .ok_or_else(|| IdentityError::Missing {
                header: header.to_string(),
            })?;

        match raw.parse::<i64>() {
            Ok(id) if id > 0 => Ok(MemberId(id)),
            _ => Err(IdentityError::Invalid {
                header: header.to_string(),
                value: raw.to_string(),
            }),
        }
    }
}

/// The authenticated caller of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor(pub MemberId);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for Actor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        state
            .identity
            .current_actor_id(&parts.headers)
            .map(Self)
            .map_err(ApiError::Identity)
    }
}
