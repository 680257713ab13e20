//! HTTP API endpoints for the Mentos service.
//!
//! # Endpoints
//!
//! - `POST /mentoring/registration` - Request mentoring from a mentor
//! - `PATCH /mentoring/acceptance` - Accept or reject a request (mentor)
//! - `PATCH /mentoring/stop` - End an accepted mentoring (either party)
//! - `DELETE /mentoring/cancel` - Withdraw a pending request (menti)
//! - `GET /mentoring/registration/nickname` - Nicknames of mentor and caller
//! - `POST /complaint` - Report a post, profile or chat
//! - `GET /health` - Liveness probe
//!
//! Every endpoint except `/health` requires the identity header configured
//! in [`Config::identity_header`].
//!
//! # Example
//!
//! ```no_run
//! use mentos_api::{create_router, AppState, Config};
//!
//! # async fn example() {
//! let state = AppState::new(Config::default()).unwrap();
//! let router = create_router(state);
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await.unwrap();
//! axum::serve(listener, router).await.unwrap();
//! # }
//! ```

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Json, Router,
};
use mentos_complaint::{
    ComplaintCategory, ComplaintError, ComplaintReport, MailMessage, MailSender,
    TracingMailSender,
};
use mentos_mentoring::{
    InMemoryRecordStore, MemberId, MentoringEngine, MentoringError, MentoringId, MentoringStatus,
    RecordStore,
};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use crate::error::ConfigError;
use crate::identity::{Actor, HeaderIdentity, IdentityError, IdentityProvider};
use crate::response::{BaseResponse, ResponseStatus};
use crate::Config;

/// Confirmation text returned when a request is cancelled.
pub const CANCEL_CONFIRMATION: &str = "Mentoring request cancelled.";

// ============================================================================
// Request/Response Types
// ============================================================================

/// Body of `POST /mentoring/registration`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMentoringRequest {
    /// The member asked to be the mentor.
    pub mento_id: i64,
}

/// Result of `POST /mentoring/registration`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMentoringResponse {
    /// Identifier of the new request.
    pub mentoring_id: MentoringId,
    /// The requested mentor.
    pub mento_id: MemberId,
    /// The caller, as menti.
    pub menti_id: MemberId,
}

/// Query of `PATCH /mentoring/acceptance`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionParams {
    /// The request to decide.
    pub mentoring_id: i64,
    /// `true` to accept, `false` to reject.
    pub accept: bool,
}

/// Query of `PATCH /mentoring/stop` and `DELETE /mentoring/cancel`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentoringParams {
    /// The request to act on.
    pub mentoring_id: i64,
}

/// Result of the accept and stop endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentoringStatusResponse {
    /// The request acted on.
    pub mentoring_id: MentoringId,
    /// Its status after the action.
    pub status: MentoringStatus,
}

/// Query of `GET /mentoring/registration/nickname`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NicknameParams {
    /// The prospective mentor.
    pub mento_id: i64,
}

/// Result of `GET /mentoring/registration/nickname`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NicknameResponse {
    /// Nickname of the prospective mentor.
    pub mento_nickname: String,
    /// Nickname of the caller.
    pub menti_nickname: String,
}

/// Body of `POST /complaint`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplaintRequest {
    /// Category flag: `1` post, `2` profile, anything else chat.
    pub flag: i32,
    /// Reported member id or post number.
    pub number: i64,
    /// What happened.
    pub text: String,
}

/// Result of `POST /complaint`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintResponse {
    /// Category the flag mapped to.
    pub category: ComplaintCategory,
    /// The mail body handed to the mail sender.
    pub mail_text: String,
}

// ============================================================================
// Input Validation
// ============================================================================

fn positive(field: &str, value: i64) -> Result<(), ApiError> {
    if value > 0 {
        Ok(())
    } else {
        Err(ApiError::Validation(format!(
            "{field} must be a positive id, got {value}"
        )))
    }
}

impl CreateMentoringRequest {
    fn validate(&self) -> Result<MemberId, ApiError> {
        positive("mentoId", self.mento_id)?;
        Ok(MemberId(self.mento_id))
    }
}

impl MentoringParams {
    fn validate(&self) -> Result<MentoringId, ApiError> {
        positive("mentoringId", self.mentoring_id)?;
        Ok(MentoringId(self.mentoring_id))
    }
}

impl DecisionParams {
    fn validate(&self) -> Result<MentoringId, ApiError> {
        positive("mentoringId", self.mentoring_id)?;
        Ok(MentoringId(self.mentoring_id))
    }
}

impl NicknameParams {
    fn validate(&self) -> Result<MemberId, ApiError> {
        positive("mentoId", self.mento_id)?;
        Ok(MemberId(self.mento_id))
    }
}

impl ComplaintRequest {
    fn validate(self) -> Result<ComplaintReport, ApiError> {
        if self.text.trim().is_empty() {
            return Err(ApiError::Validation("text must not be empty".to_string()));
        }
        Ok(ComplaintReport::new(self.flag, self.number, self.text))
    }
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::Validation(rejection.body_text()))
}

fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    params
        .map(|Query(params)| params)
        .map_err(|rejection| ApiError::Validation(rejection.body_text()))
}

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for the HTTP server.
///
/// Holds the configuration and the three collaborators every handler needs.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Configuration for the service.
    pub config: Config,
    /// Mentoring lifecycle engine over the record store.
    pub engine: MentoringEngine,
    /// Resolves the acting member of each request.
    pub identity: Arc<dyn IdentityProvider>,
    /// Delivers complaint mails.
    pub mailer: Arc<dyn MailSender>,
}

impl AppState {
    /// Creates a state backed by an in-memory store seeded from
    /// `config.members`, header-based identity and a logging mail sender.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the identity header is invalid.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let identity = HeaderIdentity::from_name(&config.identity_header)?;
        let store = InMemoryRecordStore::with_members(
            config
                .members
                .iter()
                .map(|member| (MemberId(member.id), member.nickname.clone())),
        );
        Ok(Self::with_components(
            config,
            Arc::new(store),
            Arc::new(identity),
            Arc::new(TracingMailSender::new()),
        ))
    }

    /// Creates a state from explicit collaborators.
    #[must_use]
    pub fn with_components(
        config: Config,
        store: Arc<dyn RecordStore>,
        identity: Arc<dyn IdentityProvider>,
        mailer: Arc<dyn MailSender>,
    ) -> Self {
        Self {
            config,
            engine: MentoringEngine::new(store),
            identity,
            mailer,
        }
    }
}

// ============================================================================
// API Error Type
// ============================================================================

/// Every way a request can fail, as seen by the HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed parameters or body; carries the first violation found.
    #[error("{0}")]
    Validation(String),

    /// The caller's identity could not be resolved.
    #[error(transparent)]
    Identity(IdentityError),

    /// The caller named themselves as the mentor.
    #[error("Member {0} cannot be both mentor and menti")]
    SameParty(MemberId),

    /// The mentoring engine refused the operation.
    #[error(transparent)]
    Mentoring(#[from] MentoringError),

    /// The complaint mail could not be built or sent.
    #[error(transparent)]
    Complaint(#[from] ComplaintError),
}

impl ApiError {
    /// Maps this error to its response status.
    #[must_use]
    pub const fn status(&self) -> ResponseStatus {
        match self {
            Self::Validation(_) => ResponseStatus::InvalidRequest,
            Self::Identity(IdentityError::Missing { .. }) => ResponseStatus::EmptyIdentity,
            Self::Identity(IdentityError::Invalid { .. }) => ResponseStatus::InvalidIdentity,
            Self::SameParty(_) => ResponseStatus::SameMentoMenti,
            Self::Mentoring(err) => match err {
                MentoringError::SelfReference { .. } => ResponseStatus::SelfReference,
                MentoringError::MentoringNotFound { .. } => ResponseStatus::MentoringNotFound,
                MentoringError::MemberNotFound { .. } => ResponseStatus::MemberNotFound,
                MentoringError::Unauthorized { .. } => ResponseStatus::NotMentoringParty,
                MentoringError::InvalidState { .. } => ResponseStatus::InvalidMentoringState,
                MentoringError::Store(_) => ResponseStatus::DatabaseError,
            },
            Self::Complaint(ComplaintError::Format(_)) => ResponseStatus::EmailMakeError,
            Self::Complaint(ComplaintError::Delivery { .. }) => ResponseStatus::EmailSendError,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Backend details stay in the log; clients get the table message.
        let message = if status.http_status().is_server_error() {
            error!(code = status.code(), error = %self, "Request failed");
            status.message().to_string()
        } else {
            warn!(code = status.code(), error = %self, "Request rejected");
            self.to_string()
        };

        let body = Json(BaseResponse::<()>::failure(status, message));
        (status.http_status(), body).into_response()
    }
}

// ============================================================================
// Router Setup
// ============================================================================

/// Creates the HTTP router with all API endpoints.
///
/// The router carries:
/// - The mentoring routes under `/mentoring`
/// - `/complaint` and `/health`
/// - CORS middleware allowing any origin
/// - Tracing middleware for request logging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mentoring_routes = Router::new()
        .route("/registration", post(handle_create_mentoring))
        .route("/registration/nickname", get(handle_get_nickname))
        .route("/acceptance", patch(handle_decide_mentoring))
        .route("/stop", patch(handle_stop_mentoring))
        .route("/cancel", delete(handle_cancel_mentoring));

    Router::new()
        .nest("/mentoring", mentoring_routes)
        .route("/complaint", post(handle_complaint))
        .route("/health", get(handle_health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

// ============================================================================
// Handlers
// ============================================================================

type ApiResult<T> = Result<Json<BaseResponse<T>>, ApiError>;

/// Handler for `POST /mentoring/registration`.
///
/// The caller becomes the menti of the new request.
async fn handle_create_mentoring(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
    payload: Result<Json<CreateMentoringRequest>, JsonRejection>,
) -> ApiResult<CreateMentoringResponse> {
    let mentor = json_body(payload)?.validate()?;
    info!(actor = %actor, mentor = %mentor, "Received mentoring request");

    if mentor == actor {
        return Err(ApiError::SameParty(actor));
    }

    let request = state.engine.create(mentor, actor).await?;

    Ok(Json(BaseResponse::success(CreateMentoringResponse {
        mentoring_id: request.id,
        mento_id: request.mentor_id,
        menti_id: request.menti_id,
    })))
}

/// Handler for `PATCH /mentoring/acceptance`.
async fn handle_decide_mentoring(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
    params: Result<Query<DecisionParams>, QueryRejection>,
) -> ApiResult<MentoringStatusResponse> {
    let params = query_params(params)?;
    let id = params.validate()?;
    info!(actor = %actor, mentoring_id = %id, accept = params.accept, "Received mentoring decision");

    let request = state.engine.decide(id, actor, params.accept).await?;

    Ok(Json(BaseResponse::success(MentoringStatusResponse {
        mentoring_id: request.id,
        status: request.status,
    })))
}

/// Handler for `PATCH /mentoring/stop`.
async fn handle_stop_mentoring(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
    params: Result<Query<MentoringParams>, QueryRejection>,
) -> ApiResult<MentoringStatusResponse> {
    let id = query_params(params)?.validate()?;
    info!(actor = %actor, mentoring_id = %id, "Stop request received");

    let request = state.engine.stop(id, actor).await?;

    Ok(Json(BaseResponse::success(MentoringStatusResponse {
        mentoring_id: request.id,
        status: request.status,
    })))
}

/// Handler for `DELETE /mentoring/cancel`.
async fn handle_cancel_mentoring(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
    params: Result<Query<MentoringParams>, QueryRejection>,
) -> ApiResult<String> {
    let id = query_params(params)?.validate()?;
    info!(actor = %actor, mentoring_id = %id, "Cancel request received");

    state.engine.cancel(id, actor).await?;

    Ok(Json(BaseResponse::success(CANCEL_CONFIRMATION.to_string())))
}

/// Handler for `GET /mentoring/registration/nickname`.
async fn handle_get_nickname(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
    params: Result<Query<NicknameParams>, QueryRejection>,
) -> ApiResult<NicknameResponse> {
    let mentor = query_params(params)?.validate()?;

    if mentor == actor {
        return Err(ApiError::SameParty(actor));
    }

    let nicknames = state.engine.party_nicknames(mentor, actor).await?;

    Ok(Json(BaseResponse::success(NicknameResponse {
        mento_nickname: nicknames.mentor_nickname,
        menti_nickname: nicknames.menti_nickname,
    })))
}

/// Handler for `POST /complaint`.
///
/// Formats the complaint mail and hands it to the mail sender.
async fn handle_complaint(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
    payload: Result<Json<ComplaintRequest>, JsonRejection>,
) -> ApiResult<ComplaintResponse> {
    let report = json_body(payload)?.validate()?;
    info!(
        actor = %actor,
        category = %report.category(),
        target = report.number,
        "Complaint received"
    );

    let message = MailMessage::complaint(&state.config.complaint_recipient, actor.0, &report)?;
    let mail_text = message.body.clone();
    state.mailer.send(message).await?;

    Ok(Json(BaseResponse::success(ComplaintResponse {
        category: report.category(),
        mail_text,
    })))
}

/// Handler for `GET /health`.
async fn handle_health() -> Json<BaseResponse<&'static str>> {
    Json(BaseResponse::success("ok"))
}

// ============================================================================
// Tests
// ============================================================================
