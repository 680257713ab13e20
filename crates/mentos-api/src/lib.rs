//! Mentos HTTP API
//!
//! Binds the mentoring engine and the complaint mailer to HTTP routes,
//! resolves the calling member from a gateway header, and wraps every
//! answer in the uniform [`BaseResponse`] envelope.

pub mod api;
pub mod config;
pub mod error;
pub mod identity;
pub mod response;

pub use api::{
    create_router, ApiError, AppState, ComplaintRequest, ComplaintResponse,
    CreateMentoringRequest, CreateMentoringResponse, MentoringStatusResponse, NicknameResponse,
    CANCEL_CONFIRMATION,
};
pub use config::{Config, MemberSeed};
pub use error::{ConfigError, Result};
pub use identity::{Actor, HeaderIdentity, IdentityError, IdentityProvider};
pub use response::{BaseResponse, ResponseStatus};
