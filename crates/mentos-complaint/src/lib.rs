//! Mentos complaint reports
//!
//! A member can report a mentoring post, a profile or a chat. This crate
//! turns such a report into the plain-text body of the notification mail
//! and hands it to a [`MailSender`].
//!
//! # Example
//!
//! ```rust
//! use mentos_complaint::{ComplaintReport, format_mail_text};
//!
//! let report = ComplaintReport::new(1, 42, "spam");
//! let text = format_mail_text(7, &report).unwrap();
//! assert!(text.contains("actor id = 7"));
//! assert!(text.contains("= post"));
//! ```

mod mail;
pub mod sender;

pub use mail::{format_mail_text, MailMessage, MAIL_SUBJECT};
pub use sender::{MailSender, TracingMailSender, DEFAULT_OUTBOX_CAPACITY};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while preparing or delivering a complaint mail.
#[derive(Debug, Error)]
pub enum ComplaintError {
    /// The mail body could not be assembled.
    #[error("failed to format complaint mail: {0}")]
    Format(String),

    /// The mail sender refused or failed to deliver the message.
    #[error("failed to send complaint mail to '{recipient}': {message}")]
    Delivery {
        /// Address the mail was meant for.
        recipient: String,
        /// Description of the failure.
        message: String,
    },
}

/// Result type for complaint operations.
pub type Result<T> = std::result::Result<T, ComplaintError>;

// ============================================================================
// ComplaintCategory
// ============================================================================

/// What kind of thing a complaint is about.
///
/// Parsed from the numeric flag sent by clients. Unknown flags are not an
/// error: they fall back to [`ComplaintCategory::Chat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplaintCategory {
    /// A mentoring post (flag `1`).
    Post,
    /// A member profile (flag `2`).
    Profile,
    /// A chat conversation (any other flag).
    Chat,
}

impl ComplaintCategory {
    /// Maps a client flag to a category.
    ///
    /// # Examples
    ///
    /// ```
    /// use mentos_complaint::ComplaintCategory;
    ///
    /// assert_eq!(ComplaintCategory::from_flag(1), ComplaintCategory::Post);
    /// assert_eq!(ComplaintCategory::from_flag(2), ComplaintCategory::Profile);
    /// assert_eq!(ComplaintCategory::from_flag(99), ComplaintCategory::Chat);
    /// ```
    #[must_use]
    pub const fn from_flag(flag: i32) -> Self {
        match flag {
            1 => Self::Post,
            2 => Self::Profile,
            _ => Self::Chat,
        }
    }

    /// The label written into the mail body.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Profile => "profile",
            Self::Chat => "chat",
        }
    }
}

impl std::fmt::Display for ComplaintCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// ComplaintReport
// ============================================================================

/// A complaint as submitted by a member.
///
/// Only lives for the duration of a request; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplaintReport {
    /// Category flag: `1` post, `2` profile, anything else chat.
    pub flag: i32,

    /// Reported member id, or post number when the category is a post.
    pub number: i64,

    /// Free-text description from the reporter.
    pub text: String,
}

impl ComplaintReport {
    /// Creates a new report.
    #[must_use]
    pub fn new(flag: i32, number: i64, text: impl Into<String>) -> Self {
        Self {
            flag,
            number,
            text: text.into(),
        }
    }

    /// The category derived from [`Self::flag`].
    #[must_use]
    pub const fn category(&self) -> ComplaintCategory {
        ComplaintCategory::from_flag(self.flag)
    }
}
