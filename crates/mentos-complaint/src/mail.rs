//! Complaint mail text.
//!
//! The body layout is consumed by the moderators' mailbox rules, so the
//! line order (reporter, category, target, text) must not change.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ComplaintError, ComplaintReport, Result};

/// Subject line of every complaint mail.
pub const MAIL_SUBJECT: &str = "[Mentos] New member complaint";

/// Formats the body of the complaint notification mail.
///
/// `reporter_id` is the member who filed the complaint.
///
/// # Errors
///
/// Returns `ComplaintError::Format` if the text cannot be assembled.
pub fn format_mail_text(reporter_id: i64, report: &ComplaintReport) -> Result<String> {
    let mut body = String::new();
    write_body(&mut body, reporter_id, report)
        .map_err(|e| ComplaintError::Format(e.to_string()))?;
    Ok(body)
}

fn write_body(out: &mut String, reporter_id: i64, report: &ComplaintReport) -> std::fmt::Result {
    writeln!(out, "A complaint has been filed by a member!")?;
    writeln!(out, "Reporting member actor id = {reporter_id}")?;
    writeln!(out, "Complaint category = {}", report.category())?;
    writeln!(out, "Reported member id or post number = {}", report.number)?;
    writeln!(out, "Complaint text = {}", report.text)?;
    Ok(())
}

/// A complaint mail ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMessage {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
    /// When the message was built.
    pub created_at: DateTime<Utc>,
}

impl MailMessage {
    /// Builds the complaint mail for `report` filed by `reporter_id`.
    ///
    /// # Errors
    ///
    /// Returns `ComplaintError::Format` if the body cannot be assembled.
    pub fn complaint(
        to: impl Into<String>,
        reporter_id: i64,
        report: &ComplaintReport,
    ) -> Result<Self> {
        Ok(Self {
            to: to.into(),
            subject: MAIL_SUBJECT.to_string(),
            body: format_mail_text(reporter_id, report)?,
            created_at: Utc::now(),
        })
    }
}
