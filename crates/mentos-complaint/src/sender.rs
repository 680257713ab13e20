//! Mail delivery.
//!
//! [`MailSender`] is the seam to whatever actually delivers mail.
//! [`TracingMailSender`] logs each message and keeps the most recent ones
//! in a bounded in-process outbox, which is enough for local runs and tests.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

use crate::mail::MailMessage;
use crate::Result;

/// Delivers prepared mail messages.
#[async_trait]
pub trait MailSender: Send + Sync + std::fmt::Debug {
    /// Sends one message.
    async fn send(&self, message: MailMessage) -> Result<()>;
}

/// Number of messages a [`TracingMailSender`] keeps by default.
pub const DEFAULT_OUTBOX_CAPACITY: usize = 100;

/// Mail sender that records messages instead of delivering them.
///
/// The outbox holds at most `capacity` messages; once full, each new
/// message evicts the oldest one.
#[derive(Debug)]
pub struct TracingMailSender {
    capacity: usize,
    outbox: Mutex<VecDeque<MailMessage>>,
}

impl Default for TracingMailSender {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_OUTBOX_CAPACITY)
    }
}

impl TracingMailSender {
    /// Creates a sender keeping the last [`DEFAULT_OUTBOX_CAPACITY`] messages.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sender keeping the last `capacity` messages.
    ///
    /// A capacity of `0` only logs.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            outbox: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Returns a copy of the retained messages, oldest first.
    pub async fn sent(&self) -> Vec<MailMessage> {
        self.outbox.lock().await.iter().cloned().collect()
    }
}

#[async_trait]
impl MailSender for TracingMailSender {
    async fn send(&self, message: MailMessage) -> Result<()> {
        info!(
            to = %message.to,
            subject = %message.subject,
            body_len = message.body.len(),
            "Complaint mail queued"
        );
        if self.capacity == 0 {
            return Ok(());
        }
        let mut outbox = self.outbox.lock().await;
        if outbox.len() == self.capacity {
            outbox.pop_front();
        }
        outbox.push_back(message);
        Ok(())
    }
}
