//! Outbound email.
//!
//! Services hand a fully rendered `Email` to the `Mailer`. The bundled
//! adapter writes messages to the log; a transport-backed adapter plugs in
//! behind the same trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// A rendered email message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    /// Recipient email address
    pub to: String,
    /// Email subject line
    pub subject: String,
    /// Plain-text body
    pub body: String,
}

impl Email {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: Email) -> AppResult<()>;
}

/// Mailer that logs each message instead of delivering it.
pub struct LogMailer {
    from: String,
}

impl LogMailer {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: Email) -> AppResult<()> {
        tracing::info!(
            from = %self.from,
            to = %email.to,
            subject = %email.subject,
            "Email (not sent)\n{}",
            email.body
        );
        Ok(())
    }
}
