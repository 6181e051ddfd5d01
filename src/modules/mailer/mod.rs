//! Outbound notifications
//!
//! The identity store invokes a `Mailer` after registration; delivery is
//! best-effort and never fails the caller.

mod http_mailer;

pub use http_mailer::{HttpMailer, LogMailer};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail relay request failed: {0}")]
    Transport(String),

    #[error("mail relay rejected message: HTTP {status} - {body}")]
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Tell a newly registered user their account awaits validation
    async fn send_validation_email(&self, email: &str, name: &str) -> Result<(), MailError>;
}
