//! Hand-off of accepted requests to whoever processes them.
//!
//! [`MailRelay`] is the seam; [`HttpMailRelay`] forwards to a mail relay
//! service and [`LogMailRelay`] only records the message.

pub mod http;
pub mod message;

pub use http::HttpMailRelay;
pub use message::{RelayAttachment, RelayMessage, escape_html};

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("failed to read attachment {path}")]
    Attachment {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("mail relay request failed")]
    Transport(#[from] reqwest::Error),

    #[error("mail relay rejected message with status {status}")]
    Rejected { status: u16 },
}

#[async_trait]
pub trait MailRelay: Send + Sync {
    async fn send(&self, message: &RelayMessage) -> Result<(), RelayError>;

    fn name(&self) -> &'static str;
}

/// Used when no relay URL is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailRelay;

#[async_trait]
impl MailRelay for LogMailRelay {
    async fn send(&self, message: &RelayMessage) -> Result<(), RelayError> {
        info!(
            from = %message.from,
            to = %message.to,
            subject = %message.subject,
            attachments = message.attachments.len(),
            "photo request received (relay disabled, message logged only)"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
