use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client,
    multipart::{Form, Part},
};
use tracing::{debug, info};
use url::Url;

use super::{MailRelay, RelayError, RelayMessage};

const RELAY_TIMEOUT: Duration = Duration::from_secs(60);

/// Posts messages as `multipart/form-data` to a mail relay service,
/// authenticating with the configured mail account.
#[derive(Clone)]
pub struct HttpMailRelay {
    client: Client,
    url: Url,
    user: String,
    pass: String,
}

impl std::fmt::Debug for HttpMailRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpMailRelay")
            .field("url", &self.url.as_str())
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

impl HttpMailRelay {
    pub fn new(
        url: Url,
        user: impl Into<String>,
        pass: impl Into<String>,
    ) -> Result<Self, RelayError> {
        let client = Client::builder().timeout(RELAY_TIMEOUT).build()?;
        Ok(Self {
            client,
            url,
            user: user.into(),
            pass: pass.into(),
        })
    }

    async fn build_form(message: &RelayMessage) -> Result<Form, RelayError> {
        let mut form = Form::new()
            .text("from", message.from.clone())
            .text("to", message.to.clone())
            .text("subject", message.subject.clone())
            .text("html", message.html.clone());

        for attachment in &message.attachments {
            let bytes = tokio::fs::read(&attachment.path).await.map_err(
                |source| RelayError::Attachment {
                    path: attachment.path.clone(),
                    source,
                },
            )?;
            let part = Part::bytes(bytes)
                .file_name(attachment.filename.clone())
                .mime_str(&attachment.mime)?;
            form = form.part("attachment", part);
        }
        Ok(form)
    }
}

#[async_trait]
impl MailRelay for HttpMailRelay {
    async fn send(&self, message: &RelayMessage) -> Result<(), RelayError> {
        let form = Self::build_form(message).await?;
        debug!(
            url = %self.url,
            attachments = message.attachments.len(),
            "sending message to mail relay"
        );

        let response = self
            .client
            .post(self.url.clone())
            .basic_auth(&self.user, Some(&self.pass))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Rejected {
                status: status.as_u16(),
            });
        }

        info!(to = %message.to, subject = %message.subject, "message relayed");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
