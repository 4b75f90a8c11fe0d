use std::time::Duration;

use async_trait::async_trait;
use guttersnap_model::{SubmissionResponse, routes};
use reqwest::{
    Client,
    multipart::{Form, Part},
};
use tracing::debug;
use url::Url;

use super::{SubmissionEndpoint, SubmissionPayload};
use crate::error::SubmissionError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Posts payloads as `multipart/form-data` to a GutterSnap server.
#[derive(Debug, Clone)]
pub struct HttpSubmissionEndpoint {
    client: Client,
    url: Url,
}

impl HttpSubmissionEndpoint {
    /// `base_url` is the server origin, e.g. `http://localhost:3000`.
    pub fn new(base_url: &str) -> Result<Self, SubmissionError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| SubmissionError::Transport(err.to_string()))?;
        Self::with_client(client, base_url)
    }

    pub fn with_client(
        client: Client,
        base_url: &str,
    ) -> Result<Self, SubmissionError> {
        let url = Url::parse(base_url)
            .and_then(|base| base.join(routes::SUBMIT_REQUEST))
            .map_err(|err| {
                SubmissionError::Transport(format!(
                    "invalid submission url {base_url}: {err}"
                ))
            })?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    fn build_form(
        payload: SubmissionPayload,
    ) -> Result<Form, SubmissionError> {
        let mut form = Form::new();
        for (field, value) in payload.fields {
            form = form.text(field.as_str(), value);
        }
        for (shot, file) in payload.files {
            let part = Part::bytes(file.data.to_vec())
                .file_name(file.name)
                .mime_str(&file.mime)
                .map_err(|err| {
                    SubmissionError::Transport(format!(
                        "invalid mime type for {shot}: {err}"
                    ))
                })?;
            form = form.part(shot.as_str(), part);
        }
        Ok(form)
    }
}

#[async_trait]
impl SubmissionEndpoint for HttpSubmissionEndpoint {
    async fn submit(
        &self,
        payload: SubmissionPayload,
    ) -> Result<SubmissionResponse, SubmissionError> {
        let form = Self::build_form(payload)?;

        let response = self
            .client
            .post(self.url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|err| SubmissionError::Transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| SubmissionError::Transport(err.to_string()))?;
        debug!(status = status.as_u16(), "submission endpoint responded");

        let parsed = serde_json::from_str::<SubmissionResponse>(&body).ok();
        if !status.is_success() {
            return Err(SubmissionError::Server {
                status: Some(status.as_u16()),
                message: parsed.and_then(|response| response.message),
            });
        }

        parsed.ok_or(SubmissionError::Server {
            status: Some(status.as_u16()),
            message: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_url_is_joined_onto_origin() {
        let endpoint =
            HttpSubmissionEndpoint::new("http://localhost:3000").unwrap();
        assert_eq!(
            endpoint.url().as_str(),
            "http://localhost:3000/submit-request"
        );
    }

    #[test]
    fn malformed_origin_is_a_transport_error() {
        let err = HttpSubmissionEndpoint::new("not a url").unwrap_err();
        assert!(matches!(err, SubmissionError::Transport(_)));
    }
}
