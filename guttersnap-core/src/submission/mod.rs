//! Packaging a ready form into one outbound request and interpreting the
//! answer. There is no automatic retry: a failed attempt re-enables the form
//! and the user decides.

pub mod http;

pub use http::HttpSubmissionEndpoint;

use async_trait::async_trait;
use guttersnap_model::{ContactField, ImageFile, ShotId, SubmissionResponse};
use tracing::{info, warn};

use crate::{
    error::{SubmissionError, ValidationError},
    form::FormSession,
    validator::{self, SubmissionState},
};

/// Multipart request body, in wire order: contact fields then the nine
/// photos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPayload {
    pub fields: Vec<(ContactField, String)>,
    pub files: Vec<(ShotId, ImageFile)>,
}

impl SubmissionPayload {
    /// Required fields are always sent; notes only when non-empty.
    pub fn from_state(state: &SubmissionState) -> Self {
        let fields = ContactField::ALL
            .into_iter()
            .filter(|field| {
                field.is_required() || !state.contact.get(*field).is_empty()
            })
            .map(|field| (field, state.contact.get(field).to_string()))
            .collect();
        let files = state
            .images
            .iter()
            .map(|(shot, file)| (*shot, file.clone()))
            .collect();
        Self { fields, files }
    }

    pub fn field(&self, field: ContactField) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| value.as_str())
    }
}

/// Where completed requests are sent.
#[async_trait]
pub trait SubmissionEndpoint: Send + Sync {
    async fn submit(
        &self,
        payload: SubmissionPayload,
    ) -> Result<SubmissionResponse, SubmissionError>;
}

/// UI changes requested after a successful submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionEffect {
    HideForm,
    HideWelcome,
    ShowSuccess,
    Confetti,
}

pub const COMPLETION_EFFECTS: [CompletionEffect; 4] = [
    CompletionEffect::HideForm,
    CompletionEffect::HideWelcome,
    CompletionEffect::ShowSuccess,
    CompletionEffect::Confetti,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Completed {
        message: Option<String>,
        effects: Vec<CompletionEffect>,
    },
    /// Nothing was sent.
    Blocked(ValidationError),
    /// Sent (or attempted) and failed; the form is editable again.
    Failed(SubmissionError),
}

impl SubmitOutcome {
    /// Text to show the user, if any.
    pub fn user_message(&self) -> Option<&str> {
        match self {
            SubmitOutcome::Completed { message, .. } => message.as_deref(),
            SubmitOutcome::Blocked(_) => Some(ValidationError::USER_MESSAGE),
            SubmitOutcome::Failed(_) => Some(SubmissionError::USER_MESSAGE),
        }
    }
}

#[derive(Debug)]
pub struct SubmissionCoordinator<E> {
    endpoint: E,
}

impl<E> SubmissionCoordinator<E>
where
    E: SubmissionEndpoint,
{
    pub fn new(endpoint: E) -> Self {
        Self { endpoint }
    }

    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    /// Re-validate, send once, and settle the form accordingly.
    pub async fn submit(&self, form: &mut FormSession) -> SubmitOutcome {
        let state = form.snapshot();
        if let Err(missing) = validator::check(&state) {
            warn!(%missing, "submission blocked by validation");
            return SubmitOutcome::Blocked(missing);
        }

        form.begin_submit();
        let payload = SubmissionPayload::from_state(&state);
        info!(
            fields = payload.fields.len(),
            photos = payload.files.len(),
            "submitting photo request"
        );

        let result = match self.endpoint.submit(payload).await {
            Ok(response) if response.success => Ok(response.message),
            Ok(response) => Err(SubmissionError::Server {
                status: None,
                message: response.message,
            }),
            Err(err) => Err(err),
        };

        match result {
            Ok(message) => {
                form.finish_submit(true);
                info!("photo request accepted");
                SubmitOutcome::Completed {
                    message,
                    effects: COMPLETION_EFFECTS.to_vec(),
                }
            }
            Err(err) => {
                form.finish_submit(false);
                warn!(error = %err, "photo request failed");
                SubmitOutcome::Failed(err)
            }
        }
    }
}
