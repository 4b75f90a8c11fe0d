use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Multipart, State, multipart::Field},
};
use guttersnap_core::{SubmissionState, validator};
use guttersnap_model::{
    ContactField, ContactFields, ImageFile, MAX_FILE_BYTES, ShotId,
    SubmissionResponse,
};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    infra::{
        app_state::AppState,
        errors::{AppError, AppResult},
    },
    relay::RelayMessage,
    uploads::StoredUpload,
};

pub const SUBMITTED: &str = "Request submitted successfully!";

/// `POST /submit-request`: receive the contact fields and nine photos,
/// store them and relay the request.
pub async fn submit_request(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<SubmissionResponse>> {
    let request_id = Uuid::new_v4();
    let received = read_submission(multipart).await.inspect_err(|err| {
        info!(
            %request_id,
            status = err.status.as_u16(),
            reason = %err,
            "submission refused"
        );
    })?;

    validator::check(&received).map_err(|missing| {
        info!(%request_id, %missing, "incomplete submission");
        AppError::from(missing)
    })?;

    let mut stored = Vec::with_capacity(received.images.len());
    for (shot, file) in &received.images {
        match state.uploads.store(*shot, file).await {
            Ok(upload) => stored.push(upload),
            Err(err) => {
                error!(
                    %request_id,
                    shot = %shot,
                    error = %err,
                    "failed to store upload"
                );
                schedule_cleanup(&state, request_id, stored);
                return Err(AppError::processing_failed());
            }
        }
    }

    let message =
        RelayMessage::compose(&state.config.mail, &received.contact, &stored);
    let outcome = state.relay.send(&message).await;
    schedule_cleanup(&state, request_id, stored);

    match outcome {
        Ok(()) => {
            info!(
                %request_id,
                relay = state.relay.name(),
                photos = message.attachments.len(),
                "photo request relayed"
            );
            Ok(Json(SubmissionResponse::ok(SUBMITTED)))
        }
        Err(err) => {
            error!(
                %request_id,
                relay = state.relay.name(),
                error = ?err,
                "relay failed"
            );
            Err(AppError::processing_failed())
        }
    }
}

fn schedule_cleanup(
    state: &AppState,
    request_id: Uuid,
    stored: Vec<StoredUpload>,
) {
    debug!(
        %request_id,
        files = stored.len(),
        delay = ?state.uploads.cleanup_delay(),
        "scheduling upload cleanup"
    );
    state.uploads.schedule_cleanup(stored);
}

/// Drain the multipart body. File fields are checked as they stream in:
/// mime first, then size.
async fn read_submission(
    mut multipart: Multipart,
) -> AppResult<SubmissionState> {
    let mut contact = ContactFields::default();
    let mut images = BTreeMap::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        if let Ok(shot) = name.parse::<ShotId>() {
            if images.contains_key(&shot) {
                return Err(AppError::unexpected_field(&name));
            }
            let file = read_image(shot, field).await?;
            images.insert(shot, file);
        } else if let Ok(contact_field) = name.parse::<ContactField>() {
            let value = field.text().await?;
            contact.set(contact_field, value);
        } else if field.file_name().is_some() {
            return Err(AppError::unexpected_field(&name));
        } else {
            debug!(field = %name, "ignoring unknown text field");
        }
    }

    Ok(SubmissionState::new(contact, images))
}

async fn read_image(
    shot: ShotId,
    mut field: Field<'_>,
) -> AppResult<ImageFile> {
    let mime = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    if !mime.starts_with("image/") {
        warn!(shot = %shot, %mime, "non-image upload rejected");
        return Err(AppError::not_an_image());
    }
    let name = field
        .file_name()
        .map(str::to_string)
        .unwrap_or_else(|| shot.as_str().to_string());

    let mut data = Vec::new();
    while let Some(chunk) = field.chunk().await? {
        if (data.len() + chunk.len()) as u64 > MAX_FILE_BYTES {
            warn!(shot = %shot, file = %name, "upload exceeds size limit");
            return Err(AppError::file_too_large());
        }
        data.extend_from_slice(&chunk);
    }

    Ok(ImageFile::new(name, mime, data))
}
