use std::path::PathBuf;

use guttersnap_model::{ContactFields, ShotId};

use crate::{infra::config::MailConfig, uploads::StoredUpload};

const NO_NOTES: &str = "No special notes provided";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayAttachment {
    /// `<shotId>-<stored file name>`.
    pub filename: String,
    pub mime: String,
    pub path: PathBuf,
}

/// Notification for one accepted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
    pub attachments: Vec<RelayAttachment>,
}

impl RelayMessage {
    pub fn compose(
        mail: &MailConfig,
        contact: &ContactFields,
        uploads: &[StoredUpload],
    ) -> Self {
        let attachments = uploads
            .iter()
            .map(|upload| RelayAttachment {
                filename: format!("{}-{}", upload.shot, upload.stored_name),
                mime: upload.mime.clone(),
                path: upload.path.clone(),
            })
            .collect();
        let shots: Vec<ShotId> = uploads.iter().map(|upload| upload.shot).collect();

        Self {
            from: mail.user.clone(),
            to: mail.recipient.clone(),
            subject: format!("New GutterSnap Request - {}", contact.address),
            html: render_html(contact, &shots),
            attachments,
        }
    }
}

fn render_html(contact: &ContactFields, shots: &[ShotId]) -> String {
    let notes = if contact.notes.trim().is_empty() {
        NO_NOTES.to_string()
    } else {
        escape_html(&contact.notes)
    };
    let photos: String = shots
        .iter()
        .map(|shot| format!("<li>{}</li>", shot.human_label()))
        .collect();

    format!(
        r#"<h2>New GutterSnap Photo Request</h2>
<div style="font-family: Arial, sans-serif; line-height: 1.6;">
<h3>Customer Information:</h3>
<ul>
<li><strong>Email:</strong> {email}</li>
<li><strong>Phone:</strong> {phone}</li>
<li><strong>Address:</strong> {address}</li>
</ul>
<h3>Special Notes:</h3>
<p>{notes}</p>
<h3>Photos Submitted:</h3>
<p>Please see attached photos for:</p>
<ul>{photos}</ul>
<hr>
<p><em>Submitted via GutterSnap Web Application</em></p>
</div>
"#,
        email = escape_html(&contact.email),
        phone = escape_html(&contact.phone),
        address = escape_html(&contact.address),
    )
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
