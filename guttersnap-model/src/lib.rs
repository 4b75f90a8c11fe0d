//! Core data model definitions shared across GutterSnap crates.
#![allow(missing_docs)]

pub mod contact;
pub mod error;
pub mod files;
pub mod routes;
pub mod shots;
pub mod submission;

// Intentionally curated re-exports for downstream consumers.
pub use contact::{ContactField, ContactFields};
pub use error::{ModelError, Result as ModelResult};
pub use files::{CapturedImage, ImageFile, JPEG_MIME, MAX_FILE_BYTES};
pub use shots::{SHOT_COUNT, SHOT_SEQUENCE, ShotId, ShotSpec};
pub use submission::SubmissionResponse;
