use std::fmt;

use guttersnap_model::{ContactField, ShotId};
use thiserror::Error;

/// The camera could not be opened. Callers fall back to the manual form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionError {
    #[error("camera permission denied")]
    PermissionDenied,

    #[error("no camera available")]
    Unavailable,

    #[error("camera error: {0}")]
    Other(String),
}

/// A still could not be produced from the live stream. No file is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("video stream has no active track")]
    NoActiveTrack,

    #[error(
        "frame buffer holds {actual} bytes, expected {expected} for {width}x{height}"
    )]
    MalformedFrame {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("JPEG encoding failed: {0}")]
    Encode(String),

    #[error("captured still rejected: {0}")]
    Rejected(FileRejected),
}

/// A selected file failed the per-file checks and was not bound.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FileRejected {
    #[error("File too large (max 10MB)")]
    TooLarge { size: u64 },

    #[error("Please select an image file")]
    NotAnImage { mime: String },
}

impl FileRejected {
    /// The status text shown next to the file input or in the capture view.
    pub fn notice(&self) -> &'static str {
        match self {
            FileRejected::TooLarge { .. } => "File too large (max 10MB)",
            FileRejected::NotAnImage { .. } => "Please select an image file",
        }
    }
}

/// Something required for submission is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub missing_fields: Vec<ContactField>,
    pub missing_shots: Vec<ShotId>,
}

impl ValidationError {
    pub const USER_MESSAGE: &'static str =
        "Please fill in all required fields and upload all photos.";

    pub fn is_empty(&self) -> bool {
        self.missing_fields.is_empty() && self.missing_shots.is_empty()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if !self.missing_fields.is_empty() {
            parts.push(format!(
                "missing fields: {}",
                join(self.missing_fields.iter())
            ));
        }
        if !self.missing_shots.is_empty() {
            parts.push(format!(
                "missing photos: {}",
                join(self.missing_shots.iter())
            ));
        }
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationError {}

fn join<T: fmt::Display>(items: impl Iterator<Item = T>) -> String {
    items.map(|item| item.to_string()).collect::<Vec<_>>().join(", ")
}

/// A submission attempt that reached (or tried to reach) the endpoint failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("submission transport failed: {0}")]
    Transport(String),

    #[error("submission rejected by server (status {status:?})")]
    Server {
        status: Option<u16>,
        message: Option<String>,
    },
}

impl SubmissionError {
    /// The single retryable message shown for every failed attempt.
    pub const USER_MESSAGE: &'static str =
        "There was an error submitting your request. Please try again.";
}

/// An event arrived that the capture sequencer does not accept in its
/// current state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequencerError {
    #[error("{event} is not accepted while {state}")]
    Rejected {
        state: &'static str,
        event: &'static str,
    },

    #[error("captured image for {got} while prompting for {expected}")]
    WrongShot { expected: ShotId, got: ShotId },
}
