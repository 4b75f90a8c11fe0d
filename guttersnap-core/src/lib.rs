//! # GutterSnap Core
//!
//! Client-side logic for collecting a nine-photo exterior request:
//!
//! - [`capture`]: camera collaborator traits, the JPEG still encoder and the
//!   session that walks the user through every shot
//! - [`sequencer`]: the pure state machine behind the guided walk
//! - [`binding`]: the canonical shot → file mapping both acquisition paths
//!   write into
//! - [`form`]: contact fields, phone formatting and readiness tracking
//! - [`validator`]: submit readiness as a pure function
//! - [`submission`]: packaging and sending a ready request
#![allow(missing_docs)]

pub mod binding;
pub mod capture;
pub mod error;
pub mod form;
pub mod sequencer;
pub mod submission;
pub mod validator;

pub use binding::{
    AcquisitionPath, FileBinding, Selection, SelectionChange, SelectionStatus,
};
pub use capture::CaptureSession;
pub use error::{
    AcquisitionError, CaptureError, FileRejected, SequencerError,
    SubmissionError, ValidationError,
};
pub use form::FormSession;
pub use sequencer::{Effect, SequencerEvent, SequencerState};
pub use submission::{
    HttpSubmissionEndpoint, SubmissionCoordinator, SubmissionEndpoint,
    SubmissionPayload, SubmitOutcome,
};
pub use validator::{SubmissionState, is_ready};
