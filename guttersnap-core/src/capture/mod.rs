//! Camera side of the guided capture flow: the platform collaborator
//! traits, the still encoder and the session that drives the sequencer.

pub mod camera;
pub mod encoder;
pub mod session;

pub use camera::{CameraConstraints, CameraSource, FacingMode, VideoStream};
pub use encoder::{Frame, JPEG_QUALITY, capture_still, encode_jpeg};
pub use session::CaptureSession;
