use async_trait::async_trait;

use super::encoder::Frame;
use crate::error::{AcquisitionError, CaptureError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FacingMode {
    /// Rear camera on phones.
    #[default]
    Environment,
    User,
}

/// What the sequencer asks the platform camera for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraConstraints {
    pub facing_mode: FacingMode,
    pub ideal_width: u32,
    pub ideal_height: u32,
}

impl Default for CameraConstraints {
    fn default() -> Self {
        Self {
            facing_mode: FacingMode::Environment,
            ideal_width: 1920,
            ideal_height: 1080,
        }
    }
}

/// Platform camera. Acquisition may suspend while the user answers a
/// permission prompt, and may fail.
#[async_trait]
pub trait CameraSource: Send + Sync {
    async fn acquire(
        &self,
        constraints: &CameraConstraints,
    ) -> Result<Box<dyn VideoStream>, AcquisitionError>;
}

/// A live stream owned by exactly one capture session.
#[async_trait]
pub trait VideoStream: Send {
    /// False once the track ended, e.g. permission revoked mid-session.
    fn has_active_track(&self) -> bool;

    /// Next frame at the stream's native resolution.
    async fn next_frame(&mut self) -> Result<Frame, CaptureError>;

    /// Release the hardware. Must be idempotent.
    fn stop(&mut self);
}
