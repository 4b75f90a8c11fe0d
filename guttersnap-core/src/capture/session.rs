use std::{fmt, sync::Arc};

use guttersnap_model::{CapturedImage, SHOT_SEQUENCE, ShotId};
use tracing::{info, warn};

use super::{
    camera::{CameraConstraints, CameraSource, VideoStream},
    encoder,
};
use crate::{
    binding,
    error::{CaptureError, SequencerError},
    form::FormSession,
    sequencer::{Effect, SequencerEvent, SequencerState},
};

/// One guided walk with the camera.
///
/// The session exclusively owns the live stream. Every path out of the walk
/// (finish, abort, acquisition failure, drop) stops it.
pub struct CaptureSession {
    camera: Arc<dyn CameraSource>,
    constraints: CameraConstraints,
    state: SequencerState,
    stream: Option<Box<dyn VideoStream>>,
}

impl fmt::Debug for CaptureSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureSession")
            .field("constraints", &self.constraints)
            .field("state", &self.state.name())
            .field("stream_open", &self.stream.is_some())
            .finish_non_exhaustive()
    }
}

impl CaptureSession {
    pub fn new(camera: Arc<dyn CameraSource>) -> Self {
        Self {
            camera,
            constraints: CameraConstraints::default(),
            state: SequencerState::Idle,
            stream: None,
        }
    }

    pub fn with_constraints(mut self, constraints: CameraConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn state(&self) -> &SequencerState {
        &self.state
    }

    pub fn has_open_stream(&self) -> bool {
        self.stream.is_some()
    }

    /// Open the camera and prompt for the first shot. A refused or missing
    /// camera is not an error here: the machine falls back to the form and
    /// the returned effects carry the notice.
    ///
    /// A finished walk can be started again; it restarts from the first shot.
    pub async fn start(
        &mut self,
        form: &mut FormSession,
    ) -> Result<Vec<Effect>, SequencerError> {
        match self.state {
            SequencerState::Idle => {}
            SequencerState::Finished => {
                self.release_camera();
                self.state = SequencerState::Idle;
            }
            SequencerState::Prompting { .. }
            | SequencerState::Reviewing { .. } => {
                return Err(SequencerError::Rejected {
                    state: self.state.name(),
                    event: "start",
                });
            }
        }

        let event = match self.camera.acquire(&self.constraints).await {
            Ok(stream) => {
                info!("camera acquired, starting guided capture");
                self.stream = Some(stream);
                SequencerEvent::CameraReady
            }
            Err(err) => {
                warn!(error = %err, "camera unavailable, falling back to manual upload");
                SequencerEvent::CameraFailed(err)
            }
        };
        self.dispatch(event, form)
    }

    /// Grab one frame, encode it and bind it to the current shot. A still
    /// the file binding would refuse counts as a failed capture.
    pub async fn capture(
        &mut self,
        form: &mut FormSession,
    ) -> Result<Vec<Effect>, SequencerError> {
        let SequencerState::Prompting { index } = self.state else {
            return Err(SequencerError::Rejected {
                state: self.state.name(),
                event: "capture",
            });
        };
        let shot = SHOT_SEQUENCE[index].id;
        let still = self.grab_still(shot).await.and_then(|image| {
            binding::check_file(&image.file)
                .map_err(CaptureError::Rejected)
                .map(|()| image)
        });
        let event = match still {
            Ok(image) => SequencerEvent::Captured(image),
            Err(err) => {
                warn!(shot = %shot, error = %err, "capture failed");
                SequencerEvent::CaptureFailed(err)
            }
        };
        self.dispatch(event, form)
    }

    pub fn confirm(
        &mut self,
        form: &mut FormSession,
    ) -> Result<Vec<Effect>, SequencerError> {
        self.dispatch(SequencerEvent::Confirm, form)
    }

    /// Back to the manual form. The stream is stopped before this returns.
    pub fn abort(&mut self, form: &mut FormSession) -> Vec<Effect> {
        match self.dispatch(SequencerEvent::Abort, form) {
            Ok(effects) => effects,
            Err(err) => {
                warn!(error = %err, "abort rejected by sequencer");
                self.release_camera();
                self.state = SequencerState::Idle;
                Vec::new()
            }
        }
    }

    async fn grab_still(
        &mut self,
        shot: ShotId,
    ) -> Result<CapturedImage, CaptureError> {
        let track_live = self
            .stream
            .as_ref()
            .is_some_and(|stream| stream.has_active_track());
        if !track_live {
            self.release_camera();
            return Err(CaptureError::NoActiveTrack);
        }
        let Some(stream) = self.stream.as_mut() else {
            return Err(CaptureError::NoActiveTrack);
        };
        let frame = stream.next_frame().await?;

        tokio::task::spawn_blocking(move || {
            encoder::capture_still(shot, &frame)
        })
        .await
        .map_err(|err| CaptureError::Encode(err.to_string()))?
    }

    fn dispatch(
        &mut self,
        event: SequencerEvent,
        form: &mut FormSession,
    ) -> Result<Vec<Effect>, SequencerError> {
        let transition = self.state.apply(event)?;
        self.state = transition.state;

        for effect in &transition.effects {
            match effect {
                Effect::ReleaseCamera => self.release_camera(),
                Effect::BindCapture(image) => {
                    if let Err(rejected) = form.bind_capture(image.clone()) {
                        warn!(
                            shot = %image.shot,
                            reason = %rejected,
                            "captured still rejected by file binding"
                        );
                    }
                }
                Effect::ShowPrompt(_)
                | Effect::ShowReview { .. }
                | Effect::Notice(_)
                | Effect::ReturnToForm { .. } => {}
            }
        }

        Ok(transition.effects)
    }

    fn release_camera(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            info!("camera stream released");
        }
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.release_camera();
    }
}
