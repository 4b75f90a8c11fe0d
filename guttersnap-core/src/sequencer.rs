//! Guided walk through the nine required shots.
//!
//! The machine is a value: every transition takes the current state by
//! reference and returns the next state plus the effects the caller must
//! carry out. It never touches the camera or the form itself; see
//! [`crate::capture::CaptureSession`] for the driver that does.

use guttersnap_model::{CapturedImage, SHOT_COUNT, SHOT_SEQUENCE, ShotSpec};

use crate::error::{AcquisitionError, CaptureError, SequencerError};

/// Blocking notice shown when the camera cannot be opened.
pub const CAMERA_UNAVAILABLE_NOTICE: &str = "Unable to access camera. Please make sure you have granted camera permissions or use the manual upload option.";

/// Notice shown when a frame could not be turned into a still.
pub const CAPTURE_FAILED_NOTICE: &str =
    "Unable to capture photo. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SequencerState {
    #[default]
    Idle,
    Prompting {
        index: usize,
    },
    Reviewing {
        index: usize,
        image: CapturedImage,
    },
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequencerEvent {
    CameraReady,
    CameraFailed(AcquisitionError),
    Captured(CapturedImage),
    CaptureFailed(CaptureError),
    Confirm,
    Abort,
}

impl SequencerEvent {
    fn name(&self) -> &'static str {
        match self {
            SequencerEvent::CameraReady => "camera ready",
            SequencerEvent::CameraFailed(_) => "camera failure",
            SequencerEvent::Captured(_) => "capture",
            SequencerEvent::CaptureFailed(_) => "capture failure",
            SequencerEvent::Confirm => "confirm",
            SequencerEvent::Abort => "abort",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmLabel {
    NextPhoto,
    Finish,
}

impl ConfirmLabel {
    fn for_index(index: usize) -> Self {
        if index + 1 < SHOT_COUNT {
            ConfirmLabel::NextPhoto
        } else {
            ConfirmLabel::Finish
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            ConfirmLabel::NextPhoto => "Next Photo →",
            ConfirmLabel::Finish => "Finish",
        }
    }
}

/// What the UI shows while waiting for a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prompt {
    pub shot: &'static ShotSpec,
    pub index: usize,
}

impl Prompt {
    fn at(index: usize) -> Self {
        Self {
            shot: &SHOT_SEQUENCE[index],
            index,
        }
    }

    /// e.g. `"3 of 9"`.
    pub fn progress_label(&self) -> String {
        format!("{} of {}", self.index + 1, SHOT_COUNT)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ShowPrompt(Prompt),
    /// Write the still into the canonical file mapping.
    BindCapture(CapturedImage),
    ShowReview {
        image: CapturedImage,
        confirm: ConfirmLabel,
    },
    /// Stop the camera stream. Emitted on every path back to `Idle` or
    /// `Finished`.
    ReleaseCamera,
    Notice(&'static str),
    ReturnToForm {
        scroll_to_contact: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: SequencerState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn to(state: SequencerState, effects: Vec<Effect>) -> Self {
        Self { state, effects }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorPhase {
    Prompting,
    Captured,
}

/// Position within an active walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencerCursor {
    pub index: usize,
    pub phase: CursorPhase,
}

impl SequencerState {
    pub fn name(&self) -> &'static str {
        match self {
            SequencerState::Idle => "idle",
            SequencerState::Prompting { .. } => "prompting",
            SequencerState::Reviewing { .. } => "reviewing",
            SequencerState::Finished => "finished",
        }
    }

    /// Only present while a walk is in progress.
    pub fn cursor(&self) -> Option<SequencerCursor> {
        match self {
            SequencerState::Prompting { index } => Some(SequencerCursor {
                index: *index,
                phase: CursorPhase::Prompting,
            }),
            SequencerState::Reviewing { index, .. } => Some(SequencerCursor {
                index: *index,
                phase: CursorPhase::Captured,
            }),
            SequencerState::Idle | SequencerState::Finished => None,
        }
    }

    /// The shot currently being prompted for or reviewed.
    pub fn current_shot(&self) -> Option<&'static ShotSpec> {
        self.cursor().map(|cursor| &SHOT_SEQUENCE[cursor.index])
    }

    pub fn apply(
        &self,
        event: SequencerEvent,
    ) -> Result<Transition, SequencerError> {
        // Abort is accepted everywhere and always releases the camera.
        if let SequencerEvent::Abort = event {
            return Ok(Transition::to(
                SequencerState::Idle,
                vec![
                    Effect::ReleaseCamera,
                    Effect::ReturnToForm {
                        scroll_to_contact: false,
                    },
                ],
            ));
        }

        match (self, event) {
            (SequencerState::Idle, SequencerEvent::CameraReady) => {
                Ok(Transition::to(
                    SequencerState::Prompting { index: 0 },
                    vec![Effect::ShowPrompt(Prompt::at(0))],
                ))
            }
            (SequencerState::Idle, SequencerEvent::CameraFailed(_)) => {
                Ok(Transition::to(
                    SequencerState::Idle,
                    vec![
                        Effect::ReleaseCamera,
                        Effect::Notice(CAMERA_UNAVAILABLE_NOTICE),
                        Effect::ReturnToForm {
                            scroll_to_contact: false,
                        },
                    ],
                ))
            }
            (
                SequencerState::Prompting { index },
                SequencerEvent::Captured(image),
            ) => {
                let expected = SHOT_SEQUENCE[*index].id;
                if image.shot != expected {
                    return Err(SequencerError::WrongShot {
                        expected,
                        got: image.shot,
                    });
                }
                Ok(Transition::to(
                    SequencerState::Reviewing {
                        index: *index,
                        image: image.clone(),
                    },
                    vec![
                        Effect::BindCapture(image.clone()),
                        Effect::ShowReview {
                            image,
                            confirm: ConfirmLabel::for_index(*index),
                        },
                    ],
                ))
            }
            (
                SequencerState::Prompting { index },
                SequencerEvent::CaptureFailed(err),
            ) => {
                let notice = match &err {
                    CaptureError::Rejected(rejected) => rejected.notice(),
                    _ => CAPTURE_FAILED_NOTICE,
                };
                Ok(Transition::to(
                    SequencerState::Prompting { index: *index },
                    vec![Effect::Notice(notice)],
                ))
            }
            (SequencerState::Reviewing { index, .. }, SequencerEvent::Confirm) => {
                let next = index + 1;
                if next < SHOT_COUNT {
                    Ok(Transition::to(
                        SequencerState::Prompting { index: next },
                        vec![Effect::ShowPrompt(Prompt::at(next))],
                    ))
                } else {
                    Ok(Transition::to(
                        SequencerState::Finished,
                        vec![
                            Effect::ReleaseCamera,
                            Effect::ReturnToForm {
                                scroll_to_contact: true,
                            },
                        ],
                    ))
                }
            }
            (state, event) => Err(SequencerError::Rejected {
                state: state.name(),
                event: event.name(),
            }),
        }
    }
}
