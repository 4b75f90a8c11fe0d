#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use async_trait::async_trait;
use guttersnap_core::{
    AcquisitionError, CaptureError, FormSession, Selection, SubmissionEndpoint,
    SubmissionError, SubmissionPayload,
    binding::AcquisitionPath,
    capture::{CameraConstraints, CameraSource, Frame, VideoStream},
};
use guttersnap_model::{ContactField, ImageFile, ShotId, SubmissionResponse};

/// Shared observations about the streams a [`FakeCamera`] hands out.
#[derive(Debug, Default)]
pub struct StreamProbe {
    pub opened: AtomicUsize,
    pub stopped: AtomicUsize,
    pub track_active: AtomicBool,
    pub last_constraints: Mutex<Option<CameraConstraints>>,
}

impl StreamProbe {
    pub fn live_streams(&self) -> usize {
        self.opened.load(Ordering::SeqCst) - self.stopped.load(Ordering::SeqCst)
    }

    pub fn end_track(&self) {
        self.track_active.store(false, Ordering::SeqCst);
    }
}

/// What every frame from a [`FakeStream`] looks like.
#[derive(Debug, Clone, Copy)]
enum FramePattern {
    Flat,
    Noise,
}

pub struct FakeCamera {
    outcome: Result<(), AcquisitionError>,
    frame_size: (u32, u32),
    pattern: FramePattern,
    pub probe: Arc<StreamProbe>,
}

impl FakeCamera {
    pub fn granting() -> Arc<Self> {
        Arc::new(Self::with_outcome(Ok(())))
    }

    pub fn denying() -> Arc<Self> {
        Arc::new(Self::with_outcome(Err(AcquisitionError::PermissionDenied)))
    }

    /// A camera whose frames are random noise at `width`x`height`. Noise
    /// barely compresses, so large sizes encode past the 10 MiB limit.
    pub fn granting_noise(width: u32, height: u32) -> Arc<Self> {
        Arc::new(Self {
            frame_size: (width, height),
            pattern: FramePattern::Noise,
            ..Self::with_outcome(Ok(()))
        })
    }

    fn with_outcome(outcome: Result<(), AcquisitionError>) -> Self {
        Self {
            outcome,
            frame_size: (32, 24),
            pattern: FramePattern::Flat,
            probe: Arc::new(StreamProbe::default()),
        }
    }
}

#[async_trait]
impl CameraSource for FakeCamera {
    async fn acquire(
        &self,
        constraints: &CameraConstraints,
    ) -> Result<Box<dyn VideoStream>, AcquisitionError> {
        *self.probe.last_constraints.lock().unwrap() = Some(*constraints);
        self.outcome.clone()?;
        self.probe.opened.fetch_add(1, Ordering::SeqCst);
        self.probe.track_active.store(true, Ordering::SeqCst);
        Ok(Box::new(FakeStream {
            probe: Arc::clone(&self.probe),
            frame_size: self.frame_size,
            pattern: self.pattern,
            stopped: false,
        }))
    }
}

struct FakeStream {
    probe: Arc<StreamProbe>,
    frame_size: (u32, u32),
    pattern: FramePattern,
    stopped: bool,
}

fn noise(len: usize) -> Vec<u8> {
    // xorshift64, fixed seed so runs are repeatable
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 24) as u8
        })
        .collect()
}

#[async_trait]
impl VideoStream for FakeStream {
    fn has_active_track(&self) -> bool {
        !self.stopped && self.probe.track_active.load(Ordering::SeqCst)
    }

    async fn next_frame(&mut self) -> Result<Frame, CaptureError> {
        let (width, height) = self.frame_size;
        let len = width as usize * height as usize * 3;
        let rgb = match self.pattern {
            FramePattern::Flat => vec![90; len],
            FramePattern::Noise => noise(len),
        };
        Frame::new(width, height, rgb)
    }

    fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            self.probe.stopped.fetch_add(1, Ordering::SeqCst);
        }
    }
}

pub fn photo(shot: ShotId) -> Selection {
    Selection::File {
        file: ImageFile::new(
            format!("{shot}.png"),
            "image/png",
            vec![0x89, b'P', b'N', b'G'],
        ),
        path: AcquisitionPath::Manual,
    }
}

/// Scenario form: contact details filled, photos left to the caller.
pub fn contact_form() -> FormSession {
    let mut form = FormSession::new();
    form.edit_field(ContactField::Email, "a@b.com");
    form.edit_field(ContactField::Phone, "5551234567");
    form.edit_field(ContactField::Address, "1 Main St");
    form
}

pub fn complete_form() -> FormSession {
    let mut form = contact_form();
    for shot in ShotId::ALL {
        form.select_file(shot, photo(shot)).unwrap();
    }
    form
}

/// Endpoint double that records payloads and answers with a canned result.
pub struct RecordingEndpoint {
    reply: Result<SubmissionResponse, SubmissionError>,
    pub received: Mutex<Vec<SubmissionPayload>>,
}

impl RecordingEndpoint {
    pub fn replying(
        reply: Result<SubmissionResponse, SubmissionError>,
    ) -> Self {
        Self {
            reply,
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.received.lock().unwrap().len()
    }
}

#[async_trait]
impl SubmissionEndpoint for RecordingEndpoint {
    async fn submit(
        &self,
        payload: SubmissionPayload,
    ) -> Result<SubmissionResponse, SubmissionError> {
        self.received.lock().unwrap().push(payload);
        self.reply.clone()
    }
}
