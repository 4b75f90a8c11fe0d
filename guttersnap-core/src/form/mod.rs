//! The manual request form: contact fields plus the nine photo inputs.
//!
//! Readiness is recomputed after every field edit and every selection
//! change, including the ones the camera session pushes in.

pub mod input;

pub use input::{EmailHint, email_hint, format_phone};

use guttersnap_model::{CapturedImage, ContactField, ContactFields, ShotId};

use crate::{
    binding::{FileBinding, Selection, SelectionChange},
    error::FileRejected,
    validator::{self, SubmissionState, SubmitAffordance},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormPhase {
    #[default]
    Editing,
    Submitting,
    Submitted,
}

#[derive(Debug, Default)]
pub struct FormSession {
    contact: ContactFields,
    files: FileBinding,
    phase: FormPhase,
    ready: bool,
}

impl FormSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a keystroke-level edit. Returns the value as displayed, which
    /// differs from `raw` for the phone field.
    pub fn edit_field(&mut self, field: ContactField, raw: &str) -> &str {
        let value = match field {
            ContactField::Phone => format_phone(raw),
            _ => raw.to_string(),
        };
        self.contact.set(field, value);
        self.refresh();
        self.contact.get(field)
    }

    pub fn select_file(
        &mut self,
        shot: ShotId,
        selection: Selection,
    ) -> Result<(), FileRejected> {
        let outcome = self.files.select(shot, selection);
        self.refresh();
        outcome
    }

    /// Camera path into the same mapping the file inputs use.
    pub fn bind_capture(
        &mut self,
        image: CapturedImage,
    ) -> Result<(), FileRejected> {
        let outcome = self.files.bind_capture(image);
        self.refresh();
        outcome
    }

    /// Register a preview/status listener on the underlying binding.
    pub fn on_selection_change<F>(&mut self, listener: F)
    where
        F: FnMut(&SelectionChange) + Send + 'static,
    {
        self.files.on_change(listener);
    }

    pub fn contact(&self) -> &ContactFields {
        &self.contact
    }

    pub fn files(&self) -> &FileBinding {
        &self.files
    }

    pub fn email_hint(&self) -> EmailHint {
        email_hint(&self.contact.email)
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn affordance(&self) -> SubmitAffordance {
        match self.phase {
            FormPhase::Submitting => SubmitAffordance::in_flight(),
            FormPhase::Submitted => SubmitAffordance::for_readiness(false),
            FormPhase::Editing => SubmitAffordance::for_readiness(self.ready),
        }
    }

    pub fn snapshot(&self) -> SubmissionState {
        SubmissionState::new(self.contact.clone(), self.files.snapshot())
    }

    pub(crate) fn begin_submit(&mut self) {
        self.phase = FormPhase::Submitting;
    }

    pub(crate) fn finish_submit(&mut self, succeeded: bool) {
        self.phase = if succeeded {
            FormPhase::Submitted
        } else {
            FormPhase::Editing
        };
        self.refresh();
    }

    fn refresh(&mut self) {
        self.ready = validator::is_ready(&self.snapshot());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::AcquisitionPath;
    use guttersnap_model::ImageFile;

    fn jpeg(shot: ShotId) -> Selection {
        Selection::File {
            file: ImageFile::new(format!("{shot}.jpg"), "image/jpeg", vec![1u8; 32]),
            path: AcquisitionPath::Manual,
        }
    }

    fn filled() -> FormSession {
        let mut form = FormSession::new();
        form.edit_field(ContactField::Email, "a@b.com");
        form.edit_field(ContactField::Phone, "5551234567");
        form.edit_field(ContactField::Address, "1 Main St");
        form
    }

    #[test]
    fn phone_edits_are_formatted_for_display() {
        let mut form = FormSession::new();
        assert_eq!(form.edit_field(ContactField::Phone, "555123"), "(555) 123");
        assert_eq!(
            form.edit_field(ContactField::Phone, "5551234567"),
            "(555) 123-4567"
        );
        assert_eq!(form.contact().phone, "(555) 123-4567");
    }

    #[test]
    fn readiness_follows_manual_and_camera_selections() {
        let mut form = filled();
        for shot in &ShotId::ALL[..8] {
            form.select_file(*shot, jpeg(*shot)).unwrap();
        }
        assert!(!form.is_ready());
        assert!(!form.affordance().enabled);

        form.bind_capture(CapturedImage::jpeg(ShotId::GutterSwatch, vec![3; 8]))
            .unwrap();
        assert!(form.is_ready());
        assert!(form.affordance().enabled);

        form.select_file(ShotId::Front, Selection::Cleared).unwrap();
        assert!(!form.is_ready());
    }

    #[test]
    fn clearing_a_required_field_drops_readiness() {
        let mut form = filled();
        for shot in ShotId::ALL {
            form.select_file(shot, jpeg(shot)).unwrap();
        }
        assert!(form.is_ready());

        form.edit_field(ContactField::Address, "   ");
        assert!(!form.is_ready());
    }

    #[test]
    fn rejected_file_leaves_form_unready() {
        let mut form = filled();
        for shot in ShotId::ALL {
            form.select_file(shot, jpeg(shot)).unwrap();
        }
        let result = form.select_file(
            ShotId::Rear,
            Selection::File {
                file: ImageFile::new("rear.txt", "text/plain", vec![1u8]),
                path: AcquisitionPath::Manual,
            },
        );
        assert!(result.is_err());
        assert!(!form.is_ready());
    }
}
