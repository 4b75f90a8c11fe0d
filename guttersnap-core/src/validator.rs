use std::collections::BTreeMap;

use guttersnap_model::{ContactFields, ImageFile, ShotId};

use crate::error::ValidationError;

/// Everything a submission is made of, independent of how files were
/// acquired.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionState {
    pub contact: ContactFields,
    pub images: BTreeMap<ShotId, ImageFile>,
}

impl SubmissionState {
    pub fn new(
        contact: ContactFields,
        images: BTreeMap<ShotId, ImageFile>,
    ) -> Self {
        Self { contact, images }
    }
}

/// Collect every missing required field and photo.
pub fn check(state: &SubmissionState) -> Result<(), ValidationError> {
    let missing = ValidationError {
        missing_fields: state.contact.missing_required(),
        missing_shots: ShotId::ALL
            .into_iter()
            .filter(|shot| {
                state.images.get(shot).is_none_or(|file| file.is_empty())
            })
            .collect(),
    };

    if missing.is_empty() {
        Ok(())
    } else {
        Err(missing)
    }
}

pub fn is_ready(state: &SubmissionState) -> bool {
    check(state).is_ok()
}

/// Presentation of the submit control. Purely cosmetic: submission
/// re-validates on its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubmitAffordance {
    pub enabled: bool,
    pub opacity: f32,
    pub cursor: &'static str,
    pub loading: bool,
}

impl SubmitAffordance {
    pub fn for_readiness(ready: bool) -> Self {
        if ready {
            Self {
                enabled: true,
                opacity: 1.0,
                cursor: "pointer",
                loading: false,
            }
        } else {
            Self {
                enabled: false,
                opacity: 0.6,
                cursor: "not-allowed",
                loading: false,
            }
        }
    }

    pub fn in_flight() -> Self {
        Self {
            enabled: false,
            loading: true,
            ..Self::for_readiness(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guttersnap_model::ContactField;

    const REQUIRED_ITEMS: usize = ShotId::ALL.len() + ContactField::REQUIRED.len();

    fn complete() -> SubmissionState {
        let contact = ContactFields {
            email: "a@b.com".into(),
            phone: "(555) 123-4567".into(),
            address: "1 Main St".into(),
            notes: String::new(),
        };
        let images = ShotId::ALL
            .into_iter()
            .map(|shot| {
                (shot, ImageFile::new(format!("{shot}.jpg"), "image/jpeg", vec![1u8]))
            })
            .collect();
        SubmissionState::new(contact, images)
    }

    /// Remove the items whose bit is set in `mask`.
    fn without(mask: u32) -> SubmissionState {
        let mut state = complete();
        for (bit, shot) in ShotId::ALL.into_iter().enumerate() {
            if mask & (1 << bit) != 0 {
                state.images.remove(&shot);
            }
        }
        for (offset, field) in ContactField::REQUIRED.into_iter().enumerate() {
            if mask & (1 << (ShotId::ALL.len() + offset)) != 0 {
                state.contact.set(field, "  ");
            }
        }
        state
    }

    #[test]
    fn complete_state_is_ready() {
        assert!(is_ready(&complete()));
    }

    #[test]
    fn ready_iff_nothing_missing_for_every_subset() {
        for mask in 0u32..(1 << REQUIRED_ITEMS) {
            let state = without(mask);
            let result = check(&state);
            assert_eq!(result.is_ok(), mask == 0, "mask {mask:#014b}");
            if let Err(err) = result {
                assert_eq!(
                    err.missing_fields.len() + err.missing_shots.len(),
                    mask.count_ones() as usize
                );
            }
        }
    }

    #[test]
    fn empty_file_counts_as_missing() {
        let mut state = complete();
        state.images.insert(
            ShotId::GutterSwatch,
            ImageFile::new("gutterSwatch.jpg", "image/jpeg", Vec::new()),
        );
        let err = check(&state).unwrap_err();
        assert_eq!(err.missing_shots, vec![ShotId::GutterSwatch]);
        assert_eq!(err.to_string(), "missing photos: gutterSwatch");
    }

    #[test]
    fn notes_never_blocks() {
        let mut state = complete();
        state.contact.notes = "   ".into();
        assert!(is_ready(&state));
    }

    #[test]
    fn affordance_tracks_readiness() {
        let ready = SubmitAffordance::for_readiness(true);
        assert!(ready.enabled);
        assert_eq!(ready.opacity, 1.0);

        let blocked = SubmitAffordance::for_readiness(false);
        assert!(!blocked.enabled);
        assert_eq!(blocked.opacity, 0.6);
        assert_eq!(blocked.cursor, "not-allowed");

        let busy = SubmitAffordance::in_flight();
        assert!(!busy.enabled && busy.loading);
    }
}
