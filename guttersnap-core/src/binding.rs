//! The canonical shot → file mapping.
//!
//! Camera captures and manual picks both land here through
//! [`FileBinding::select`], the only mutation entry point. Every call emits
//! one [`SelectionChange`] to the registered listeners, so previews and
//! validation react the same way regardless of where the file came from.

use std::{collections::BTreeMap, fmt};

use guttersnap_model::{CapturedImage, ImageFile, MAX_FILE_BYTES, ShotId};
use tracing::{debug, info};

use crate::error::FileRejected;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionPath {
    Camera,
    Manual,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    File {
        file: ImageFile,
        path: AcquisitionPath,
    },
    Cleared,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundFile {
    pub file: ImageFile,
    pub path: AcquisitionPath,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionStatus {
    Selected {
        name: String,
        path: AcquisitionPath,
    },
    Rejected(FileRejected),
    Cleared,
}

/// Notification emitted after every [`FileBinding::select`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChange {
    pub shot: ShotId,
    pub status: SelectionStatus,
}

pub type SelectionListener = Box<dyn FnMut(&SelectionChange) + Send>;

/// Per-file acceptance rule: at most 10 MiB and an `image/*` mime type.
pub fn check_file(file: &ImageFile) -> Result<(), FileRejected> {
    if file.size() > MAX_FILE_BYTES {
        return Err(FileRejected::TooLarge { size: file.size() });
    }
    if !file.has_image_mime() {
        return Err(FileRejected::NotAnImage {
            mime: file.mime.clone(),
        });
    }
    Ok(())
}

#[derive(Default)]
pub struct FileBinding {
    files: BTreeMap<ShotId, BoundFile>,
    rejections: BTreeMap<ShotId, FileRejected>,
    listeners: Vec<SelectionListener>,
}

impl fmt::Debug for FileBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileBinding")
            .field("files", &self.files)
            .field("rejections", &self.rejections)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl FileBinding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_change<F>(&mut self, listener: F)
    where
        F: FnMut(&SelectionChange) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Replace whatever is bound for `shot`. The most recent call wins,
    /// whichever path it came from. A rejected file also clears the
    /// previous selection for that shot.
    pub fn select(
        &mut self,
        shot: ShotId,
        selection: Selection,
    ) -> Result<(), FileRejected> {
        let (status, outcome) = match selection {
            Selection::File { file, path } => match check_file(&file) {
                Ok(()) => {
                    debug!(
                        shot = %shot,
                        file = %file.name,
                        size = file.size(),
                        ?path,
                        "file bound"
                    );
                    let status = SelectionStatus::Selected {
                        name: file.name.clone(),
                        path,
                    };
                    self.rejections.remove(&shot);
                    self.files.insert(shot, BoundFile { file, path });
                    (status, Ok(()))
                }
                Err(rejected) => {
                    info!(
                        shot = %shot,
                        file = %file.name,
                        reason = %rejected,
                        "file rejected"
                    );
                    self.files.remove(&shot);
                    self.rejections.insert(shot, rejected.clone());
                    (SelectionStatus::Rejected(rejected.clone()), Err(rejected))
                }
            },
            Selection::Cleared => {
                self.files.remove(&shot);
                self.rejections.remove(&shot);
                (SelectionStatus::Cleared, Ok(()))
            }
        };

        let change = SelectionChange { shot, status };
        for listener in &mut self.listeners {
            listener(&change);
        }
        outcome
    }

    /// Route a camera still through the same entry point as a manual pick.
    pub fn bind_capture(
        &mut self,
        image: CapturedImage,
    ) -> Result<(), FileRejected> {
        self.select(
            image.shot,
            Selection::File {
                file: image.file,
                path: AcquisitionPath::Camera,
            },
        )
    }

    pub fn get(&self, shot: ShotId) -> Option<&BoundFile> {
        self.files.get(&shot)
    }

    pub fn file(&self, shot: ShotId) -> Option<&ImageFile> {
        self.files.get(&shot).map(|bound| &bound.file)
    }

    /// User-visible reason the last selection for `shot` was refused.
    pub fn rejection(&self, shot: ShotId) -> Option<&FileRejected> {
        self.rejections.get(&shot)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Bound files in capture walk order.
    pub fn iter(&self) -> impl Iterator<Item = (ShotId, &BoundFile)> {
        self.files.iter().map(|(shot, bound)| (*shot, bound))
    }

    pub fn shots(&self) -> impl Iterator<Item = ShotId> + '_ {
        self.files.keys().copied()
    }

    /// Plain shot → file map for validation and submission.
    pub fn snapshot(&self) -> BTreeMap<ShotId, ImageFile> {
        self.files
            .iter()
            .map(|(shot, bound)| (*shot, bound.file.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn manual(name: &str, mime: &str, size: usize) -> Selection {
        Selection::File {
            file: ImageFile::new(name, mime, vec![7u8; size]),
            path: AcquisitionPath::Manual,
        }
    }

    #[test]
    fn size_limit_is_inclusive() {
        let at_limit =
            ImageFile::new("a.jpg", "image/jpeg", vec![0u8; MAX_FILE_BYTES as usize]);
        let over =
            ImageFile::new("b.jpg", "image/jpeg", vec![0u8; MAX_FILE_BYTES as usize + 1]);

        assert_eq!(check_file(&at_limit), Ok(()));
        assert_eq!(
            check_file(&over),
            Err(FileRejected::TooLarge {
                size: MAX_FILE_BYTES + 1
            })
        );
    }

    #[test]
    fn non_image_is_rejected_regardless_of_size() {
        let tiny = ImageFile::new("notes.txt", "text/plain", vec![1u8]);
        assert!(matches!(
            check_file(&tiny),
            Err(FileRejected::NotAnImage { .. })
        ));

        let png = ImageFile::new("swatch.png", "image/png", vec![0u8; 1024]);
        assert_eq!(check_file(&png), Ok(()));
    }

    #[test]
    fn recapture_replaces_manual_pick() {
        let mut binding = FileBinding::new();
        binding
            .select(ShotId::Rear, manual("rear-old.png", "image/png", 16))
            .unwrap();
        binding
            .bind_capture(CapturedImage::jpeg(ShotId::Rear, vec![1, 2, 3]))
            .unwrap();

        assert_eq!(binding.len(), 1);
        let bound = binding.get(ShotId::Rear).unwrap();
        assert_eq!(bound.path, AcquisitionPath::Camera);
        assert_eq!(bound.file.name, "rear.jpg");
    }

    #[test]
    fn manual_pick_replaces_capture() {
        let mut binding = FileBinding::new();
        binding
            .bind_capture(CapturedImage::jpeg(ShotId::Front, vec![1]))
            .unwrap();
        binding
            .select(ShotId::Front, manual("front.heic", "image/heic", 4))
            .unwrap();

        let bound = binding.get(ShotId::Front).unwrap();
        assert_eq!(bound.path, AcquisitionPath::Manual);
        assert_eq!(bound.file.name, "front.heic");
    }

    #[test]
    fn rejected_file_clears_previous_selection() {
        let mut binding = FileBinding::new();
        binding
            .select(ShotId::LeftSide, manual("ok.jpg", "image/jpeg", 8))
            .unwrap();
        let err = binding
            .select(ShotId::LeftSide, manual("doc.pdf", "application/pdf", 8))
            .unwrap_err();

        assert!(matches!(err, FileRejected::NotAnImage { .. }));
        assert!(binding.file(ShotId::LeftSide).is_none());
        assert_eq!(binding.rejection(ShotId::LeftSide), Some(&err));
        assert_eq!(err.to_string(), "Please select an image file");
    }

    #[test]
    fn listeners_see_both_paths_identically() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut binding = FileBinding::new();
        let sink = Arc::clone(&seen);
        binding.on_change(move |change| {
            sink.lock().unwrap().push(change.clone());
        });

        binding
            .select(ShotId::Rear, manual("rear.png", "image/png", 2))
            .unwrap();
        binding
            .bind_capture(CapturedImage::jpeg(ShotId::Rear, vec![9]))
            .unwrap();
        binding.select(ShotId::Rear, Selection::Cleared).unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                SelectionChange {
                    shot: ShotId::Rear,
                    status: SelectionStatus::Selected {
                        name: "rear.png".into(),
                        path: AcquisitionPath::Manual
                    }
                },
                SelectionChange {
                    shot: ShotId::Rear,
                    status: SelectionStatus::Selected {
                        name: "rear.jpg".into(),
                        path: AcquisitionPath::Camera
                    }
                },
                SelectionChange {
                    shot: ShotId::Rear,
                    status: SelectionStatus::Cleared
                },
            ]
        );
    }
}
