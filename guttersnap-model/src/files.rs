use std::{fmt, sync::Arc};

use crate::shots::ShotId;

/// Upper bound for a single photograph, inclusive.
pub const MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

pub const JPEG_MIME: &str = "image/jpeg";

/// An image file as selected in the form, whichever path produced it.
///
/// The payload is reference counted so state snapshots stay cheap to clone.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub mime: String,
    pub data: Arc<[u8]>,
}

impl ImageFile {
    pub fn new(
        name: impl Into<String>,
        mime: impl Into<String>,
        data: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            data: data.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn has_image_mime(&self) -> bool {
        self.mime.starts_with("image/")
    }
}

impl fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFile")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("size", &self.data.len())
            .finish()
    }
}

/// A still produced by the camera for one shot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    pub shot: ShotId,
    pub file: ImageFile,
}

impl CapturedImage {
    /// Wrap JPEG bytes under the conventional `<shotId>.jpg` name.
    pub fn jpeg(shot: ShotId, bytes: Vec<u8>) -> Self {
        Self {
            shot,
            file: ImageFile::new(format!("{shot}.jpg"), JPEG_MIME, bytes),
        }
    }

    pub fn source_name(&self) -> &str {
        &self.file.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captured_jpeg_is_named_after_shot() {
        let image = CapturedImage::jpeg(ShotId::RearLeftCorner, vec![1, 2, 3]);
        assert_eq!(image.source_name(), "rearLeftCorner.jpg");
        assert_eq!(image.file.mime, JPEG_MIME);
        assert_eq!(image.file.size(), 3);
        assert!(image.file.has_image_mime());
    }
}
