use image::{ExtendedColorType, codecs::jpeg::JpegEncoder};

use guttersnap_model::{CapturedImage, ShotId};

use crate::error::CaptureError;

/// JPEG quality used for every camera still (0.9 on a 0..1 scale).
pub const JPEG_QUALITY: u8 = 90;

/// One decoded video frame at the stream's native resolution, packed RGB8.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
}

impl Frame {
    pub fn new(
        width: u32,
        height: u32,
        rgb: Vec<u8>,
    ) -> Result<Self, CaptureError> {
        let expected = width as usize * height as usize * 3;
        if width == 0 || height == 0 || rgb.len() != expected {
            return Err(CaptureError::MalformedFrame {
                width,
                height,
                expected,
                actual: rgb.len(),
            });
        }

        Ok(Self { width, height, rgb })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_rgb(&self) -> &[u8] {
        &self.rgb
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Encode a frame as JPEG without rescaling.
pub fn encode_jpeg(frame: &Frame) -> Result<Vec<u8>, CaptureError> {
    // Rough guess; JPEG at q90 is usually well under a tenth of raw RGB.
    let mut out = Vec::with_capacity(frame.rgb.len() / 8);
    {
        let mut encoder =
            JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
        encoder
            .encode(
                &frame.rgb,
                frame.width,
                frame.height,
                ExtendedColorType::Rgb8,
            )
            .map_err(|err| CaptureError::Encode(err.to_string()))?;
    }
    Ok(out)
}

/// Turn a frame into the still for `shot`. Either a whole file or an error.
pub fn capture_still(
    shot: ShotId,
    frame: &Frame,
) -> Result<CapturedImage, CaptureError> {
    let bytes = encode_jpeg(frame)?;
    Ok(CapturedImage::jpeg(shot, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use guttersnap_model::JPEG_MIME;

    fn gradient(width: u32, height: u32) -> Frame {
        let mut rgb = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                rgb.extend_from_slice(&[(x * 4) as u8, (y * 4) as u8, 128]);
            }
        }
        Frame::new(width, height, rgb).unwrap()
    }

    #[test]
    fn still_keeps_native_resolution() {
        let frame = gradient(64, 48);
        let still = capture_still(ShotId::Rear, &frame).unwrap();

        assert_eq!(still.shot, ShotId::Rear);
        assert_eq!(still.file.name, "rear.jpg");
        assert_eq!(still.file.mime, JPEG_MIME);

        let decoded = image::load_from_memory(&still.file.data).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 48));
    }

    #[test]
    fn short_buffer_is_rejected_before_encoding() {
        let err = Frame::new(4, 4, vec![0; 10]).unwrap_err();
        assert_eq!(
            err,
            CaptureError::MalformedFrame {
                width: 4,
                height: 4,
                expected: 48,
                actual: 10
            }
        );
    }

    #[test]
    fn zero_sized_frame_is_rejected() {
        assert!(Frame::new(0, 10, Vec::new()).is_err());
    }
}
