use thiserror::Error;

use crate::capture::domain::captured_frame::{CapturedFrame, SnapshotFormat};
use crate::shared::frame::Frame;
use crate::source::domain::video_source::{SourceError, VideoSource};

/// Serializes a raw frame into a portable encoded image.
pub trait FrameEncoder: Send {
    fn encode(&self, frame: &Frame) -> Result<Vec<u8>, Box<dyn std::error::Error>>;

    fn format(&self) -> SnapshotFormat;
}

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("failed to encode snapshot: {0}")]
    Encode(String),
}

/// Takes still snapshots from a live source.
///
/// The source keeps running; switching the display from live preview to the
/// snapshot is the caller's concern, not a stream operation.
pub struct FrameCapturer {
    encoder: Box<dyn FrameEncoder>,
}

impl FrameCapturer {
    pub fn new(encoder: Box<dyn FrameEncoder>) -> Self {
        Self { encoder }
    }

    /// Snapshot dimensions always equal the live frame's dimensions at
    /// capture time.
    pub fn capture(&self, source: &mut dyn VideoSource) -> Result<CapturedFrame, CaptureError> {
        let frame = source.read_frame()?;
        let bytes = self
            .encoder
            .encode(&frame)
            .map_err(|e| CaptureError::Encode(e.to_string()))?;
        Ok(CapturedFrame::new(
            bytes,
            frame.width(),
            frame.height(),
            self.encoder.format(),
        ))
    }
}
