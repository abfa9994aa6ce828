use thiserror::Error;

use crate::shared::constants::{DEFAULT_CAPTURE_HEIGHT, DEFAULT_CAPTURE_WIDTH};
use crate::shared::frame::Frame;

/// Requested capture resolution. Devices deliver the nearest mode they
/// support, so the actual stream resolution may differ.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceConstraints {
    pub width: u32,
    pub height: u32,
}

impl Default for SourceConstraints {
    fn default() -> Self {
        Self {
            width: DEFAULT_CAPTURE_WIDTH,
            height: DEFAULT_CAPTURE_HEIGHT,
        }
    }
}

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("camera access denied")]
    PermissionDenied,
    #[error("no usable camera device")]
    DeviceUnavailable,
    #[error("camera stream error: {0}")]
    Stream(String),
}

/// An active camera stream handle.
///
/// Exclusively owned by whoever acquired it. `stop` must leave no live
/// device tracks behind and is safe to call more than once.
pub trait VideoSource: Send {
    /// Reads the most recent frame from the live stream.
    fn read_frame(&mut self) -> Result<Frame, SourceError>;

    /// Actual stream resolution.
    fn resolution(&self) -> (u32, u32);

    /// Whether the stream is still delivering frames.
    fn is_active(&self) -> bool;

    /// Stops all tracks.
    fn stop(&mut self);
}

/// Opens camera streams.
pub trait SourceProvider: Send {
    fn acquire(&self, constraints: &SourceConstraints)
        -> Result<Box<dyn VideoSource>, SourceError>;
}
