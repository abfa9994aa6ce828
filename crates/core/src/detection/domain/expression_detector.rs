use thiserror::Error;

use crate::detection::domain::expression::ExpressionScores;
use crate::shared::face_box::FaceBox;
use crate::shared::frame::Frame;

/// One detection cycle's output: a face and its expression confidences.
///
/// Transient: overwritten every cycle, never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectionResult {
    pub face: FaceBox,
    pub expressions: ExpressionScores,
}

/// Domain interface for per-frame face/expression inference.
///
/// Implementations may hold inference state, hence `&mut self`. At most one
/// face is reported per frame.
pub trait ExpressionDetector: Send {
    fn detect(&mut self, frame: &Frame)
        -> Result<Option<DetectionResult>, Box<dyn std::error::Error>>;
}

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("failed to resolve model asset: {0}")]
    Resolve(String),
    #[error("failed to initialize model: {0}")]
    Init(String),
}

/// Builds a detector from external model assets.
///
/// Loading may block on a network fetch or device initialization; callers
/// track progress through `ModelState`.
pub trait DetectorLoader: Send {
    fn load(&self) -> Result<Box<dyn ExpressionDetector>, ModelError>;
}
