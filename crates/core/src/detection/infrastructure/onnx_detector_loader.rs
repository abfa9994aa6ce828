use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::detection::domain::expression_detector::{DetectorLoader, ExpressionDetector, ModelError};
use crate::detection::infrastructure::model_resolver::{self, ProgressFn};
use crate::detection::infrastructure::onnx_expression_detector::{
    OnnxExpressionDetector, DEFAULT_CONFIDENCE,
};
use crate::shared::constants::{
    EXPRESSION_MODEL_NAME, EXPRESSION_MODEL_URL, FACE_MODEL_NAME, FACE_MODEL_URL,
};

/// Named-model download progress: `(model_name, bytes, total)`.
pub type NamedProgressFn = Arc<dyn Fn(&str, u64, u64) + Send + Sync>;

/// Resolves both model assets and builds the ONNX detector.
pub struct OnnxDetectorLoader {
    confidence: f32,
    bundled_dir: Option<PathBuf>,
    progress: Option<NamedProgressFn>,
}

impl OnnxDetectorLoader {
    pub fn new(confidence: f32) -> Self {
        Self {
            confidence,
            bundled_dir: None,
            progress: None,
        }
    }

    /// Directory checked for pre-packaged models before downloading.
    pub fn with_bundled_dir(mut self, dir: PathBuf) -> Self {
        self.bundled_dir = Some(dir);
        self
    }

    pub fn with_progress(mut self, progress: NamedProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    fn resolve(&self, name: &'static str, url: &str) -> Result<PathBuf, ModelError> {
        let progress: Option<ProgressFn> = self.progress.clone().map(|cb| {
            Box::new(move |downloaded, total| cb(name, downloaded, total)) as ProgressFn
        });
        model_resolver::resolve(name, url, self.bundled_dir.as_deref(), progress)
            .map_err(|e| ModelError::Resolve(e.to_string()))
    }
}

impl Default for OnnxDetectorLoader {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIDENCE)
    }
}

impl DetectorLoader for OnnxDetectorLoader {
    fn load(&self) -> Result<Box<dyn ExpressionDetector>, ModelError> {
        let face_model = self.resolve(FACE_MODEL_NAME, FACE_MODEL_URL)?;
        let expression_model = self.resolve(EXPRESSION_MODEL_NAME, EXPRESSION_MODEL_URL)?;
        let detector = build_detector(&face_model, &expression_model, self.confidence)?;
        Ok(Box::new(detector))
    }
}

fn build_detector(
    face_model: &Path,
    expression_model: &Path,
    confidence: f32,
) -> Result<OnnxExpressionDetector, ModelError> {
    OnnxExpressionDetector::new(face_model, expression_model, confidence)
        .map_err(|e| ModelError::Init(e.to_string()))
}
