pub const FACE_MODEL_NAME: &str = "version-RFB-320.onnx";
pub const FACE_MODEL_URL: &str =
    "https://github.com/onnx/models/raw/main/validated/vision/body_analysis/ultraface/models/version-RFB-320.onnx";

pub const EXPRESSION_MODEL_NAME: &str = "emotion-ferplus-8.onnx";
pub const EXPRESSION_MODEL_URL: &str =
    "https://github.com/onnx/models/raw/main/validated/vision/body_analysis/emotion_ferplus/model/emotion-ferplus-8.onnx";

/// Default resolution requested from the camera.
pub const DEFAULT_CAPTURE_WIDTH: u32 = 1280;
pub const DEFAULT_CAPTURE_HEIGHT: u32 = 720;

/// Default URL of the snapshot file-write endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:3001/api/photos";

/// Extension given to every persisted snapshot.
pub const PHOTO_EXTENSION: &str = "png";

/// Length of the random hex stem in persisted snapshot filenames.
pub const PHOTO_NAME_HEX_CHARS: usize = 16;
