//! Face and expression inference via ONNX Runtime.
//!
//! Two sessions: an Ultraface localizer that scores candidate boxes, and a
//! FER+ classifier run on the best face crop. Only the single
//! highest-confidence face is reported per frame.

use std::path::Path;

use ndarray::Array4;

use crate::detection::domain::expression::{Expression, ExpressionScores};
use crate::detection::domain::expression_detector::{DetectionResult, ExpressionDetector};
use crate::shared::face_box::FaceBox;
use crate::shared::frame::Frame;

/// Ultraface RFB-320 input resolution.
const FACE_INPUT_WIDTH: u32 = 320;
const FACE_INPUT_HEIGHT: u32 = 240;

/// FER+ classifier input edge (64x64 grayscale).
const EXPRESSION_INPUT_SIZE: u32 = 64;

/// Default face confidence threshold.
pub const DEFAULT_CONFIDENCE: f32 = 0.7;

/// Context added around the detected box before classification.
const CROP_MARGIN: f32 = 0.2;

pub struct OnnxExpressionDetector {
    face_session: ort::session::Session,
    expression_session: ort::session::Session,
    confidence: f32,
}

impl OnnxExpressionDetector {
    pub fn new(
        face_model: &Path,
        expression_model: &Path,
        confidence: f32,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let face_session = ort::session::Session::builder()?.commit_from_file(face_model)?;
        let expression_session =
            ort::session::Session::builder()?.commit_from_file(expression_model)?;
        Ok(Self {
            face_session,
            expression_session,
            confidence,
        })
    }

    fn best_face(
        &mut self,
        frame: &Frame,
    ) -> Result<Option<(FaceBox, f32)>, Box<dyn std::error::Error>> {
        let input = face_input_tensor(frame);
        let value = ort::value::Tensor::from_array(input)?;
        let outputs = self.face_session.run(ort::inputs![value])?;
        if outputs.len() < 2 {
            return Err("face model produced too few outputs".into());
        }

        // scores: [1, N, 2] (background, face); boxes: [1, N, 4] normalized corners
        let scores = outputs[0].try_extract_array::<f32>()?;
        let boxes = outputs[1].try_extract_array::<f32>()?;
        let scores = scores.as_slice().ok_or("face scores are not contiguous")?;
        let boxes = boxes.as_slice().ok_or("face boxes are not contiguous")?;

        Ok(select_best_face(
            scores,
            boxes,
            self.confidence,
            frame.width(),
            frame.height(),
        ))
    }

    fn classify(
        &mut self,
        frame: &Frame,
        face: &FaceBox,
    ) -> Result<ExpressionScores, Box<dyn std::error::Error>> {
        let input = expression_input_tensor(frame, face);
        let value = ort::value::Tensor::from_array(input)?;
        let outputs = self.expression_session.run(ort::inputs![value])?;
        if outputs.len() == 0 {
            return Err("expression model produced no outputs".into());
        }

        let logits = outputs[0].try_extract_array::<f32>()?;
        let logits = logits
            .as_slice()
            .ok_or("expression logits are not contiguous")?;
        if logits.len() != Expression::ALL.len() {
            return Err(format!(
                "unexpected expression output length: {} (want {})",
                logits.len(),
                Expression::ALL.len()
            )
            .into());
        }
        Ok(ExpressionScores::from_logits(logits))
    }
}

impl ExpressionDetector for OnnxExpressionDetector {
    fn detect(
        &mut self,
        frame: &Frame,
    ) -> Result<Option<DetectionResult>, Box<dyn std::error::Error>> {
        let Some((face, _score)) = self.best_face(frame)? else {
            return Ok(None);
        };
        let expressions = self.classify(frame, &face)?;
        Ok(Some(DetectionResult { face, expressions }))
    }
}

/// Ultraface preprocessing: resize to 320x240, normalize to roughly
/// `[-1, 1]`, NCHW float32.
fn face_input_tensor(frame: &Frame) -> Array4<f32> {
    let resized = resize_rgb(frame, FACE_INPUT_WIDTH, FACE_INPUT_HEIGHT);
    let mut input = Array4::<f32>::zeros((
        1,
        3,
        FACE_INPUT_HEIGHT as usize,
        FACE_INPUT_WIDTH as usize,
    ));
    for (x, y, pixel) in resized.enumerate_pixels() {
        for c in 0..3 {
            input[[0, c, y as usize, x as usize]] = (f32::from(pixel.0[c]) - 127.0) / 128.0;
        }
    }
    input
}

/// FER+ preprocessing: square crop around the face, 64x64 grayscale,
/// raw `[0, 255]` values, NCHW float32.
fn expression_input_tensor(frame: &Frame, face: &FaceBox) -> Array4<f32> {
    let crop = face
        .square_expanded(CROP_MARGIN)
        .clamped_to(frame.width(), frame.height());
    let img = rgb_image(frame);
    let cropped = image::imageops::crop_imm(
        &img,
        crop.x as u32,
        crop.y as u32,
        (crop.width as u32).max(1),
        (crop.height as u32).max(1),
    )
    .to_image();
    let resized = image::imageops::resize(
        &cropped,
        EXPRESSION_INPUT_SIZE,
        EXPRESSION_INPUT_SIZE,
        image::imageops::FilterType::Triangle,
    );
    let gray = image::imageops::grayscale(&resized);

    let size = EXPRESSION_INPUT_SIZE as usize;
    let mut input = Array4::<f32>::zeros((1, 1, size, size));
    for (x, y, pixel) in gray.enumerate_pixels() {
        input[[0, 0, y as usize, x as usize]] = f32::from(pixel.0[0]);
    }
    input
}

/// Picks the highest-scoring candidate above the threshold and maps its
/// normalized corners into frame pixels. Zero-or-one face by construction.
fn select_best_face(
    scores: &[f32],
    boxes: &[f32],
    confidence: f32,
    frame_width: u32,
    frame_height: u32,
) -> Option<(FaceBox, f32)> {
    let candidates = scores.len() / 2;
    let mut best: Option<(usize, f32)> = None;
    for i in 0..candidates.min(boxes.len() / 4) {
        let score = scores[i * 2 + 1];
        if score < confidence {
            continue;
        }
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((i, score));
        }
    }

    let (i, score) = best?;
    let face = FaceBox::from_corners(
        boxes[i * 4] * frame_width as f32,
        boxes[i * 4 + 1] * frame_height as f32,
        boxes[i * 4 + 2] * frame_width as f32,
        boxes[i * 4 + 3] * frame_height as f32,
    )
    .clamped_to(frame_width, frame_height);
    if face.is_empty() {
        return None;
    }
    Some((face, score))
}

fn rgb_image(frame: &Frame) -> image::RgbImage {
    image::RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
        .expect("Frame data length must match dimensions")
}

fn resize_rgb(frame: &Frame, width: u32, height: u32) -> image::RgbImage {
    image::imageops::resize(
        &rgb_image(frame),
        width,
        height,
        image::imageops::FilterType::Triangle,
    )
}
