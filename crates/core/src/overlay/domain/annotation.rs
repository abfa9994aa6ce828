use crate::detection::domain::expression::Expression;
use crate::detection::domain::expression_detector::DetectionResult;
use crate::shared::face_box::FaceBox;

/// Vertical offset of the expression label from the top of the display.
pub const LABEL_TOP_OFFSET: u32 = 24;

/// Pure overlay layout for one detection cycle.
///
/// The face box is mapped from the coordinate space the detector ran in to
/// the display surface; the label carries the dominant expression with its
/// confidence as an integer percentage. Horizontal centering is left to the
/// renderer, which knows its font metrics.
#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    pub face: FaceBox,
    pub label: String,
    pub label_offset_y: u32,
}

impl Annotation {
    pub fn from_result(
        result: &DetectionResult,
        source_size: (u32, u32),
        display_size: (u32, u32),
    ) -> Self {
        let sx = display_size.0 as f32 / source_size.0.max(1) as f32;
        let sy = display_size.1 as f32 / source_size.1.max(1) as f32;
        let face = result
            .face
            .scaled(sx, sy)
            .clamped_to(display_size.0, display_size.1);
        let (expression, score) = result.expressions.dominant();
        Self {
            face,
            label: format_label(expression, score),
            label_offset_y: LABEL_TOP_OFFSET,
        }
    }
}

/// `"<expression>: <NN>%"` with the confidence rounded to a whole percent.
pub fn format_label(expression: Expression, score: f32) -> String {
    format!("{}: {}%", expression.label(), (score * 100.0).round() as u32)
}
