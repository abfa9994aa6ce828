use crate::overlay::domain::annotation::Annotation;
use crate::overlay::domain::overlay_renderer::OverlayRenderer;
use crate::overlay::infrastructure::font;
use crate::shared::face_box::FaceBox;
use crate::shared::frame::Frame;

const DEFAULT_BOX_COLOR: [u8; 3] = [64, 220, 120];
const DEFAULT_TEXT_COLOR: [u8; 3] = [255, 255, 255];
const DEFAULT_TEXT_SCALE: usize = 3;
const DEFAULT_STROKE: u32 = 2;

/// CPU overlay renderer: rectangle outline plus a bitmap-font label
/// centered horizontally at the annotation's vertical offset.
pub struct BitmapOverlayRenderer {
    box_color: [u8; 3],
    text_color: [u8; 3],
    text_scale: usize,
    stroke: u32,
}

impl BitmapOverlayRenderer {
    pub fn new() -> Self {
        Self {
            box_color: DEFAULT_BOX_COLOR,
            text_color: DEFAULT_TEXT_COLOR,
            text_scale: DEFAULT_TEXT_SCALE,
            stroke: DEFAULT_STROKE,
        }
    }

    pub fn with_colors(mut self, box_color: [u8; 3], text_color: [u8; 3]) -> Self {
        self.box_color = box_color;
        self.text_color = text_color;
        self
    }
}

impl Default for BitmapOverlayRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayRenderer for BitmapOverlayRenderer {
    fn render(&self, frame: &Frame, annotation: Option<&Annotation>) -> Frame {
        let mut out = frame.clone();
        let Some(ann) = annotation else {
            return out;
        };

        draw_box_outline(&mut out, &ann.face, self.box_color, self.stroke);

        let width = font::text_width(&ann.label, self.text_scale) as i64;
        let x = (i64::from(out.width()) - width) / 2;
        font::draw_text(
            &mut out,
            x,
            i64::from(ann.label_offset_y),
            &ann.label,
            self.text_color,
            self.text_scale,
        );
        out
    }
}

fn draw_box_outline(frame: &mut Frame, face: &FaceBox, color: [u8; 3], stroke: u32) {
    let x1 = face.x.round() as i64;
    let y1 = face.y.round() as i64;
    let x2 = (face.x + face.width).round() as i64;
    let y2 = (face.y + face.height).round() as i64;
    let s = i64::from(stroke.max(1));

    for t in 0..s {
        // top and bottom edges
        for x in x1..=x2 {
            frame.set_pixel(x, y1 + t, color);
            frame.set_pixel(x, y2 - t, color);
        }
        // left and right edges
        for y in y1..=y2 {
            frame.set_pixel(x1 + t, y, color);
            frame.set_pixel(x2 - t, y, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::domain::annotation::LABEL_TOP_OFFSET;

    fn annotation(face: FaceBox, label: &str) -> Annotation {
        Annotation {
            face,
            label: label.to_string(),
            label_offset_y: LABEL_TOP_OFFSET,
        }
    }

    #[test]
    fn test_render_without_annotation_is_a_plain_copy() {
        let frame = Frame::filled(32, 32, [7, 7, 7]);
        let out = BitmapOverlayRenderer::new().render(&frame, None);
        assert_eq!(out, frame);
    }

    #[test]
    fn test_render_does_not_mutate_input() {
        let frame = Frame::filled(64, 64, [0, 0, 0]);
        let ann = annotation(FaceBox::new(10.0, 10.0, 20.0, 20.0), "happy: 82%");
        let _ = BitmapOverlayRenderer::new().render(&frame, Some(&ann));
        assert_eq!(frame, Frame::filled(64, 64, [0, 0, 0]));
    }

    #[test]
    fn test_render_draws_box_edges() {
        let frame = Frame::filled(64, 64, [0, 0, 0]);
        let ann = annotation(FaceBox::new(10.0, 40.0, 20.0, 20.0), "");
        let out = BitmapOverlayRenderer::new().render(&frame, Some(&ann));

        assert_eq!(out.pixel(10, 40), DEFAULT_BOX_COLOR); // top-left corner
        assert_eq!(out.pixel(30, 60), DEFAULT_BOX_COLOR); // bottom-right corner
        assert_eq!(out.pixel(20, 40), DEFAULT_BOX_COLOR); // top edge
        assert_eq!(out.pixel(10, 50), DEFAULT_BOX_COLOR); // left edge
        assert_eq!(out.pixel(20, 50), [0, 0, 0]); // interior untouched
    }

    #[test]
    fn test_render_centers_label_horizontally() {
        let frame = Frame::filled(200, 100, [0, 0, 0]);
        let ann = annotation(FaceBox::new(0.0, 50.0, 10.0, 10.0), "0");
        let out = BitmapOverlayRenderer::new().render(&frame, Some(&ann));

        // One glyph at scale 3 is 12px wide → starts at (200 - 12) / 2 = 94.
        // '0' lights its top-left corner.
        assert_eq!(out.pixel(94, LABEL_TOP_OFFSET), DEFAULT_TEXT_COLOR);
        // Left half before the label stays untouched at that row.
        assert_eq!(out.pixel(10, LABEL_TOP_OFFSET), [0, 0, 0]);
    }

    #[test]
    fn test_render_clips_box_partially_outside() {
        let frame = Frame::filled(32, 32, [0, 0, 0]);
        // A clamped-to-edge box still renders without panicking.
        let ann = annotation(FaceBox::new(24.0, 24.0, 8.0, 8.0), "");
        let out = BitmapOverlayRenderer::new().render(&frame, Some(&ann));
        assert_eq!(out.pixel(24, 24), DEFAULT_BOX_COLOR);
    }

    #[test]
    fn test_custom_colors() {
        let frame = Frame::filled(32, 32, [0, 0, 0]);
        let ann = annotation(FaceBox::new(4.0, 4.0, 8.0, 8.0), "");
        let out = BitmapOverlayRenderer::new()
            .with_colors([200, 0, 0], [0, 0, 200])
            .render(&frame, Some(&ann));
        assert_eq!(out.pixel(4, 4), [200, 0, 0]);
    }
}
