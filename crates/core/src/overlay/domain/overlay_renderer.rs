use crate::overlay::domain::annotation::Annotation;
use crate::shared::frame::Frame;

/// Renders an annotation onto a copy of a frame.
///
/// The input frame is never mutated. A cycle without a detection yields an
/// unannotated copy (a blank overlay).
pub trait OverlayRenderer: Send {
    fn render(&self, frame: &Frame, annotation: Option<&Annotation>) -> Frame;
}
