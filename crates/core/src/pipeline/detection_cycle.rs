use crate::detection::domain::expression_detector::{DetectionResult, ExpressionDetector};
use crate::overlay::domain::annotation::Annotation;
use crate::overlay::domain::overlay_renderer::OverlayRenderer;
use crate::shared::frame::Frame;
use crate::source::domain::video_source::VideoSource;

/// Receives the annotated frame produced by each detection cycle.
pub trait FrameSink: Send {
    fn deliver(&mut self, frame: Frame, result: Option<&DetectionResult>);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The source wasn't delivering frames, or reading one failed.
    Skipped,
    /// A frame went through detect → annotate → deliver. A cycle with no
    /// face still renders (a blank overlay) and still counts as this.
    Rendered,
}

/// One iteration of the detection loop.
///
/// Owns the camera source, the detector, the renderer and the sink, so the
/// whole bundle can move onto a loop thread. Anything unexpected inside a
/// cycle is logged and skipped; the loop keeps breathing.
pub struct DetectionCycle {
    source: Box<dyn VideoSource>,
    detector: Box<dyn ExpressionDetector>,
    renderer: Box<dyn OverlayRenderer>,
    sink: Box<dyn FrameSink>,
}

impl DetectionCycle {
    pub fn new(
        source: Box<dyn VideoSource>,
        detector: Box<dyn ExpressionDetector>,
        renderer: Box<dyn OverlayRenderer>,
        sink: Box<dyn FrameSink>,
    ) -> Self {
        Self {
            source,
            detector,
            renderer,
            sink,
        }
    }

    pub fn run_once(&mut self) -> CycleOutcome {
        if !self.source.is_active() {
            return CycleOutcome::Skipped;
        }
        let frame = match self.source.read_frame() {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!("detection cycle skipped: {e}");
                return CycleOutcome::Skipped;
            }
        };

        let result = match self.detector.detect(&frame) {
            Ok(result) => result,
            Err(e) => {
                // Inference trouble renders as "no face" rather than
                // stopping the loop.
                log::warn!("detection failed, rendering blank overlay: {e}");
                None
            }
        };

        let size = (frame.width(), frame.height());
        let annotation = result
            .as_ref()
            .map(|r| Annotation::from_result(r, size, size));
        let rendered = self.renderer.render(&frame, annotation.as_ref());
        self.sink.deliver(rendered, result.as_ref());
        CycleOutcome::Rendered
    }

    /// Stops the camera tracks. Called by the loop runner on its way out.
    pub fn stop(&mut self) {
        self.source.stop();
    }

    pub fn into_detector(self) -> Box<dyn ExpressionDetector> {
        self.detector
    }
}
