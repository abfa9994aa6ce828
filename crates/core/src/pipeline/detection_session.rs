use thiserror::Error;

use crate::detection::domain::expression_detector::{DetectorLoader, ExpressionDetector};
use crate::detection::domain::model_state::ModelState;
use crate::overlay::domain::overlay_renderer::OverlayRenderer;
use crate::pipeline::detection_cycle::{DetectionCycle, FrameSink};
use crate::pipeline::infrastructure::loop_runner::{spawn_detection_loop, LoopHandle};
use crate::pipeline::ticker::TickSource;
use crate::source::domain::video_source::{SourceConstraints, SourceError, SourceProvider};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("model is not loaded")]
    ModelNotLoaded,
    #[error("detection loop already running")]
    AlreadyRunning,
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// The detection page's lifecycle: model load, then camera, then the loop.
///
/// Camera acquisition is sequenced strictly after the model reaches
/// `Loaded`, and no detection cycle ever runs before that. A failed load is
/// terminal: the session refuses to start and offers no retry.
pub struct DetectionSession {
    provider: Box<dyn SourceProvider>,
    constraints: SourceConstraints,
    model: ModelState,
    detector: Option<Box<dyn ExpressionDetector>>,
    handle: Option<LoopHandle>,
}

impl DetectionSession {
    pub fn new(provider: Box<dyn SourceProvider>, constraints: SourceConstraints) -> Self {
        Self {
            provider,
            constraints,
            model: ModelState::NotLoaded,
            detector: None,
            handle: None,
        }
    }

    pub fn model_state(&self) -> &ModelState {
        &self.model
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Drives `NotLoaded → Loading → Loaded | Failed`. One-shot: once a
    /// terminal state is reached, further calls return it unchanged.
    pub fn load_model(&mut self, loader: &dyn DetectorLoader) -> &ModelState {
        if self.model.is_terminal() {
            return &self.model;
        }
        self.model = ModelState::Loading;
        match loader.load() {
            Ok(detector) => {
                self.detector = Some(detector);
                self.model = ModelState::Loaded;
                log::info!("detection model loaded");
            }
            Err(e) => {
                log::error!("model load failed: {e}");
                self.model = ModelState::Failed(e.to_string());
            }
        }
        &self.model
    }

    /// Acquires the camera and starts the loop. Refused unless the model is
    /// `Loaded`.
    pub fn start(
        &mut self,
        renderer: Box<dyn OverlayRenderer>,
        sink: Box<dyn FrameSink>,
        ticks: Box<dyn TickSource>,
    ) -> Result<(), SessionError> {
        if !self.model.is_loaded() {
            return Err(SessionError::ModelNotLoaded);
        }
        if self.handle.is_some() {
            return Err(SessionError::AlreadyRunning);
        }
        let detector = self.detector.take().ok_or(SessionError::ModelNotLoaded)?;
        let source = self.provider.acquire(&self.constraints)?;
        let cycle = DetectionCycle::new(source, detector, renderer, sink);
        self.handle = Some(spawn_detection_loop(cycle, ticks));
        Ok(())
    }

    /// Cancels the pending cycle and stops all media tracks.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.stop();
            self.reclaim(handle);
        }
    }

    /// Waits for the loop to finish on its own (tick source exhausted).
    pub fn wait(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.reclaim(handle);
        }
    }

    fn reclaim(&mut self, handle: LoopHandle) {
        if let Some(cycle) = handle.join() {
            // The detector survives loop teardown, so the session can be
            // started again without reloading models.
            self.detector = Some(cycle.into_detector());
        }
    }
}

impl Drop for DetectionSession {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::detection::domain::expression_detector::{DetectionResult, ModelError};
    use crate::overlay::domain::annotation::Annotation;
    use crate::pipeline::infrastructure::tickers::ManualTicker;
    use crate::shared::frame::Frame;
    use crate::source::domain::video_source::VideoSource;

    struct StubSource {
        stopped: Arc<AtomicBool>,
    }

    impl VideoSource for StubSource {
        fn read_frame(&mut self) -> Result<Frame, SourceError> {
            Ok(Frame::filled(8, 8, [0, 0, 0]))
        }

        fn resolution(&self) -> (u32, u32) {
            (8, 8)
        }

        fn is_active(&self) -> bool {
            !self.stopped.load(Ordering::SeqCst)
        }

        fn stop(&mut self) {
            self.stopped.store(true, Ordering::SeqCst);
        }
    }

    struct StubProvider {
        acquisitions: Arc<AtomicUsize>,
        stop_flags: Arc<Mutex<Vec<Arc<AtomicBool>>>>,
    }

    impl StubProvider {
        fn new() -> Self {
            Self {
                acquisitions: Arc::new(AtomicUsize::new(0)),
                stop_flags: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl SourceProvider for StubProvider {
        fn acquire(
            &self,
            _constraints: &SourceConstraints,
        ) -> Result<Box<dyn VideoSource>, SourceError> {
            self.acquisitions.fetch_add(1, Ordering::SeqCst);
            let stopped = Arc::new(AtomicBool::new(false));
            self.stop_flags.lock().unwrap().push(stopped.clone());
            Ok(Box::new(StubSource { stopped }))
        }
    }

    struct StubDetectorLoader {
        fail: bool,
        detections: Arc<AtomicUsize>,
        load_calls: Arc<AtomicUsize>,
    }

    impl StubDetectorLoader {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                detections: Arc::new(AtomicUsize::new(0)),
                load_calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    struct CountingDetector {
        detections: Arc<AtomicUsize>,
    }

    impl ExpressionDetector for CountingDetector {
        fn detect(
            &mut self,
            _frame: &Frame,
        ) -> Result<Option<DetectionResult>, Box<dyn std::error::Error>> {
            self.detections.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        }
    }

    impl DetectorLoader for StubDetectorLoader {
        fn load(&self) -> Result<Box<dyn ExpressionDetector>, ModelError> {
            self.load_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ModelError::Resolve("404".to_string()));
            }
            Ok(Box::new(CountingDetector {
                detections: self.detections.clone(),
            }))
        }
    }

    struct NullRenderer;

    impl OverlayRenderer for NullRenderer {
        fn render(&self, frame: &Frame, _annotation: Option<&Annotation>) -> Frame {
            frame.clone()
        }
    }

    struct NullSink;

    impl FrameSink for NullSink {
        fn deliver(&mut self, _frame: Frame, _result: Option<&DetectionResult>) {}
    }

    fn session() -> (DetectionSession, Arc<AtomicUsize>, Arc<Mutex<Vec<Arc<AtomicBool>>>>) {
        let provider = StubProvider::new();
        let acquisitions = provider.acquisitions.clone();
        let stop_flags = provider.stop_flags.clone();
        (
            DetectionSession::new(Box::new(provider), SourceConstraints::default()),
            acquisitions,
            stop_flags,
        )
    }

    #[test]
    fn test_start_refused_before_model_is_loaded() {
        let (mut session, acquisitions, _) = session();
        let err = session
            .start(
                Box::new(NullRenderer),
                Box::new(NullSink),
                Box::new(ManualTicker::new().1),
            )
            .unwrap_err();
        assert!(matches!(err, SessionError::ModelNotLoaded));
        // No camera acquisition either: it is sequenced strictly after
        // loading.
        assert_eq!(acquisitions.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_zero_detection_calls_while_loading_or_failed() {
        let (mut session, _, _) = session();
        let loader = StubDetectorLoader::new(true);
        let detections = loader.detections.clone();

        assert!(matches!(
            session.load_model(&loader),
            ModelState::Failed(_)
        ));
        let result = session.start(
            Box::new(NullRenderer),
            Box::new(NullSink),
            Box::new(ManualTicker::new().1),
        );
        assert!(result.is_err());
        assert_eq!(detections.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_failed_load_is_terminal() {
        let (mut session, _, _) = session();
        let failing = StubDetectorLoader::new(true);
        session.load_model(&failing);

        // A later load with a working loader is a no-op: no retry path.
        let working = StubDetectorLoader::new(false);
        let state = session.load_model(&working).clone();
        assert!(matches!(state, ModelState::Failed(_)));
        assert_eq!(working.load_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_load_then_start_runs_cycles() {
        let (mut session, acquisitions, _) = session();
        let loader = StubDetectorLoader::new(false);
        let detections = loader.detections.clone();

        assert!(session.load_model(&loader).is_loaded());

        let (tx, ticks) = ManualTicker::new();
        session
            .start(Box::new(NullRenderer), Box::new(NullSink), Box::new(ticks))
            .unwrap();
        assert!(session.is_running());
        assert_eq!(acquisitions.load(Ordering::SeqCst), 1);

        for _ in 0..4 {
            tx.send(()).unwrap();
        }
        drop(tx);
        session.wait();

        assert_eq!(detections.load(Ordering::SeqCst), 4);
        assert!(!session.is_running());
    }

    #[test]
    fn test_stop_cancels_and_stops_tracks() {
        let (mut session, _, stop_flags) = session();
        let loader = StubDetectorLoader::new(false);
        session.load_model(&loader);

        let (tx, ticks) = ManualTicker::new();
        session
            .start(Box::new(NullRenderer), Box::new(NullSink), Box::new(ticks))
            .unwrap();
        // Cancel, then let the blocked tick wait unblock so the loop thread
        // can observe it and exit.
        drop(tx);
        session.stop();

        assert!(!session.is_running());
        assert!(stop_flags.lock().unwrap()[0].load(Ordering::SeqCst));
    }

    #[test]
    fn test_restart_after_stop_reuses_loaded_model() {
        let (mut session, acquisitions, _) = session();
        let loader = StubDetectorLoader::new(false);
        session.load_model(&loader);

        let (tx, ticks) = ManualTicker::new();
        session
            .start(Box::new(NullRenderer), Box::new(NullSink), Box::new(ticks))
            .unwrap();
        drop(tx);
        session.wait();

        // Second start succeeds without another loader call.
        let (tx2, ticks2) = ManualTicker::new();
        session
            .start(Box::new(NullRenderer), Box::new(NullSink), Box::new(ticks2))
            .unwrap();
        drop(tx2);
        session.wait();

        assert_eq!(loader.load_calls.load(Ordering::SeqCst), 1);
        assert_eq!(acquisitions.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_double_start_is_refused() {
        let (mut session, _, _) = session();
        let loader = StubDetectorLoader::new(false);
        session.load_model(&loader);

        let (_tx, ticks) = ManualTicker::new();
        session
            .start(Box::new(NullRenderer), Box::new(NullSink), Box::new(ticks))
            .unwrap();
        let err = session
            .start(
                Box::new(NullRenderer),
                Box::new(NullSink),
                Box::new(ManualTicker::new().1),
            )
            .unwrap_err();
        assert!(matches!(err, SessionError::AlreadyRunning));
    }
}
