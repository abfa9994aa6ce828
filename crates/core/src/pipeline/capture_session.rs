use crate::capture::domain::captured_frame::CapturedFrame;
use crate::capture::domain::frame_capturer::{CaptureError, FrameCapturer};
use crate::persistence::domain::persistence_client::PersistenceClient;
use crate::persistence::domain::save_state::SaveState;
use crate::source::domain::source_manager::SourceManager;
use crate::source::domain::video_source::{SourceConstraints, SourceError, SourceProvider};

/// The photo-booth state machine: live preview → snapshot → save.
///
/// Owns the camera (through a [`SourceManager`]), one optional snapshot,
/// and the save lifecycle. Retake drops the snapshot and the saved-file
/// reference, then re-acquires a fresh stream; the previous stream's tracks
/// are all stopped first. A save is refused while one is in flight or after
/// a success; a failed save keeps the snapshot and stays retryable.
pub struct CaptureSession {
    sources: SourceManager,
    capturer: FrameCapturer,
    client: Box<dyn PersistenceClient>,
    constraints: SourceConstraints,
    captured: Option<CapturedFrame>,
    save: SaveState,
}

impl CaptureSession {
    pub fn new(
        provider: Box<dyn SourceProvider>,
        capturer: FrameCapturer,
        client: Box<dyn PersistenceClient>,
        constraints: SourceConstraints,
    ) -> Self {
        Self {
            sources: SourceManager::new(provider),
            capturer,
            client,
            constraints,
            captured: None,
            save: SaveState::Idle,
        }
    }

    /// Acquires the camera stream.
    pub fn start(&mut self) -> Result<(), SourceError> {
        self.sources.acquire(&self.constraints)
    }

    pub fn is_live(&self) -> bool {
        self.sources.is_active()
    }

    pub fn captured(&self) -> Option<&CapturedFrame> {
        self.captured.as_ref()
    }

    pub fn save_state(&self) -> &SaveState {
        &self.save
    }

    /// Takes a snapshot of the current frame. The stream keeps running;
    /// switching the display to review mode is the caller's concern.
    pub fn capture(&mut self) -> Result<&CapturedFrame, CaptureError> {
        let source = self
            .sources
            .active_mut()
            .ok_or_else(|| CaptureError::Source(SourceError::Stream("no active stream".into())))?;
        let snapshot = self.capturer.capture(source)?;
        log::debug!(
            "captured {}x{} snapshot",
            snapshot.width(),
            snapshot.height()
        );
        self.save = SaveState::Idle;
        Ok(self.captured.insert(snapshot))
    }

    /// Sends the snapshot to the file-write endpoint.
    ///
    /// A no-op while a save is in flight or after a success, and when
    /// nothing has been captured yet. Failures are logged, the snapshot is
    /// retained, and the state returns to actionable.
    pub fn save(&mut self) -> &SaveState {
        if !self.save.can_save() {
            return &self.save;
        }
        let Some(snapshot) = self.captured.as_ref() else {
            log::warn!("save requested with no snapshot");
            return &self.save;
        };

        self.save = SaveState::Saving;
        match self.client.save(snapshot) {
            Ok(saved) => {
                log::info!("snapshot saved as {}", saved.file_name);
                self.save = SaveState::Saved(saved.file_name);
            }
            Err(e) => {
                log::error!("snapshot save failed: {e}");
                self.save = SaveState::Failed(e.to_string());
            }
        }
        &self.save
    }

    /// Discards the snapshot and any saved-file reference, then re-acquires
    /// a fresh stream (release-then-acquire, never reuse).
    pub fn retake(&mut self) -> Result<(), SourceError> {
        self.captured = None;
        self.save = SaveState::Idle;
        self.sources.acquire(&self.constraints)
    }

    /// Stops all tracks. The session stays usable via `start`.
    pub fn shutdown(&mut self) {
        self.sources.release();
    }
}
