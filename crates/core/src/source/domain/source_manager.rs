use super::video_source::{SourceConstraints, SourceError, SourceProvider, VideoSource};

/// Owns a page's single active camera source.
///
/// Acquiring always releases the previous source first, so two live device
/// handles never coexist and a restart cannot leak the hardware lock.
/// Re-acquisition is release-then-acquire; an existing source is never
/// mutated into a new one.
pub struct SourceManager {
    provider: Box<dyn SourceProvider>,
    active: Option<Box<dyn VideoSource>>,
}

impl SourceManager {
    pub fn new(provider: Box<dyn SourceProvider>) -> Self {
        Self {
            provider,
            active: None,
        }
    }

    pub fn acquire(&mut self, constraints: &SourceConstraints) -> Result<(), SourceError> {
        self.release();
        let source = self.provider.acquire(constraints)?;
        self.active = Some(source);
        Ok(())
    }

    /// Stops all tracks of the active source, if any.
    pub fn release(&mut self) {
        if let Some(mut source) = self.active.take() {
            source.stop();
        }
    }

    pub fn active_mut(&mut self) -> Option<&mut dyn VideoSource> {
        self.active.as_deref_mut()
    }

    pub fn is_active(&self) -> bool {
        self.active.as_ref().is_some_and(|s| s.is_active())
    }

    /// Hands the active source to a caller that needs to own it (e.g. a
    /// loop running on its own thread).
    pub fn take(&mut self) -> Option<Box<dyn VideoSource>> {
        self.active.take()
    }
}

impl Drop for SourceManager {
    fn drop(&mut self) {
        self.release();
    }
}
