/// Lifecycle of the external detector bundle.
///
/// Moves through `NotLoaded → Loading → Loaded | Failed` once per session.
/// A failed load is terminal; there is no retry path.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum ModelState {
    #[default]
    NotLoaded,
    Loading,
    Loaded,
    Failed(String),
}

impl ModelState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, ModelState::Loaded)
    }

    /// Loaded or Failed: no further transitions happen.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ModelState::Loaded | ModelState::Failed(_))
    }
}
