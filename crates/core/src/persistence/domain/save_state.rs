/// Save lifecycle for one captured frame.
///
/// At most one save may be in flight; `can_save` gates the trigger while a
/// save runs and after a success. A failure keeps the state actionable so
/// the user can retry or retake.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum SaveState {
    #[default]
    Idle,
    Saving,
    Saved(String),
    Failed(String),
}

impl SaveState {
    pub fn can_save(&self) -> bool {
        matches!(self, SaveState::Idle | SaveState::Failed(_))
    }

    pub fn is_saving(&self) -> bool {
        matches!(self, SaveState::Saving)
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, SaveState::Saved(_))
    }

    /// Server-assigned filename, present only after a successful save.
    pub fn file_name(&self) -> Option<&str> {
        match self {
            SaveState::Saved(name) => Some(name),
            _ => None,
        }
    }
}
