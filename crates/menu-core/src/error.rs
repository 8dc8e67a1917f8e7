use thiserror::Error;

#[derive(Debug, Error)]
pub enum MenuError {
    #[error("menu item `{title}` has no icon, label or custom renderer")]
    MissingContent { title: String },
    #[error("unknown menu item `{0}`")]
    UnknownItem(String),
    #[error("no command is bound to `{0}`")]
    UnknownCommand(String),
    #[error("invalid key chord `{chord}`: {reason}")]
    InvalidChord { chord: String, reason: String },
    #[error("malformed menu config: {0}")]
    Config(#[from] serde_json::Error),
}

impl MenuError {
    pub(crate) fn invalid_chord(chord: &str, reason: impl Into<String>) -> Self {
        Self::InvalidChord {
            chord: chord.to_string(),
            reason: reason.into(),
        }
    }
}
