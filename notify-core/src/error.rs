use thiserror::Error;

/// Errors surfaced by the notification pipeline.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Cannot use both a prebuilt keyboard and button/callback grids together")]
    ConflictingKeyboard,

    #[error("Unsupported payload: {0}")]
    UnsupportedPayload(String),

    #[error("No active menu message to edit")]
    NoActiveMenu,

    #[error("Menu '{0}' is not registered")]
    MenuNotRegistered(String),

    #[error("Menu '{0}' is already registered")]
    MenuAlreadyRegistered(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<TransportError> for NotifyError {
    fn from(e: TransportError) -> Self {
        NotifyError::Transport(e.to_string())
    }
}

/// Errors raised by a [`crate::Transport`] implementation.
///
/// `Api` failures are potentially transient and may be retried by callers;
/// `InvalidArgument` failures are permanent and must not be.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl TransportError {
    /// True when retrying the same call can never succeed.
    pub fn is_permanent(&self) -> bool {
        matches!(self, TransportError::InvalidArgument(_))
    }
}

pub type Result<T> = std::result::Result<T, NotifyError>;
