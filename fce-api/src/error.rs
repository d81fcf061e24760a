#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum FetchError {
    #[error("No internet connection")]
    NetworkUnavailable,

    #[error("Remote store error: {0}")]
    RemoteError(String),

    #[error("Fetch cancelled")]
    Cancelled,
}

impl FetchError {
    /// Message to surface to the user as a transient status
    pub fn status_message(&self) -> String {
        match self {
            FetchError::NetworkUnavailable => String::from("No internet connection"),
            FetchError::RemoteError(_) => String::from("Failed to load comments."),
            FetchError::Cancelled => String::new(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum WriteError {
    #[error("No internet connection")]
    NetworkUnavailable,

    #[error("Remote store error: {0}")]
    RemoteError(String),

    #[error("Index {index} is out of range for a list of {len} comments")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Invalid draft: {0}")]
    InvalidDraft(String),

    #[error("Comment at index {index} changed since it was loaded")]
    EntryMoved { index: usize },
}

impl WriteError {
    /// Message to surface to the user as a transient status
    pub fn status_message(&self) -> String {
        match self {
            WriteError::NetworkUnavailable => String::from("No internet connection"),
            WriteError::RemoteError(msg) if msg.is_empty() => String::from("Something went wrong"),
            WriteError::RemoteError(msg) => msg.clone(),
            WriteError::IndexOutOfRange { .. } | WriteError::EntryMoved { .. } => {
                String::from("This comment changed in the meantime, please refresh")
            }
            WriteError::NotAuthenticated => String::from("Log in to comment"),
            WriteError::PermissionDenied => String::from("You can only change your own comments"),
            WriteError::InvalidDraft(msg) => msg.clone(),
        }
    }
}

impl From<FetchError> for WriteError {
    fn from(e: FetchError) -> WriteError {
        match e {
            FetchError::NetworkUnavailable => WriteError::NetworkUnavailable,
            FetchError::RemoteError(msg) => WriteError::RemoteError(msg),
            // writes never go through a cancellable fetch
            FetchError::Cancelled => WriteError::RemoteError(String::from("fetch cancelled")),
        }
    }
}
