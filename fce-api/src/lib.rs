pub use uuid::{self, Uuid};

pub type Time = chrono::DateTime<chrono::Utc>;

mod action;
pub use action::{Action, Mode};

mod comment;
pub use comment::{format_time_posted, Comment, CommentId, CourseCommentDocument, Reply, ReplyId};

mod course;
pub use course::{Course, CourseId, CourseInfoView, Instructor, INSTRUCTOR_FIELD_TITLES};

mod error;
pub use error::{FetchError, WriteError};

mod store;
pub use store::{Connectivity, ConnectivityProbe, DocumentStore};

mod user;
pub use user::{Identity, UserId};

// Strings end up in a remote document and in table cells; a null byte would be
// silently truncated by some of the clients reading that document.
pub(crate) fn validate_string(field: &'static str, s: &str) -> Result<(), WriteError> {
    if s.contains('\0') {
        return Err(WriteError::InvalidDraft(format!(
            "null byte in {field} is not allowed"
        )));
    }
    Ok(())
}

pub(crate) fn validate_not_blank(field: &'static str, s: &str) -> Result<(), WriteError> {
    validate_string(field, s)?;
    if s.trim().is_empty() {
        return Err(WriteError::InvalidDraft(format!("{field} must not be empty")));
    }
    Ok(())
}
