//! Pure list edits applied between the refetch and the save of a comment
//! document. Every function validates its index and leaves the list untouched
//! on error.

use crate::api::{Comment, CommentId, Identity, Reply, WriteError};

pub fn check_index(index: usize, len: usize) -> Result<(), WriteError> {
    if index >= len {
        return Err(WriteError::IndexOutOfRange { index, len });
    }
    Ok(())
}

pub fn insert_comment(comments: &mut Vec<Comment>, draft: Comment) {
    comments.insert(0, draft);
}

/// Replaces the comment at `index`, returning the previous one.
///
/// `updated.replies` is stored as given: callers editing a comment must carry
/// forward its existing replies.
pub fn replace_comment(
    comments: &mut [Comment],
    index: usize,
    updated: Comment,
) -> Result<Comment, WriteError> {
    check_entry(comments, index, updated.id)?;
    Ok(std::mem::replace(&mut comments[index], updated))
}

/// Fails with `EntryMoved` if the comment at `index` is not the one with id
/// `expected`. Comments without an id are trusted to be at the right place.
pub fn check_entry(
    comments: &[Comment],
    index: usize,
    expected: Option<CommentId>,
) -> Result<(), WriteError> {
    check_index(index, comments.len())?;
    if let (Some(current), Some(expected)) = (comments[index].id, expected) {
        if current != expected {
            return Err(WriteError::EntryMoved { index });
        }
    }
    Ok(())
}

pub fn prepend_reply(
    comments: &mut [Comment],
    comment_index: usize,
    reply: Reply,
) -> Result<(), WriteError> {
    check_index(comment_index, comments.len())?;
    comments[comment_index].replies.insert(0, reply);
    Ok(())
}

pub fn remove_comment(comments: &mut Vec<Comment>, index: usize) -> Result<Comment, WriteError> {
    check_index(index, comments.len())?;
    Ok(comments.remove(index))
}

/// Fails unless `identity` authored the comment at `index`
pub fn check_author(
    comments: &[Comment],
    index: usize,
    identity: &Identity,
) -> Result<(), WriteError> {
    check_index(index, comments.len())?;
    if !comments[index].is_authored_by(identity) {
        return Err(WriteError::PermissionDenied);
    }
    Ok(())
}
