use crate::{Comment, Reply};

/// Segment of the course screen currently displayed
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {
    CourseInfo,
    Instructors,
    Comments,
}

/// A user action on the course screen, produced by the view layer and
/// consumed by the screen controller
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Action {
    ShowSegment(Mode),
    PostComment(Comment),
    BeginEdit(usize),
    CancelEdit,
    EditComment { index: usize, updated: Comment },
    PostReply { comment_index: usize, reply: Reply },
    DeleteComment(usize),
    SelectRow(usize),
    RefreshRequested,
}
