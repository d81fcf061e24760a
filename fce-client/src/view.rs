//! Derivation of what each table row of the course and replies screens shows.
//!
//! Everything here is a pure function of its inputs: calling it twice with the
//! same state yields the same plan.

use crate::api::{
    Comment, Course, CourseInfoView, Identity, Mode, Reply, INSTRUCTOR_FIELD_TITLES,
};

/// Write currently in flight (or being prepared) on the comments segment
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PendingOp {
    None,
    PostingNew,
    Editing { index: usize, saving: bool },
    LoadErrored,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EntryVariant {
    GuestPrompt,
    ComposeForm,
}

impl EntryVariant {
    pub fn for_viewer(viewer: &Identity) -> EntryVariant {
        match viewer.is_authenticated() {
            true => EntryVariant::ComposeForm,
            false => EntryVariant::GuestPrompt,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RowPlan {
    CourseInfo(CourseInfoView),
    InstructorField {
        instructor: usize,
        heading: &'static str,
        body: String,
    },
    NewCommentEntry(EntryVariant),
    LoadingPlaceholder,
    /// `index` is the position of `comment` in the comment list
    EditForm {
        index: usize,
        comment: Comment,
    },
    CommentDisplay {
        index: usize,
        comment: Comment,
    },
    LoadFailed,
}

pub struct ViewState<'a> {
    pub mode: Mode,
    pub course: &'a Course,
    /// `None` if the comments could not be loaded
    pub comments: Option<&'a [Comment]>,
    pub pending: PendingOp,
    pub viewer: &'a Identity,
}

pub fn derive_row_plan(s: &ViewState) -> Vec<RowPlan> {
    match s.mode {
        Mode::CourseInfo => vec![RowPlan::CourseInfo(CourseInfoView::from(s.course))],
        Mode::Instructors => s
            .course
            .instructors
            .iter()
            .enumerate()
            .flat_map(|(i, instr)| {
                INSTRUCTOR_FIELD_TITLES
                    .into_iter()
                    .zip(instr.fields())
                    .map(move |(heading, body)| RowPlan::InstructorField {
                        instructor: i,
                        heading,
                        body,
                    })
            })
            .collect(),
        Mode::Comments => comment_rows(s.comments, s.pending, s.viewer),
    }
}

fn comment_rows(comments: Option<&[Comment]>, pending: PendingOp, viewer: &Identity) -> Vec<RowPlan> {
    let comments = match (comments, pending) {
        (None, _) | (_, PendingOp::LoadErrored) => return vec![RowPlan::LoadFailed],
        (Some(c), _) => c,
    };
    let mut res = Vec::with_capacity(comments.len() + 2);
    res.push(RowPlan::NewCommentEntry(EntryVariant::for_viewer(viewer)));
    if pending == PendingOp::PostingNew {
        // the new comment's placeholder takes the first slot, shifting the list
        res.push(RowPlan::LoadingPlaceholder);
    }
    res.extend(comments.iter().enumerate().map(|(index, c)| match pending {
        PendingOp::Editing { index: e, saving: true } if e == index => RowPlan::LoadingPlaceholder,
        PendingOp::Editing { index: e, saving: false } if e == index => RowPlan::EditForm {
            index,
            comment: c.clone(),
        },
        _ => RowPlan::CommentDisplay {
            index,
            comment: c.clone(),
        },
    }));
    res
}

/// What tapping a row leads to
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RowSelection {
    Nothing,
    ShowLogin,
    ShowReplies(usize),
}

pub fn select_row(plan: &[RowPlan], row: usize, viewer: &Identity) -> RowSelection {
    match plan.get(row) {
        Some(RowPlan::NewCommentEntry(_)) if !viewer.is_authenticated() => RowSelection::ShowLogin,
        Some(RowPlan::CommentDisplay { index, .. }) => RowSelection::ShowReplies(*index),
        _ => RowSelection::Nothing,
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RowAction {
    Delete,
    Edit,
}

pub fn can_edit_row(plan: &[RowPlan], row: usize, viewer: &Identity) -> bool {
    matches!(
        plan.get(row),
        Some(RowPlan::CommentDisplay { comment, .. }) if comment.is_authored_by(viewer)
    )
}

pub fn row_actions(plan: &[RowPlan], row: usize, viewer: &Identity) -> Vec<RowAction> {
    match can_edit_row(plan, row, viewer) {
        true => vec![RowAction::Delete, RowAction::Edit],
        false => Vec::new(),
    }
}

/// Confirmation text shown before deleting `comment`
pub fn delete_prompt(comment: &Comment) -> String {
    match comment.replies.len() {
        0 => String::from("Are you sure you want to delete this comment?"),
        n => format!(
            "This comment has {n} {} that other students may find useful! Consider making the comment anonymous!",
            if n == 1 { "reply" } else { "replies" },
        ),
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ReplyRow {
    Comment(Comment),
    ReplyEntry(EntryVariant),
    ReplyDisplay { index: usize, reply: Reply },
}

/// Rows of the replies screen: the comment, the reply form, then the replies
/// newest first
pub fn derive_reply_plan(comment: &Comment, viewer: &Identity) -> Vec<ReplyRow> {
    let mut res = Vec::with_capacity(comment.replies.len() + 2);
    res.push(ReplyRow::Comment(comment.clone()));
    res.push(ReplyRow::ReplyEntry(EntryVariant::for_viewer(viewer)));
    res.extend(
        comment
            .replies
            .iter()
            .enumerate()
            .map(|(index, reply)| ReplyRow::ReplyDisplay {
                index,
                reply: reply.clone(),
            }),
    );
    res
}
