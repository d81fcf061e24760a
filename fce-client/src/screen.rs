use std::time::Duration;

use futures::channel::oneshot;

use crate::{
    api::{
        Action, Comment, ConnectivityProbe, Course, DocumentStore, FetchError, Identity, Mode,
        Reply, WriteError,
    },
    view::{self, PendingOp, ReplyRow, RowPlan, RowSelection, ViewState},
    CommentStore,
};

/// Transient message to show the user, then hide after `dismiss_after`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Status {
    pub message: String,
    pub dismiss_after: Duration,
}

impl Status {
    fn for_fetch(e: &FetchError) -> Status {
        Status {
            message: e.status_message(),
            dismiss_after: Duration::from_secs(1),
        }
    }

    fn for_write(e: &WriteError) -> Status {
        Status {
            message: e.status_message(),
            dismiss_after: match e {
                WriteError::NetworkUnavailable => Duration::from_millis(1500),
                _ => Duration::from_secs(1),
            },
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// State changed, recompute the row plan
    Render,
    Navigate(RowSelection),
    /// State is unchanged
    Failed(Status),
    Ignored,
}

/// Held by whoever hosts the screen. Dropping it tears the screen down,
/// cancelling any display load still in flight.
#[derive(Debug)]
pub struct ScreenLifetime(#[allow(dead_code)] oneshot::Receiver<()>);

/// State of one course screen: which segment is shown, the comments loaded for
/// it, and the write in flight if any
pub struct CommentsScreen<S, C> {
    store: CommentStore<S, C>,
    course: Course,
    viewer: Identity,
    mode: Mode,
    comments: Option<Vec<Comment>>,
    pending: PendingOp,
    downloaded: bool,
    teardown: oneshot::Sender<()>,
}

impl<S, C> CommentsScreen<S, C>
where
    S: DocumentStore + Send + Sync,
    C: ConnectivityProbe + Send + Sync,
{
    pub fn new(
        store: CommentStore<S, C>,
        course: Course,
        viewer: Identity,
    ) -> (CommentsScreen<S, C>, ScreenLifetime) {
        let (teardown, lifetime) = oneshot::channel();
        let screen = CommentsScreen {
            store,
            course,
            viewer,
            mode: Mode::CourseInfo,
            comments: None,
            pending: PendingOp::None,
            downloaded: false,
            teardown,
        };
        (screen, ScreenLifetime(lifetime))
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn pending(&self) -> PendingOp {
        self.pending
    }

    pub fn comments(&self) -> Option<&[Comment]> {
        self.comments.as_deref()
    }

    pub fn store(&self) -> &CommentStore<S, C> {
        &self.store
    }

    pub fn is_torn_down(&self) -> bool {
        self.teardown.is_canceled()
    }

    pub fn row_plan(&self) -> Vec<RowPlan> {
        view::derive_row_plan(&ViewState {
            mode: self.mode,
            course: &self.course,
            comments: self.comments.as_deref(),
            pending: self.pending,
            viewer: &self.viewer,
        })
    }

    pub fn reply_plan(&self, comment_index: usize) -> Option<Vec<ReplyRow>> {
        let comment = self.comments.as_ref()?.get(comment_index)?;
        Some(view::derive_reply_plan(comment, &self.viewer))
    }

    pub async fn dispatch(&mut self, action: Action) -> Outcome {
        match action {
            Action::ShowSegment(mode) => {
                self.mode = mode;
                if mode == Mode::Comments && !self.downloaded {
                    return self.load(false).await;
                }
                Outcome::Render
            }
            Action::RefreshRequested if self.mode == Mode::Comments => self.load(true).await,
            Action::RefreshRequested => Outcome::Ignored,
            Action::SelectRow(row) => {
                match view::select_row(&self.row_plan(), row, &self.viewer) {
                    RowSelection::Nothing => Outcome::Ignored,
                    sel => Outcome::Navigate(sel),
                }
            }
            Action::BeginEdit(index) => {
                let editable = self
                    .comments
                    .as_ref()
                    .and_then(|c| c.get(index))
                    .map_or(false, |c| c.is_authored_by(&self.viewer));
                if !editable {
                    return Outcome::Ignored;
                }
                self.pending = PendingOp::Editing {
                    index,
                    saving: false,
                };
                Outcome::Render
            }
            Action::CancelEdit => match self.pending {
                PendingOp::Editing { .. } => {
                    self.pending = PendingOp::None;
                    Outcome::Render
                }
                _ => Outcome::Ignored,
            },
            Action::PostComment(draft) => self.post_comment(draft).await,
            Action::EditComment { index, updated } => self.edit_comment(index, updated).await,
            Action::PostReply {
                comment_index,
                reply,
            } => self.post_reply(comment_index, reply).await,
            Action::DeleteComment(index) => self.delete_comment(index).await,
        }
    }

    async fn load(&mut self, refresh: bool) -> Outcome {
        let res = self
            .store
            .load_comments_or_cancel(&self.course.number, &mut self.teardown)
            .await;
        match res {
            Ok(doc) => {
                self.comments = Some(doc.comments);
                self.downloaded = true;
                if self.pending == PendingOp::LoadErrored {
                    self.pending = PendingOp::None;
                }
                Outcome::Render
            }
            Err(FetchError::Cancelled) => Outcome::Ignored,
            // keep showing what we had, the user can pull to refresh again
            Err(e) if refresh && self.comments.is_some() => Outcome::Failed(Status::for_fetch(&e)),
            Err(e) => {
                tracing::info!(course = %self.course.number, err = %e, "failed to load comments");
                self.comments = None;
                self.pending = PendingOp::LoadErrored;
                Outcome::Failed(Status::for_fetch(&e))
            }
        }
    }

    fn apply_write(&mut self, res: Result<Vec<Comment>, WriteError>, before: PendingOp) -> Outcome {
        match res {
            Ok(comments) => {
                self.comments = Some(comments);
                if self.pending == PendingOp::LoadErrored {
                    self.pending = PendingOp::None;
                }
                Outcome::Render
            }
            Err(e) => {
                self.pending = before;
                Outcome::Failed(Status::for_write(&e))
            }
        }
    }

    async fn post_comment(&mut self, draft: Comment) -> Outcome {
        let before = self.pending;
        self.pending = PendingOp::PostingNew;
        let res = self
            .store
            .post_comment(&self.viewer, &self.course.number, draft)
            .await
            .map(|doc| doc.comments);
        let out = self.apply_write(res, before);
        if out == Outcome::Render {
            // the new comment went in at the top, pushing an open edit form down
            self.pending = match before {
                PendingOp::Editing { index, saving } => PendingOp::Editing {
                    index: index + 1,
                    saving,
                },
                PendingOp::PostingNew | PendingOp::LoadErrored => PendingOp::None,
                other => other,
            };
        }
        out
    }

    async fn edit_comment(&mut self, index: usize, updated: Comment) -> Outcome {
        let before = PendingOp::Editing {
            index,
            saving: false,
        };
        self.pending = PendingOp::Editing {
            index,
            saving: true,
        };
        let res = self
            .store
            .edit_comment(&self.viewer, &self.course.number, index, updated)
            .await
            .map(|doc| doc.comments);
        let out = self.apply_write(res, before);
        if out == Outcome::Render {
            self.pending = PendingOp::None;
        }
        out
    }

    async fn post_reply(&mut self, comment_index: usize, reply: Reply) -> Outcome {
        let before = self.pending;
        let res = self
            .store
            .post_reply(&self.viewer, &self.course.number, comment_index, reply)
            .await
            .map(|doc| doc.comments);
        self.apply_write(res, before)
    }

    async fn delete_comment(&mut self, index: usize) -> Outcome {
        let before = self.pending;
        let res = self
            .store
            .delete_comment(&self.viewer, &self.course.number, index)
            .await
            .map(|doc| doc.comments);
        let out = self.apply_write(res, before);
        if out == Outcome::Render {
            self.pending = match before {
                PendingOp::Editing { index: e, .. } if e == index => PendingOp::None,
                PendingOp::Editing { index: e, saving } if e > index => PendingOp::Editing {
                    index: e - 1,
                    saving,
                },
                other => other,
            };
        }
        out
    }
}
