use std::{collections::HashMap, time::Duration};

use futures::{channel::oneshot, future::Either, pin_mut};

use crate::{
    api::{
        Comment, Connectivity, ConnectivityProbe, CourseCommentDocument, CourseId,
        DocumentStore, FetchError, Identity, Reply, UserId, WriteError,
    },
    splice,
};

#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Upper bound on a single remote fetch. Saves are never bounded: a write
    /// that was issued cannot be taken back.
    pub fetch_timeout: Option<Duration>,
}

impl Default for StoreConfig {
    fn default() -> StoreConfig {
        StoreConfig {
            fetch_timeout: Some(Duration::from_secs(10)),
        }
    }
}

/// Client side of the per-course comment documents.
///
/// Every mutation re-reads the remote document, splices it, and writes the
/// whole document back. This narrows the window for lost updates without
/// closing it: two writers racing on the same course are last-writer-wins.
pub struct CommentStore<S, C> {
    remote: S,
    probe: C,
    config: StoreConfig,
    cache: HashMap<CourseId, CourseCommentDocument>,
}

impl<S, C> CommentStore<S, C>
where
    S: DocumentStore + Send + Sync,
    C: ConnectivityProbe + Send + Sync,
{
    pub fn new(remote: S, probe: C, config: StoreConfig) -> CommentStore<S, C> {
        CommentStore {
            remote,
            probe,
            config,
            cache: HashMap::new(),
        }
    }

    pub fn cached(&self, course: &CourseId) -> Option<&CourseCommentDocument> {
        self.cache.get(course)
    }

    pub fn forget(&mut self, course: &CourseId) {
        self.cache.remove(course);
    }

    /// Drops every cached document, eg. when the hosting screen goes away
    pub fn teardown(&mut self) {
        self.cache.clear();
    }

    pub async fn load_comments(
        &mut self,
        course: &CourseId,
    ) -> Result<CourseCommentDocument, FetchError> {
        if self.probe.current().await == Connectivity::Disconnected {
            return match self.cache.get(course) {
                Some(doc) => {
                    tracing::debug!(%course, "offline, serving cached comments");
                    Ok(doc.clone())
                }
                None => Err(FetchError::NetworkUnavailable),
            };
        }
        let doc = self.fetch(course).await?;
        self.cache.insert(course.clone(), doc.clone());
        Ok(doc)
    }

    /// Like `load_comments`, but gives up with `FetchError::Cancelled` as soon
    /// as the receiving half of `cancel` is dropped
    pub async fn load_comments_or_cancel(
        &mut self,
        course: &CourseId,
        cancel: &mut oneshot::Sender<()>,
    ) -> Result<CourseCommentDocument, FetchError> {
        let cancelled = cancel.cancellation();
        let load = self.load_comments(course);
        pin_mut!(cancelled, load);
        match futures::future::select(cancelled, load).await {
            Either::Left(((), _)) => {
                tracing::debug!(%course, "comment load cancelled");
                Err(FetchError::Cancelled)
            }
            Either::Right((res, _)) => res,
        }
    }

    pub async fn post_comment(
        &mut self,
        identity: &Identity,
        course: &CourseId,
        draft: Comment,
    ) -> Result<CourseCommentDocument, WriteError> {
        check_draft_author(identity, &draft.author_id)?;
        check_draft_course(course, &draft.course_number)?;
        draft.validate()?;
        self.mutate(course, "post comment", move |comments| {
            splice::insert_comment(comments, draft);
            Ok(())
        })
        .await
    }

    pub async fn edit_comment(
        &mut self,
        identity: &Identity,
        course: &CourseId,
        index: usize,
        updated: Comment,
    ) -> Result<CourseCommentDocument, WriteError> {
        check_draft_author(identity, &updated.author_id)?;
        check_draft_course(course, &updated.course_number)?;
        updated.validate()?;
        let identity = identity.clone();
        self.mutate(course, "edit comment", move |comments| {
            splice::check_entry(comments, index, updated.id)?;
            splice::check_author(comments, index, &identity)?;
            splice::replace_comment(comments, index, updated)?;
            Ok(())
        })
        .await
    }

    pub async fn post_reply(
        &mut self,
        identity: &Identity,
        course: &CourseId,
        comment_index: usize,
        reply: Reply,
    ) -> Result<CourseCommentDocument, WriteError> {
        check_draft_author(identity, &reply.author_id)?;
        reply.validate()?;
        self.mutate(course, "post reply", move |comments| {
            splice::prepend_reply(comments, comment_index, reply)
        })
        .await
    }

    pub async fn delete_comment(
        &mut self,
        identity: &Identity,
        course: &CourseId,
        index: usize,
    ) -> Result<CourseCommentDocument, WriteError> {
        if !identity.is_authenticated() {
            return Err(WriteError::NotAuthenticated);
        }
        let identity = identity.clone();
        self.mutate(course, "delete comment", move |comments| {
            splice::check_author(comments, index, &identity)?;
            splice::remove_comment(comments, index)?;
            Ok(())
        })
        .await
    }

    async fn fetch(&self, course: &CourseId) -> Result<CourseCommentDocument, FetchError> {
        tracing::debug!(%course, "fetching comment document");
        let fetch = self.remote.fetch(course);
        let res = match self.config.fetch_timeout {
            None => fetch.await,
            Some(t) => match tokio::time::timeout(t, fetch).await {
                Ok(res) => res,
                Err(_) => return Err(FetchError::RemoteError(String::from("request timed out"))),
            },
        };
        match res {
            Ok(Some(doc)) => Ok(doc),
            Ok(None) => Ok(CourseCommentDocument::empty(course.clone())),
            Err(err) => {
                tracing::warn!(%course, ?err, "failed fetching comment document");
                Err(FetchError::RemoteError(format!("{err:#}")))
            }
        }
    }

    /// Refetch, splice, save. The cache is only touched once the save succeeded.
    async fn mutate<F>(
        &mut self,
        course: &CourseId,
        what: &'static str,
        apply: F,
    ) -> Result<CourseCommentDocument, WriteError>
    where
        F: FnOnce(&mut Vec<Comment>) -> Result<(), WriteError>,
    {
        if self.probe.current().await == Connectivity::Disconnected {
            return Err(WriteError::NetworkUnavailable);
        }
        let mut doc = self.fetch(course).await?;
        if let Err(err) = apply(&mut doc.comments) {
            tracing::info!(%course, ?err, "refusing to {what}");
            return Err(err);
        }
        let saved = match self.remote.save(&doc).await {
            Ok(saved) => saved,
            Err(err) => {
                tracing::warn!(%course, ?err, "failed to {what}");
                return Err(WriteError::RemoteError(format!("{err:#}")));
            }
        };
        tracing::info!(%course, num_comments = saved.comments.len(), "did {what}");
        self.cache.insert(course.clone(), saved.clone());
        Ok(saved)
    }
}

fn check_draft_author(identity: &Identity, author: &UserId) -> Result<(), WriteError> {
    match identity.user() {
        None => Err(WriteError::NotAuthenticated),
        Some(u) if u != author => Err(WriteError::PermissionDenied),
        Some(_) => Ok(()),
    }
}

fn check_draft_course(course: &CourseId, draft_course: &CourseId) -> Result<(), WriteError> {
    if draft_course != course {
        return Err(WriteError::InvalidDraft(format!(
            "comment for {draft_course} cannot be stored with the comments of {course}"
        )));
    }
    Ok(())
}
