use std::{
    collections::{btree_map, BTreeMap},
    sync::Arc,
};

use anyhow::anyhow;
use async_trait::async_trait;
use fce_client::api::{
    Comment, Connectivity, ConnectivityProbe, CourseCommentDocument, CourseId, DocumentStore,
};
use parking_lot::Mutex;

/// In-memory document store. Clones share the same documents, so several
/// `CommentStore`s built on clones behave like several clients of one server.
#[derive(Clone, Debug, Default)]
pub struct MockStore(Arc<Mutex<State>>);

#[derive(Debug)]
struct State {
    docs: BTreeMap<CourseId, CourseCommentDocument>,
    connected: bool,
    next_object_id: usize,
    fail_next_fetch: Option<String>,
    fail_next_save: Option<String>,
    num_fetches: usize,
    num_saves: usize,
}

impl Default for State {
    fn default() -> State {
        State {
            docs: BTreeMap::new(),
            connected: true,
            next_object_id: 0,
            fail_next_fetch: None,
            fail_next_save: None,
            num_fetches: 0,
            num_saves: 0,
        }
    }
}

fn new_object_id(counter: &mut usize) -> String {
    *counter += 1;
    format!("mock{:06}", counter)
}

impl MockStore {
    pub fn new() -> MockStore {
        MockStore::default()
    }

    /// Store `comments` as the document of `course`, replacing any previous one
    pub fn admin_put_document(&self, course: CourseId, comments: Vec<Comment>) {
        let mut s = self.0.lock();
        let object_id = Some(new_object_id(&mut s.next_object_id));
        s.docs.insert(
            course.clone(),
            CourseCommentDocument {
                object_id,
                course_number: course,
                comments,
            },
        );
    }

    pub fn test_document(&self, course: &CourseId) -> Option<CourseCommentDocument> {
        self.0.lock().docs.get(course).cloned()
    }

    pub fn test_num_fetches(&self) -> usize {
        self.0.lock().num_fetches
    }

    pub fn test_num_saves(&self) -> usize {
        self.0.lock().num_saves
    }

    pub fn set_connected(&self, connected: bool) {
        self.0.lock().connected = connected;
    }

    pub fn fail_next_fetch(&self, msg: &str) {
        self.0.lock().fail_next_fetch = Some(String::from(msg));
    }

    pub fn fail_next_save(&self, msg: &str) {
        self.0.lock().fail_next_save = Some(String::from(msg));
    }

    /// Another client posting `comment` to `course`, bypassing any cache
    pub fn test_concurrent_insert(&self, course: &CourseId, comment: Comment) {
        let mut s = self.0.lock();
        let s = &mut *s;
        let counter = &mut s.next_object_id;
        s.docs
            .entry(course.clone())
            .or_insert_with(|| CourseCommentDocument {
                object_id: Some(new_object_id(counter)),
                course_number: course.clone(),
                comments: Vec::new(),
            })
            .comments
            .insert(0, comment);
    }

    /// Another client removing the comment at `index` of `course`
    pub fn test_concurrent_remove(&self, course: &CourseId, index: usize) -> Option<Comment> {
        let mut s = self.0.lock();
        let doc = s.docs.get_mut(course)?;
        (index < doc.comments.len()).then(|| doc.comments.remove(index))
    }
}

#[async_trait]
impl DocumentStore for MockStore {
    async fn fetch(&self, course: &CourseId) -> anyhow::Result<Option<CourseCommentDocument>> {
        let mut s = self.0.lock();
        if !s.connected {
            return Err(anyhow!("mock store is unreachable"));
        }
        s.num_fetches += 1;
        if let Some(msg) = s.fail_next_fetch.take() {
            return Err(anyhow!(msg));
        }
        Ok(s.docs.get(course).cloned())
    }

    async fn save(&self, doc: &CourseCommentDocument) -> anyhow::Result<CourseCommentDocument> {
        let mut s = self.0.lock();
        if !s.connected {
            return Err(anyhow!("mock store is unreachable"));
        }
        if let Some(msg) = s.fail_next_save.take() {
            return Err(anyhow!(msg));
        }
        let mut doc = doc.clone();
        if doc.object_id.is_none() {
            doc.object_id = Some(new_object_id(&mut s.next_object_id));
        }
        match s.docs.entry(doc.course_number.clone()) {
            btree_map::Entry::Occupied(mut e) => {
                if e.get().object_id != doc.object_id {
                    return Err(anyhow!(
                        "object {:?} does not exist for course {}",
                        doc.object_id,
                        doc.course_number
                    ));
                }
                e.insert(doc.clone());
            }
            btree_map::Entry::Vacant(e) => {
                e.insert(doc.clone());
            }
        }
        s.num_saves += 1;
        tracing::debug!(course = %doc.course_number, "mock store saved document");
        Ok(doc)
    }
}

#[async_trait]
impl ConnectivityProbe for MockStore {
    async fn current(&self) -> Connectivity {
        match self.0.lock().connected {
            true => Connectivity::Connected,
            false => Connectivity::Disconnected,
        }
    }
}
