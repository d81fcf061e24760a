use async_trait::async_trait;

use crate::{CourseCommentDocument, CourseId};

/// The remote document store holding one comment document per course
#[async_trait]
pub trait DocumentStore {
    /// Returns `None` if the course has no comment document yet
    async fn fetch(&self, course: &CourseId) -> anyhow::Result<Option<CourseCommentDocument>>;

    /// Writes the whole document, returning it as stored (with its `object_id`)
    async fn save(&self, doc: &CourseCommentDocument) -> anyhow::Result<CourseCommentDocument>;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Connectivity {
    Connected,
    Disconnected,
}

#[async_trait]
pub trait ConnectivityProbe {
    async fn current(&self) -> Connectivity;
}
