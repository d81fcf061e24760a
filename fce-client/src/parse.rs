//! `DocumentStore` backed by the REST API of a Parse server, where comment
//! documents live in the `Comments` class, one object per course.

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use serde_json::json;

use crate::api::{CourseCommentDocument, CourseId, DocumentStore};

const CLASS_PATH: &str = "classes/Comments";

#[derive(Clone, Debug)]
pub struct ParseConfig {
    /// eg. `https://parseapi.back4app.com`
    pub server_url: String,
    pub app_id: String,
    pub rest_key: String,
    pub session_token: Option<String>,
}

pub struct ParseStore {
    client: reqwest::Client,
    config: ParseConfig,
}

#[derive(serde::Deserialize)]
struct QueryResults {
    results: Vec<CourseCommentDocument>,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct Created {
    object_id: String,
}

#[derive(serde::Deserialize)]
struct ParseError {
    code: i64,
    error: String,
}

impl ParseStore {
    pub fn new(config: ParseConfig) -> ParseStore {
        ParseStore {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.server_url.trim_end_matches('/'), path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let req = self
            .client
            .request(method, self.url(path))
            .header("X-Parse-Application-Id", &self.config.app_id)
            .header("X-Parse-REST-API-Key", &self.config.rest_key);
        match &self.config.session_token {
            Some(tok) => req.header("X-Parse-Session-Token", tok),
            None => req,
        }
    }
}

async fn parse_response<R>(resp: reqwest::Response) -> anyhow::Result<R>
where
    R: for<'de> serde::Deserialize<'de>,
{
    let status = resp.status();
    if !status.is_success() {
        let body = resp.bytes().await.context("reading error body")?;
        return Err(match serde_json::from_slice::<ParseError>(&body) {
            Ok(e) => anyhow!("{} (parse error code {})", e.error, e.code),
            Err(_) => anyhow!("parse server answered {status}"),
        });
    }
    resp.json().await.context("parsing response body")
}

#[async_trait]
impl DocumentStore for ParseStore {
    async fn fetch(&self, course: &CourseId) -> anyhow::Result<Option<CourseCommentDocument>> {
        let filter = serde_json::to_string(&json!({ "courseNumber": course }))
            .context("serializing query filter")?;
        let resp = self
            .request(reqwest::Method::GET, CLASS_PATH)
            .query(&[("where", filter.as_str()), ("limit", "1")])
            .send()
            .await
            .with_context(|| format!("querying comments of {course}"))?;
        let mut res: QueryResults = parse_response(resp)
            .await
            .with_context(|| format!("querying comments of {course}"))?;
        if res.results.len() > 1 {
            tracing::warn!(%course, "multiple comment documents for one course, using the first");
        }
        Ok(match res.results.is_empty() {
            true => None,
            false => Some(res.results.swap_remove(0)),
        })
    }

    async fn save(&self, doc: &CourseCommentDocument) -> anyhow::Result<CourseCommentDocument> {
        let course = &doc.course_number;
        let mut saved = doc.clone();
        match &doc.object_id {
            Some(id) => {
                let resp = self
                    .request(reqwest::Method::PUT, &format!("{CLASS_PATH}/{id}"))
                    .json(&json!({ "comments": doc.comments }))
                    .send()
                    .await
                    .with_context(|| format!("updating comments of {course}"))?;
                parse_response::<serde_json::Value>(resp)
                    .await
                    .with_context(|| format!("updating comments of {course}"))?;
            }
            None => {
                let resp = self
                    .request(reqwest::Method::POST, CLASS_PATH)
                    .json(&json!({
                        "courseNumber": course,
                        "comments": doc.comments,
                    }))
                    .send()
                    .await
                    .with_context(|| format!("creating comments of {course}"))?;
                let created: Created = parse_response(resp)
                    .await
                    .with_context(|| format!("creating comments of {course}"))?;
                saved.object_id = Some(created.object_id);
            }
        }
        Ok(saved)
    }
}
