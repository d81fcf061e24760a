use chrono::TimeZone;
use uuid::Uuid;

use crate::{CourseId, Identity, Time, UserId, WriteError};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct CommentId(pub Uuid);

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ReplyId(pub Uuid);

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    /// Absent on replies written before ids were generated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ReplyId>,

    pub reply_text: String,
    pub time_posted: String,
    #[serde(rename = "andrewID")]
    pub author_id: UserId,
    pub anonymous: bool,
}

impl Reply {
    pub fn draft(author: UserId, reply_text: String, anonymous: bool, time_posted: String) -> Reply {
        Reply {
            id: Some(ReplyId(Uuid::new_v4())),
            reply_text,
            time_posted,
            author_id: author,
            anonymous,
        }
    }

    pub fn validate(&self) -> Result<(), WriteError> {
        crate::validate_not_blank("reply text", &self.reply_text)?;
        crate::validate_string("time posted", &self.time_posted)?;
        crate::validate_not_blank("author", &self.author_id.0)
    }

    pub fn author_label(&self) -> &str {
        author_label(self.anonymous, &self.author_id)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Absent on comments written before ids were generated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CommentId>,

    pub header: String,
    pub comment_text: String,
    pub time_posted: String,
    #[serde(rename = "andrewID")]
    pub author_id: UserId,
    pub anonymous: bool,
    pub course_number: CourseId,

    /// Newest first
    #[serde(default)]
    pub replies: Vec<Reply>,
}

impl Comment {
    pub fn draft(
        author: UserId,
        course_number: CourseId,
        header: String,
        comment_text: String,
        anonymous: bool,
        time_posted: String,
    ) -> Comment {
        Comment {
            id: Some(CommentId(Uuid::new_v4())),
            header,
            comment_text,
            time_posted,
            author_id: author,
            anonymous,
            course_number,
            replies: Vec::new(),
        }
    }

    /// Build the replacement for `self` after an edit, carrying over identity,
    /// authorship and replies.
    pub fn edited(&self, header: String, comment_text: String, anonymous: bool) -> Comment {
        Comment {
            header,
            comment_text,
            anonymous,
            ..self.clone()
        }
    }

    pub fn validate(&self) -> Result<(), WriteError> {
        crate::validate_not_blank("header", &self.header)?;
        crate::validate_string("comment text", &self.comment_text)?;
        crate::validate_string("time posted", &self.time_posted)?;
        crate::validate_not_blank("author", &self.author_id.0)?;
        crate::validate_not_blank("course number", &self.course_number.0)?;
        for r in &self.replies {
            r.validate()?;
        }
        Ok(())
    }

    pub fn author_label(&self) -> &str {
        author_label(self.anonymous, &self.author_id)
    }

    pub fn is_authored_by(&self, identity: &Identity) -> bool {
        identity.is(&self.author_id)
    }
}

fn author_label(anonymous: bool, author: &UserId) -> &str {
    match anonymous {
        true => "Anonymous",
        false => &author.0,
    }
}

/// The single remote record holding every comment of one course
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseCommentDocument {
    /// Remote record id, `None` until the document has been saved once
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,

    pub course_number: CourseId,

    /// Newest first
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl CourseCommentDocument {
    pub fn empty(course_number: CourseId) -> CourseCommentDocument {
        CourseCommentDocument {
            object_id: None,
            course_number,
            comments: Vec::new(),
        }
    }
}

/// Medium date and short time, eg. `Jun 18, 2019 at 3:04 PM`
pub fn format_time_posted(time: Time, tz: &chrono_tz::Tz) -> String {
    tz.from_utc_datetime(&time.naive_utc())
        .format("%b %-d, %Y at %-I:%M %p")
        .to_string()
}
