//! Stored shapes of the records and their attribute names.
//!
//! Documents use PascalCase attribute names. Every stored struct decodes
//! with defaults for absent attributes, so a sparse document is still a
//! found record.

use chrono::{DateTime, Utc};
use samaritan_db::{Document, Projection};
use samaritan_types::models::{Comment, Issue, IssueSummary, Post, User};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EngineError, Result};

pub const ID: &str = "Id";

pub mod issue_attr {
    pub const TITLE: &str = "Title";
    pub const USER_ID: &str = "UserID";
    pub const STATUS_MSG: &str = "StatusMsg";
    pub const COMMENTS: &str = "Comments";
    pub const HELPERS: &str = "Helpers";
}

pub mod user_attr {
    pub const EMAIL: &str = "Email";
    pub const LAST_LOGIN: &str = "LastLogin";
    pub const SAMARITAN_POINTS: &str = "SamaritanPoints";
    pub const USER_ISSUES: &str = "UserIssues";
    pub const USER_HELPS: &str = "UserHelps";
    pub const USER_INTERESTS: &str = "UserInterests";
}

pub mod post_attr {
    pub const USER_ID: &str = "UserId";
}

/// Attribute of an email claim holding the owning user id.
pub const CLAIM_OWNER: &str = "UserID";

pub fn issue_summary_projection() -> Projection {
    Projection::new([ID, issue_attr::TITLE, issue_attr::STATUS_MSG])
}

pub fn login_projection() -> Projection {
    Projection::new([ID, user_attr::SAMARITAN_POINTS])
}

pub fn to_document<T: Serialize>(value: &T) -> Result<Document> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(EngineError::Encode(serde::ser::Error::custom(format!(
            "expected an object, got {other}"
        )))),
    }
}

pub fn from_document<T: DeserializeOwned>(table: &str, key: &str, doc: Document) -> Result<T> {
    serde_json::from_value(Value::Object(doc)).map_err(|source| EngineError::Mapping {
        table: table.to_string(),
        key: key.to_string(),
        source,
    })
}

/// Key of a scanned document, for error context.
pub fn key_of(doc: &Document) -> String {
    doc.get(ID)
        .and_then(Value::as_str)
        .unwrap_or("<no id>")
        .to_string()
}

// -- Issues --

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct StoredComment {
    #[serde(rename = "UserID")]
    pub user_id: String,
    pub user_name: String,
    pub comment: String,
}

impl From<Comment> for StoredComment {
    fn from(c: Comment) -> Self {
        Self {
            user_id: c.user_id,
            user_name: c.user_name,
            comment: c.comment,
        }
    }
}

impl From<StoredComment> for Comment {
    fn from(c: StoredComment) -> Self {
        Self {
            user_id: c.user_id,
            user_name: c.user_name,
            comment: c.comment,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct StoredIssue {
    pub id: String,
    pub created: DateTime<Utc>,
    pub title: String,
    pub body: String,
    pub private: bool,
    #[serde(rename = "UserID")]
    pub user_id: String,
    pub user_name: String,
    pub location: String,
    pub personal: bool,
    pub comments: Vec<StoredComment>,
    pub helpers: Vec<String>,
    pub status_msg: String,
}

impl From<Issue> for StoredIssue {
    fn from(i: Issue) -> Self {
        Self {
            id: i.id,
            created: i.created,
            title: i.title,
            body: i.body,
            private: i.private,
            user_id: i.user_id,
            user_name: i.user_name,
            location: i.location,
            personal: i.personal,
            comments: i.comments.into_iter().map(Into::into).collect(),
            helpers: i.helpers,
            status_msg: i.status_msg,
        }
    }
}

impl From<StoredIssue> for Issue {
    fn from(i: StoredIssue) -> Self {
        Self {
            id: i.id,
            created: i.created,
            title: i.title,
            body: i.body,
            private: i.private,
            user_id: i.user_id,
            user_name: i.user_name,
            location: i.location,
            personal: i.personal,
            comments: i.comments.into_iter().map(Into::into).collect(),
            helpers: i.helpers,
            status_msg: i.status_msg,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct StoredIssueSummary {
    pub id: String,
    pub title: String,
    pub status_msg: String,
}

impl From<StoredIssueSummary> for IssueSummary {
    fn from(s: StoredIssueSummary) -> Self {
        Self {
            id: s.id,
            title: s.title,
            status_msg: s.status_msg,
        }
    }
}

// -- Users --

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct StoredUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub profile_image_url: String,
    pub joined_date: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
    pub samaritan_points: u64,
    pub user_issues: Vec<String>,
    pub user_helps: Vec<String>,
    pub user_interests: Vec<String>,
}

impl From<User> for StoredUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            profile_image_url: u.profile_image_url,
            joined_date: u.joined_date,
            last_login: u.last_login,
            samaritan_points: u.samaritan_points,
            user_issues: u.user_issues,
            user_helps: u.user_helps,
            user_interests: u.user_interests,
        }
    }
}

impl From<StoredUser> for User {
    fn from(u: StoredUser) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            profile_image_url: u.profile_image_url,
            joined_date: u.joined_date,
            last_login: u.last_login,
            samaritan_points: u.samaritan_points,
            user_issues: u.user_issues,
            user_helps: u.user_helps,
            user_interests: u.user_interests,
        }
    }
}

/// Projection read by the login scan.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct StoredLoginMatch {
    pub id: String,
    pub samaritan_points: u64,
}

// -- Posts --

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct StoredPost {
    pub id: String,
    pub title: String,
    pub description: String,
    pub post_time: DateTime<Utc>,
    pub user_id: String,
}

impl From<Post> for StoredPost {
    fn from(p: Post) -> Self {
        Self {
            id: p.id,
            title: p.title,
            description: p.description,
            post_time: p.post_time,
            user_id: p.user_id,
        }
    }
}

impl From<StoredPost> for Post {
    fn from(p: StoredPost) -> Self {
        Self {
            id: p.id,
            title: p.title,
            description: p.description,
            post_time: p.post_time,
            user_id: p.user_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stored_issue_uses_pascal_case_attributes() {
        let doc = to_document(&StoredIssue {
            id: "i1".into(),
            user_id: "u1".into(),
            status_msg: "Need Help".into(),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(doc[ID], json!("i1"));
        assert_eq!(doc[issue_attr::USER_ID], json!("u1"));
        assert_eq!(doc[issue_attr::STATUS_MSG], json!("Need Help"));
        assert_eq!(doc[issue_attr::HELPERS], json!([]));
        assert!(doc.contains_key("UserName"));
    }

    #[test]
    fn sparse_document_decodes_with_defaults() {
        let doc = match json!({ "Id": "i1" }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let issue: StoredIssue = from_document("issues", "i1", doc).unwrap();
        assert_eq!(issue.id, "i1");
        assert!(issue.comments.is_empty());
        assert_eq!(issue.title, "");
    }

    #[test]
    fn wrong_attribute_type_is_a_mapping_error() {
        let doc = match json!({ "Id": "u1", "SamaritanPoints": "lots" }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let err = from_document::<StoredUser>("users", "u1", doc).unwrap_err();
        assert!(matches!(err, EngineError::Mapping { .. }));
    }
}
