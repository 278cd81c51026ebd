use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of an issue's comment thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "userid", default)]
    pub user_id: String,
    #[serde(rename = "username", default)]
    pub user_name: String,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    pub created: DateTime<Utc>,
    pub title: String,
    pub body: String,
    pub private: bool,
    /// Creator. Not checked against the users table.
    #[serde(rename = "userid")]
    pub user_id: String,
    #[serde(rename = "username")]
    pub user_name: String,
    pub location: String,
    pub personal: bool,
    /// Ids of users who helped, in the order they signed up.
    pub helpers: Vec<String>,
    pub comments: Vec<Comment>,
    /// Free-form label; any string is a valid status.
    #[serde(rename = "statusmsg")]
    pub status_msg: String,
}

/// Projection of an issue used by the relationship queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSummary {
    pub id: String,
    pub title: String,
    #[serde(rename = "statusmsg")]
    pub status_msg: String,
}

/// A stored user.
///
/// The three id lists are the per-user action ledger written by the user
/// action endpoint. Profile reads do not use them; see [`UserProfile`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(rename = "profileimageurl")]
    pub profile_image_url: String,
    #[serde(rename = "joineddate")]
    pub joined_date: DateTime<Utc>,
    #[serde(rename = "lastlogin")]
    pub last_login: DateTime<Utc>,
    #[serde(rename = "samaritanpoints")]
    pub samaritan_points: u64,
    #[serde(rename = "issuelinks")]
    pub user_issues: Vec<String>,
    #[serde(rename = "helplog")]
    pub user_helps: Vec<String>,
    #[serde(rename = "interests")]
    pub user_interests: Vec<String>,
}

/// A user together with the issues they created and helped on, both
/// resolved by scanning the issues table at read time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(rename = "profileimageurl")]
    pub profile_image_url: String,
    #[serde(rename = "joineddate")]
    pub joined_date: DateTime<Utc>,
    #[serde(rename = "lastlogin")]
    pub last_login: DateTime<Utc>,
    #[serde(rename = "samaritanpoints")]
    pub samaritan_points: u64,
    #[serde(rename = "userissues")]
    pub user_issues: Vec<IssueSummary>,
    #[serde(rename = "userhelps")]
    pub user_helps: Vec<IssueSummary>,
}

impl UserProfile {
    pub fn new(user: User, created: Vec<IssueSummary>, helped: Vec<IssueSummary>) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            profile_image_url: user.profile_image_url,
            joined_date: user.joined_date,
            last_login: user.last_login,
            samaritan_points: user.samaritan_points,
            user_issues: created,
            user_helps: helped,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "posttime")]
    pub post_time: DateTime<Utc>,
    #[serde(rename = "userid")]
    pub user_id: String,
}
