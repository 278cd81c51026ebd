use serde::{Deserialize, Serialize};

// -- Issues --

/// Body of `POST /issues`. Identity, timestamps, status and the append-only
/// lists are assigned by the server; any such fields sent are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CreateIssueRequest {
    pub title: String,
    pub body: String,
    #[serde(deserialize_with = "crate::flag::deserialize")]
    pub private: bool,
    #[serde(rename = "userid")]
    pub user_id: String,
    #[serde(rename = "username")]
    pub user_name: String,
    pub location: String,
    #[serde(deserialize_with = "crate::flag::deserialize")]
    pub personal: bool,
}

impl Default for CreateIssueRequest {
    fn default() -> Self {
        Self {
            title: String::new(),
            body: String::new(),
            private: false,
            user_id: String::new(),
            user_name: String::new(),
            location: String::new(),
            personal: true,
        }
    }
}

/// Body of `PUT /issues/{id}/help`.
#[derive(Debug, Clone, Deserialize)]
pub struct HelperRequest {
    #[serde(rename = "userid")]
    pub user_id: String,
    #[serde(rename = "username", default)]
    pub user_name: String,
}

/// Body of `PUT /issues/{id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusRequest {
    #[serde(rename = "statusmsg")]
    pub status_msg: String,
}

// -- Users --

/// Body of `POST /users`: log in, registering on first sight of the email.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "imageurl", default)]
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "UserID")]
    pub user_id: String,
    #[serde(rename = "SamaritanPoints")]
    pub samaritan_points: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserAction {
    #[serde(rename = "ADD")]
    Add,
    #[serde(rename = "DELETE")]
    Delete,
}

/// Which per-user list an action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    Issue,
    Help,
    Interest,
}

/// Body of `PUT /users/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserActionRequest {
    pub action: UserAction,
    pub scenario: Scenario,
    pub issue_id: String,
}

// -- Posts --

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreatePostRequest {
    pub title: String,
    pub description: String,
    #[serde(rename = "userid")]
    pub user_id: String,
}
