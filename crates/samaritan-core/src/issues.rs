use std::sync::Arc;

use samaritan_db::{Document, Store, UpdateOp};
use samaritan_types::INITIAL_STATUS;
use samaritan_types::api::CreateIssueRequest;
use samaritan_types::models::{Comment, Issue};
use tracing::info;
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::{EngineError, Result};
use crate::records::{self, StoredComment, StoredIssue, issue_attr};

#[derive(Clone)]
pub struct IssueEngine {
    store: Arc<dyn Store>,
    table: String,
    clock: Arc<dyn Clock>,
}

impl IssueEngine {
    pub fn new(store: Arc<dyn Store>, table: &str, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            table: table.to_string(),
            clock,
        }
    }

    pub fn create_issue(&self, req: CreateIssueRequest) -> Result<Issue> {
        let issue = Issue {
            id: Uuid::new_v4().to_string(),
            created: self.clock.now(),
            title: req.title,
            body: req.body,
            private: req.private,
            user_id: req.user_id,
            user_name: req.user_name,
            location: req.location,
            personal: req.personal,
            helpers: Vec::new(),
            comments: Vec::new(),
            status_msg: INITIAL_STATUS.to_string(),
        };

        let doc = records::to_document(&StoredIssue::from(issue.clone()))?;
        self.store.put(&self.table, &issue.id, doc)?;

        info!("Issue {} created by {}", issue.id, issue.user_id);
        Ok(issue)
    }

    /// Append one comment. Not idempotent: a retried call appends again.
    pub fn append_comment(&self, issue_id: &str, comment: Comment) -> Result<Issue> {
        info!("User {} commented on issue {}", comment.user_id, issue_id);
        let item = serde_json::to_value(StoredComment::from(comment))?;
        self.append(issue_id, issue_attr::COMMENTS, item)
    }

    /// Append one helper id. Not idempotent and not deduplicated.
    pub fn append_helper(&self, issue_id: &str, helper_id: &str) -> Result<Issue> {
        info!("User {} is helping on issue {}", helper_id, issue_id);
        self.append(issue_id, issue_attr::HELPERS, helper_id.into())
    }

    /// Overwrite the status label. Any string is accepted; last write wins.
    pub fn set_status(&self, issue_id: &str, status: &str) -> Result<Issue> {
        info!("Status changed to {:?} for issue {}", status, issue_id);
        let doc = self
            .store
            .update(&self.table, issue_id, &[UpdateOp::set(issue_attr::STATUS_MSG, status)])?;
        self.decode_updated(issue_id, doc)
    }

    pub fn get_by_id(&self, issue_id: &str) -> Result<Option<Issue>> {
        self.store
            .get(&self.table, issue_id)?
            .map(|doc| self.decode(issue_id, doc))
            .transpose()
    }

    pub fn list_all(&self) -> Result<Vec<Issue>> {
        self.store
            .scan(&self.table, None, None)?
            .into_iter()
            .map(|doc| self.decode(&records::key_of(&doc), doc))
            .collect()
    }

    fn append(&self, issue_id: &str, field: &str, item: serde_json::Value) -> Result<Issue> {
        let doc = self
            .store
            .update(&self.table, issue_id, &[UpdateOp::append(field, vec![item])])?;
        self.decode_updated(issue_id, doc)
    }

    fn decode_updated(&self, issue_id: &str, doc: Option<Document>) -> Result<Issue> {
        let doc = doc.ok_or_else(|| EngineError::not_found("issue", issue_id))?;
        self.decode(issue_id, doc)
    }

    fn decode(&self, issue_id: &str, doc: Document) -> Result<Issue> {
        records::from_document::<StoredIssue>(&self.table, issue_id, doc).map(Issue::from)
    }
}
