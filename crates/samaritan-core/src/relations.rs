//! Relationship queries between users and issues.
//!
//! Both queries are filter scans over the whole issues table: there is no
//! index, so each call costs O(number of issues).

use std::sync::Arc;

use samaritan_db::{Filter, Store};
use samaritan_types::models::{IssueSummary, UserProfile};

use crate::Engines;
use crate::error::Result;
use crate::records::{self, StoredIssueSummary, issue_attr};

#[derive(Clone)]
pub struct RelationshipQueries {
    store: Arc<dyn Store>,
    issues_table: String,
}

impl RelationshipQueries {
    pub fn new(store: Arc<dyn Store>, issues_table: &str) -> Self {
        Self {
            store,
            issues_table: issues_table.to_string(),
        }
    }

    /// Issues whose creator is `user_id`, in no particular order.
    pub fn issues_created_by(&self, user_id: &str) -> Result<Vec<IssueSummary>> {
        self.summaries(&Filter::eq(issue_attr::USER_ID, user_id))
    }

    /// Issues whose `Helpers` list contains `user_id`, in no particular order.
    pub fn issues_helped_by(&self, user_id: &str) -> Result<Vec<IssueSummary>> {
        self.summaries(&Filter::contains(issue_attr::HELPERS, user_id))
    }

    fn summaries(&self, filter: &Filter) -> Result<Vec<IssueSummary>> {
        let projection = records::issue_summary_projection();
        self.store
            .scan(&self.issues_table, Some(filter), Some(&projection))?
            .into_iter()
            .map(|doc| {
                let key = records::key_of(&doc);
                records::from_document::<StoredIssueSummary>(&self.issues_table, &key, doc)
                    .map(IssueSummary::from)
            })
            .collect()
    }
}

impl Engines {
    /// A user with the issues they created and helped on, derived from the
    /// issues table. `Ok(None)` when no such user is stored.
    pub fn user_profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let Some(user) = self.users.get_user(user_id)? else {
            return Ok(None);
        };
        let created = self.relations.issues_created_by(user_id)?;
        let helped = self.relations.issues_helped_by(user_id)?;
        Ok(Some(UserProfile::new(user, created, helped)))
    }
}
