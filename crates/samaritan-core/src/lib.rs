//! Engines for the volunteer-coordination records.
//!
//! Each engine owns the storage paths of one record kind. Actions that touch
//! more than one record (help awards, user profiles) are composed on
//! [`Engines`] out of single-record calls, and none of those compositions is
//! atomic. Store failures are surfaced on first occurrence; nothing in this
//! crate retries.

pub mod clock;
pub mod error;
pub mod issues;
pub mod ledger;
pub mod posts;
pub mod relations;
pub mod users;

mod records;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use samaritan_db::Store;

pub use clock::{Clock, SystemClock};
pub use error::{EngineError, Result};
pub use issues::IssueEngine;
pub use ledger::HelpOutcome;
pub use posts::PostEngine;
pub use relations::RelationshipQueries;
pub use users::UserEngine;

/// Collection names, supplied by deployment configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tables {
    pub users: String,
    pub issues: String,
    pub posts: String,
    /// Email -> user id claims that make registration race-free.
    pub user_emails: String,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            users: "users".into(),
            issues: "issues".into(),
            posts: "posts".into(),
            user_emails: "user_emails".into(),
        }
    }
}

#[derive(Clone)]
pub struct Engines {
    pub issues: IssueEngine,
    pub users: UserEngine,
    pub posts: PostEngine,
    pub relations: RelationshipQueries,
}

impl Engines {
    pub fn new(store: Arc<dyn Store>, tables: &Tables, clock: Arc<dyn Clock>) -> Self {
        Self {
            issues: IssueEngine::new(store.clone(), &tables.issues, clock.clone()),
            users: UserEngine::new(
                store.clone(),
                &tables.users,
                &tables.user_emails,
                clock.clone(),
            ),
            posts: PostEngine::new(store.clone(), &tables.posts, clock),
            relations: RelationshipQueries::new(store, &tables.issues),
        }
    }
}
