//! Help actions and the per-user action ledger.
//!
//! A help action changes two records with two store calls:
//!
//! 1. the user: `UserHelps` gains the issue and `SamaritanPoints` gains
//!    [`HELP_POINTS`](crate::users::HELP_POINTS), in one update;
//! 2. the issue: `Helpers` gains the user id.
//!
//! The issue is checked to exist before step 1. If step 2 still fails the
//! points stay awarded and the caller gets
//! [`EngineError::PartiallyApplied`]. The repair is to replay
//! [`IssueEngine::append_helper`](crate::IssueEngine::append_helper) once;
//! replaying the whole help action would award the points twice, and
//! replaying step 2 more than once lists the helper twice.

use samaritan_types::api::{Scenario, UserAction, UserActionRequest};
use samaritan_types::models::{Issue, User};
use tracing::{error, info};

use crate::Engines;
use crate::error::{EngineError, Result};

#[derive(Debug, Clone)]
pub struct HelpOutcome {
    pub user: User,
    pub issue: Issue,
}

impl Engines {
    pub fn record_help(&self, user_id: &str, issue_id: &str, helper_name: &str) -> Result<HelpOutcome> {
        if self.issues.get_by_id(issue_id)?.is_none() {
            return Err(EngineError::not_found("issue", issue_id));
        }

        info!("User {} ({}) is providing help for issue {}", user_id, helper_name, issue_id);
        let user = self.users.award_help(user_id, issue_id)?;

        match self.issues.append_helper(issue_id, user_id) {
            Ok(issue) => Ok(HelpOutcome { user, issue }),
            Err(e) => {
                error!(
                    user_id,
                    issue_id,
                    error = %e,
                    "Help points awarded but helper not recorded on issue; replay append_helper once to repair"
                );
                Err(EngineError::PartiallyApplied {
                    user_id: user_id.to_string(),
                    issue_id: issue_id.to_string(),
                    completed: "points award",
                    pending: "issue helper append",
                    source: Box::new(e),
                })
            }
        }
    }

    /// Dispatch a `PUT /users/{id}` action to the ledger operation it names.
    pub fn apply_user_action(&self, user_id: &str, req: &UserActionRequest) -> Result<User> {
        match (req.action, req.scenario) {
            (UserAction::Add, Scenario::Issue) => {
                self.users.record_issue_creation_link(user_id, &req.issue_id)
            }
            (UserAction::Add, Scenario::Interest) => {
                self.users.record_interest(user_id, &req.issue_id)
            }
            (UserAction::Add, Scenario::Help) => {
                let helper = self
                    .users
                    .get_user(user_id)?
                    .ok_or_else(|| EngineError::not_found("user", user_id))?;
                self.record_help(user_id, &req.issue_id, &helper.name)
                    .map(|outcome| outcome.user)
            }
            (UserAction::Delete, scenario) => {
                self.users.delete_list_item(user_id, &req.issue_id, scenario)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use samaritan_db::{MemoryStore, Store};
    use samaritan_types::api::{CreateIssueRequest, LoginRequest};

    use super::*;
    use crate::testing::{FaultyStore, engines_on};

    fn seed(engines: &Engines) -> (String, String) {
        let user_id = engines
            .users
            .login(&LoginRequest {
                email: "helper@example.com".into(),
                name: "Helper".into(),
                image_url: String::new(),
            })
            .unwrap()
            .user_id;
        let issue_id = engines
            .issues
            .create_issue(CreateIssueRequest {
                title: "Need water".into(),
                ..Default::default()
            })
            .unwrap()
            .id;
        (user_id, issue_id)
    }

    #[test]
    fn help_awards_five_points_and_appends_once_on_each_side() {
        let engines = engines_on(Arc::new(MemoryStore::new()));
        let (user_id, issue_id) = seed(&engines);

        let outcome = engines.record_help(&user_id, &issue_id, "Helper").unwrap();
        assert_eq!(outcome.user.samaritan_points, 15);
        assert_eq!(outcome.user.user_helps, [issue_id.clone()]);
        assert_eq!(outcome.issue.helpers, [user_id.clone()]);

        let outcome = engines.record_help(&user_id, &issue_id, "Helper").unwrap();
        assert_eq!(outcome.user.samaritan_points, 20);
        assert_eq!(outcome.user.user_helps.len(), 2);
        assert_eq!(outcome.issue.helpers.len(), 2);
    }

    #[test]
    fn help_on_missing_issue_changes_nothing() {
        let engines = engines_on(Arc::new(MemoryStore::new()));
        let (user_id, _) = seed(&engines);

        let err = engines.record_help(&user_id, "ghost", "Helper").unwrap_err();
        assert!(matches!(err, EngineError::NotFound { kind: "issue", .. }));

        let user = engines.users.get_user(&user_id).unwrap().unwrap();
        assert_eq!(user.samaritan_points, 10);
        assert!(user.user_helps.is_empty());
    }

    #[test]
    fn failed_issue_step_is_reported_as_partial_and_repairable() {
        let store = Arc::new(FaultyStore::new(Arc::new(MemoryStore::new())));
        let engines = engines_on(store.clone());
        let (user_id, issue_id) = seed(&engines);

        store.fail_updates_on("issues");
        let err = engines.record_help(&user_id, &issue_id, "Helper").unwrap_err();
        match &err {
            EngineError::PartiallyApplied { completed, pending, .. } => {
                assert_eq!(*completed, "points award");
                assert_eq!(*pending, "issue helper append");
            }
            other => panic!("expected a partial failure, got {other:?}"),
        }

        // Points went through, the issue did not change
        let user = engines.users.get_user(&user_id).unwrap().unwrap();
        assert_eq!(user.samaritan_points, 15);
        let issue = engines.issues.get_by_id(&issue_id).unwrap().unwrap();
        assert!(issue.helpers.is_empty());

        store.heal();
        let issue = engines.issues.append_helper(&issue_id, &user_id).unwrap();
        assert_eq!(issue.helpers, [user_id.clone()]);
        assert_eq!(
            engines.users.get_user(&user_id).unwrap().unwrap().samaritan_points,
            15
        );
    }

    #[test]
    fn failed_user_step_changes_nothing() {
        let store = Arc::new(FaultyStore::new(Arc::new(MemoryStore::new())));
        let engines = engines_on(store.clone());
        let (user_id, issue_id) = seed(&engines);

        store.fail_updates_on("users");
        let err = engines.record_help(&user_id, &issue_id, "Helper").unwrap_err();
        assert!(matches!(err, EngineError::Store(_)));

        store.heal();
        let issue = engines.issues.get_by_id(&issue_id).unwrap().unwrap();
        assert!(issue.helpers.is_empty());
        assert_eq!(
            store.get("users", &user_id).unwrap().unwrap()["SamaritanPoints"],
            10
        );
    }

    #[test]
    fn user_actions_dispatch_to_ledger_operations() {
        let engines = engines_on(Arc::new(MemoryStore::new()));
        let (user_id, issue_id) = seed(&engines);

        let action = |action, scenario| UserActionRequest {
            action,
            scenario,
            issue_id: issue_id.clone(),
        };

        let user = engines
            .apply_user_action(&user_id, &action(UserAction::Add, Scenario::Issue))
            .unwrap();
        assert_eq!(user.user_issues, [issue_id.clone()]);

        let user = engines
            .apply_user_action(&user_id, &action(UserAction::Add, Scenario::Help))
            .unwrap();
        assert_eq!(user.samaritan_points, 15);
        let issue = engines.issues.get_by_id(&issue_id).unwrap().unwrap();
        assert_eq!(issue.helpers, [user_id.clone()]);

        let user = engines
            .apply_user_action(&user_id, &action(UserAction::Add, Scenario::Interest))
            .unwrap();
        assert_eq!(user.user_interests.len(), 1);

        let user = engines
            .apply_user_action(&user_id, &action(UserAction::Delete, Scenario::Interest))
            .unwrap();
        assert!(user.user_interests.is_empty());
        assert_eq!(user.user_issues.len(), 1);
    }

    #[test]
    fn help_action_for_unknown_user_is_not_found() {
        let engines = engines_on(Arc::new(MemoryStore::new()));
        let (_, issue_id) = seed(&engines);
        let err = engines
            .apply_user_action(
                "ghost",
                &UserActionRequest {
                    action: UserAction::Add,
                    scenario: Scenario::Help,
                    issue_id,
                },
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound { kind: "user", .. }));
    }
}
