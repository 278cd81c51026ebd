use std::sync::Arc;

use chrono::{DateTime, Utc};
use samaritan_db::{Document, Filter, Store, StoreError, UpdateOp};
use samaritan_types::api::{LoginRequest, LoginResponse, Scenario};
use samaritan_types::models::User;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::{EngineError, Result};
use crate::records::{self, CLAIM_OWNER, StoredLoginMatch, StoredUser, user_attr};

/// Points granted when an account is created.
pub const REGISTRATION_POINTS: u64 = 10;

/// Points granted per help action.
pub const HELP_POINTS: u64 = 5;

#[derive(Clone)]
pub struct UserEngine {
    store: Arc<dyn Store>,
    table: String,
    emails_table: String,
    clock: Arc<dyn Clock>,
}

impl UserEngine {
    pub fn new(
        store: Arc<dyn Store>,
        table: &str,
        emails_table: &str,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            table: table.to_string(),
            emails_table: emails_table.to_string(),
            clock,
        }
    }

    /// Log in by email, registering the user on first sight.
    ///
    /// The email scan and the registration are separate store calls. A
    /// conditional insert into the email claims table decides which of two
    /// racing first logins registers; the other joins the winner's id. The
    /// user record itself is also written create-if-absent, so it is created
    /// once and never overwritten by a late registration.
    pub fn login(&self, req: &LoginRequest) -> Result<LoginResponse> {
        let email = req.email.trim();
        if email.is_empty() {
            return Err(EngineError::Validation("email is required".into()));
        }
        let now = self.clock.now();

        if let Some(existing) = self.find_by_email(email)? {
            return self
                .touch(&existing.id, now)?
                .ok_or_else(|| EngineError::not_found("user", &existing.id));
        }

        let user_id = Uuid::new_v4().to_string();
        let mut claim = Document::new();
        claim.insert(user_attr::EMAIL.into(), email.into());
        claim.insert(CLAIM_OWNER.into(), user_id.as_str().into());

        match self.store.insert(&self.emails_table, email, claim) {
            Ok(()) => self.register(&user_id, email, req, now),
            Err(StoreError::AlreadyExists { .. }) => {
                let owner = self.claim_owner(email)?;
                warn!("Concurrent first login for {}; joining user {}", email, owner);
                match self.touch(&owner, now)? {
                    Some(resp) => Ok(resp),
                    // The winner has claimed the email but not written the
                    // user yet, or failed in between.
                    None => self.register(&owner, email, req, now),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        self.store
            .get(&self.table, user_id)?
            .map(|doc| self.decode(user_id, doc))
            .transpose()
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        self.store
            .scan(&self.table, None, None)?
            .into_iter()
            .map(|doc| self.decode(&records::key_of(&doc), doc))
            .collect()
    }

    pub fn record_issue_creation_link(&self, user_id: &str, issue_id: &str) -> Result<User> {
        info!("User {} has posted issue {}", user_id, issue_id);
        self.apply(user_id, &[UpdateOp::append(user_attr::USER_ISSUES, vec![issue_id.into()])])
    }

    pub fn record_interest(&self, user_id: &str, issue_id: &str) -> Result<User> {
        info!("User {} is interested in issue {}", user_id, issue_id);
        self.apply(user_id, &[UpdateOp::append(user_attr::USER_INTERESTS, vec![issue_id.into()])])
    }

    /// User half of a help action: log the issue and add [`HELP_POINTS`] in
    /// one update.
    pub fn award_help(&self, user_id: &str, issue_id: &str) -> Result<User> {
        self.apply(
            user_id,
            &[
                UpdateOp::append(user_attr::USER_HELPS, vec![issue_id.into()]),
                UpdateOp::add(user_attr::SAMARITAN_POINTS, HELP_POINTS as i64),
            ],
        )
    }

    /// Remove every occurrence of `issue_id` from the list `scenario` names.
    /// Points already awarded are kept.
    pub fn delete_list_item(&self, user_id: &str, issue_id: &str, scenario: Scenario) -> Result<User> {
        let field = match scenario {
            Scenario::Issue => user_attr::USER_ISSUES,
            Scenario::Help => user_attr::USER_HELPS,
            Scenario::Interest => user_attr::USER_INTERESTS,
        };
        info!("Removing issue {} from {} of user {}", issue_id, field, user_id);
        self.apply(user_id, &[UpdateOp::remove(field, issue_id)])
    }

    fn find_by_email(&self, email: &str) -> Result<Option<StoredLoginMatch>> {
        let filter = Filter::eq(user_attr::EMAIL, email);
        let mut matches = self
            .store
            .scan(&self.table, Some(&filter), Some(&records::login_projection()))?;

        if matches.len() > 1 {
            warn!("{} users share email {}; using the first", matches.len(), email);
        }
        if matches.is_empty() {
            return Ok(None);
        }
        let doc = matches.swap_remove(0);
        let key = records::key_of(&doc);
        records::from_document(&self.table, &key, doc).map(Some)
    }

    fn claim_owner(&self, email: &str) -> Result<String> {
        let claim = self
            .store
            .get(&self.emails_table, email)?
            .ok_or_else(|| EngineError::not_found("email claim", email))?;
        claim
            .get(CLAIM_OWNER)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| EngineError::not_found("email claim owner", email))
    }

    /// Stamp `LastLogin`. Points are left untouched.
    fn touch(&self, user_id: &str, now: DateTime<Utc>) -> Result<Option<LoginResponse>> {
        let Some(doc) = self.store.update(
            &self.table,
            user_id,
            &[UpdateOp::set(user_attr::LAST_LOGIN, serde_json::to_value(now)?)],
        )?
        else {
            return Ok(None);
        };
        let user = self.decode(user_id, doc)?;
        info!("User {} logged in", user.id);
        Ok(Some(LoginResponse {
            user_id: user.id,
            samaritan_points: user.samaritan_points,
        }))
    }

    fn register(
        &self,
        user_id: &str,
        email: &str,
        req: &LoginRequest,
        now: DateTime<Utc>,
    ) -> Result<LoginResponse> {
        let user = StoredUser {
            id: user_id.to_string(),
            name: req.name.clone(),
            email: email.to_string(),
            profile_image_url: req.image_url.clone(),
            joined_date: now,
            last_login: now,
            samaritan_points: REGISTRATION_POINTS,
            ..Default::default()
        };
        match self
            .store
            .insert(&self.table, user_id, records::to_document(&user)?)
        {
            Ok(()) => {
                info!("Registered user {} for {}", user_id, email);
                Ok(LoginResponse {
                    user_id: user.id,
                    samaritan_points: user.samaritan_points,
                })
            }
            // Another login for the same claim wrote the record first.
            Err(StoreError::AlreadyExists { .. }) => self
                .touch(user_id, now)?
                .ok_or_else(|| EngineError::not_found("user", user_id)),
            Err(e) => Err(e.into()),
        }
    }

    fn apply(&self, user_id: &str, ops: &[UpdateOp]) -> Result<User> {
        let doc = self
            .store
            .update(&self.table, user_id, ops)?
            .ok_or_else(|| EngineError::not_found("user", user_id))?;
        self.decode(user_id, doc)
    }

    fn decode(&self, user_id: &str, doc: Document) -> Result<User> {
        records::from_document::<StoredUser>(&self.table, user_id, doc).map(User::from)
    }
}
