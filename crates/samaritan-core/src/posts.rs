use std::sync::Arc;

use samaritan_db::{Filter, Store};
use samaritan_types::api::CreatePostRequest;
use samaritan_types::models::Post;
use tracing::info;
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::Result;
use crate::records::{self, StoredPost, post_attr};

/// Posts are written once and never updated.
#[derive(Clone)]
pub struct PostEngine {
    store: Arc<dyn Store>,
    table: String,
    clock: Arc<dyn Clock>,
}

impl PostEngine {
    pub fn new(store: Arc<dyn Store>, table: &str, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            table: table.to_string(),
            clock,
        }
    }

    pub fn create_post(&self, req: CreatePostRequest) -> Result<Post> {
        let post = Post {
            id: Uuid::new_v4().to_string(),
            title: req.title,
            description: req.description,
            post_time: self.clock.now(),
            user_id: req.user_id,
        };
        let doc = records::to_document(&StoredPost::from(post.clone()))?;
        self.store.put(&self.table, &post.id, doc)?;

        info!("Post {} created by {}", post.id, post.user_id);
        Ok(post)
    }

    pub fn list_all(&self) -> Result<Vec<Post>> {
        self.collect(None)
    }

    pub fn posts_by_user(&self, user_id: &str) -> Result<Vec<Post>> {
        self.collect(Some(&Filter::eq(post_attr::USER_ID, user_id)))
    }

    fn collect(&self, filter: Option<&Filter>) -> Result<Vec<Post>> {
        self.store
            .scan(&self.table, filter, None)?
            .into_iter()
            .map(|doc| {
                let key = records::key_of(&doc);
                records::from_document::<StoredPost>(&self.table, &key, doc).map(Post::from)
            })
            .collect()
    }
}
