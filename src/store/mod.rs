//! Post store: the ordered post sequence and its persistence.
//!
//! The whole sequence lives under one key of the backing store and is rewritten after every
//! mutation. A failed write rolls the in-memory change back so memory and storage agree.

use std::collections::HashSet;
use std::sync::Arc;

use crate::errors::AppError;
use crate::models::{IdClock, Post, PostId, PostRecord};
use crate::storage::KeyValueStore;

/// What hydration found under the storage key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HydrateOutcome {
    /// Nothing stored yet.
    Empty,
    /// Stored posts were read back.
    Loaded(usize),
    /// A value was present but unreadable; it was backed up and the store started empty.
    Recovered { reason: String },
}

/// Ordered collection of posts backed by a key-value store.
pub struct PostStore {
    posts: Vec<Post>,
    backend: Arc<dyn KeyValueStore>,
    key: String,
    clock: IdClock,
}

impl PostStore {
    /// A store with no posts that writes under `key`. Call [`PostStore::hydrate`] to read saved state.
    pub fn new(backend: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            posts: Vec::new(),
            backend,
            key: key.into(),
            clock: IdClock::new(),
        }
    }

    /// Build and hydrate a store. With `strict`, an unreadable stored value is an error.
    pub async fn load(
        backend: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
        strict: bool,
    ) -> Result<(Self, HydrateOutcome), AppError> {
        let mut store = Self::new(backend, key);
        let outcome = store.hydrate().await?;

        if strict {
            if let HydrateOutcome::Recovered { reason } = &outcome {
                return Err(AppError::CorruptStore(reason.clone()));
            }
        }

        Ok((store, outcome))
    }

    /// Key holding the copy of an unreadable value.
    pub fn backup_key(&self) -> String {
        format!("{}.corrupt", self.key)
    }

    /// Replace the in-memory sequence with what the backing store holds.
    pub async fn hydrate(&mut self) -> Result<HydrateOutcome, AppError> {
        let outcome = match self.backend.get(&self.key).await? {
            None => {
                self.posts = Vec::new();
                HydrateOutcome::Empty
            }
            Some(raw) => match decode_posts(&raw) {
                Ok(posts) => {
                    self.posts = posts;
                    HydrateOutcome::Loaded(self.posts.len())
                }
                Err(reason) => {
                    let backup_key = self.backup_key();
                    tracing::warn!(
                        key = %self.key,
                        backup_key = %backup_key,
                        "Stored posts are unreadable ({}); starting empty",
                        reason
                    );
                    self.backend.set(&backup_key, &raw).await?;
                    self.posts = Vec::new();
                    HydrateOutcome::Recovered { reason }
                }
            },
        };

        let max_id = self.posts.iter().map(Post::id).max().unwrap_or(0);
        self.clock = IdClock::starting_after(max_id);

        Ok(outcome)
    }

    /// Write the full sequence under the storage key.
    pub async fn persist(&self) -> Result<(), AppError> {
        let json = serde_json::to_string(&self.posts)?;
        self.backend.set(&self.key, &json).await
    }

    /// Append a new post and persist.
    pub async fn add(
        &mut self,
        title: String,
        content: String,
        tags: Vec<String>,
    ) -> Result<Post, AppError> {
        let id = self
            .clock
            .next_id()
            .ok_or_else(|| AppError::CorruptStore("post id space exhausted".to_string()))?;
        let post = Post::create(id, title, content, tags);
        self.posts.push(post.clone());

        if let Err(e) = self.persist().await {
            self.posts.pop();
            return Err(e);
        }

        tracing::info!(post_id = post.id(), "Created post");
        Ok(post)
    }

    /// Update a post in place and persist. Returns `None`, without writing, when `id` is unknown.
    pub async fn update(
        &mut self,
        id: PostId,
        title: String,
        content: String,
        tags: Vec<String>,
    ) -> Result<Option<Post>, AppError> {
        let Some(index) = self.position(id) else {
            tracing::debug!(post_id = id, "Update skipped; post not found");
            return Ok(None);
        };

        let previous = self.posts[index].clone();
        self.posts[index].update(title, content, tags);

        if let Err(e) = self.persist().await {
            self.posts[index] = previous;
            return Err(e);
        }

        tracing::info!(post_id = id, "Updated post");
        Ok(Some(self.posts[index].clone()))
    }

    /// Remove the post with `id`, if present, and persist the remainder.
    ///
    /// Returns whether a post was removed.
    pub async fn delete(&mut self, id: PostId) -> Result<bool, AppError> {
        let removed = self.position(id).map(|index| (index, self.posts.remove(index)));

        if let Err(e) = self.persist().await {
            if let Some((index, post)) = removed {
                self.posts.insert(index, post);
            }
            return Err(e);
        }

        if removed.is_some() {
            tracing::info!(post_id = id, "Deleted post");
        }
        Ok(removed.is_some())
    }

    pub fn find(&self, id: PostId) -> Option<&Post> {
        self.posts.iter().find(|post| post.id() == id)
    }

    /// All posts in creation order.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Posts carrying `tag`, in store order. An empty tag selects every post.
    pub fn filter_by_tag(&self, tag: &str) -> Vec<&Post> {
        self.posts
            .iter()
            .filter(|post| tag.is_empty() || post.has_tag(tag))
            .collect()
    }

    /// Distinct tags across all posts, each once, in first-seen order.
    pub fn unique_tags(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut tags = Vec::new();
        for tag in self.posts.iter().flat_map(Post::tags) {
            if seen.insert(tag.as_str()) {
                tags.push(tag.clone());
            }
        }
        tags
    }

    fn position(&self, id: PostId) -> Option<usize> {
        self.posts.iter().position(|post| post.id() == id)
    }
}

fn decode_posts(raw: &str) -> Result<Vec<Post>, String> {
    let records: Vec<PostRecord> = serde_json::from_str(raw).map_err(|e| e.to_string())?;

    let mut ids = HashSet::new();
    if let Some(dup) = records.iter().find(|r| !ids.insert(r.id)) {
        return Err(format!("duplicate post id {}", dup.id));
    }

    Ok(records.into_iter().map(Post::from).collect())
}
