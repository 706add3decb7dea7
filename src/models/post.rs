//! Post model and id allocation.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::render::TimestampFormatter;

/// Post identifier: milliseconds since the Unix epoch at creation, made unique by the [`IdClock`].
pub type PostId = i64;

/// Hands out clock-derived ids that strictly increase, even within one millisecond.
#[derive(Debug, Default)]
pub struct IdClock {
    last: AtomicI64,
}

impl IdClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clock whose next id is greater than `id`.
    pub fn starting_after(id: PostId) -> Self {
        Self {
            last: AtomicI64::new(id),
        }
    }

    /// Allocate the next id, or `None` once the id space is exhausted.
    pub fn next_id(&self) -> Option<PostId> {
        let now = Utc::now().timestamp_millis();
        self.last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                last.checked_add(1).map(|next| next.max(now))
            })
            .ok()
            .and_then(|previous| previous.checked_add(1))
            .map(|next| next.max(now))
    }
}

/// A single blog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    id: PostId,
    title: String,
    content: String,
    tags: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Post {
    /// Build a new post under `id`, normally taken from an [`IdClock`]. Input is not validated here.
    pub fn create(id: PostId, title: String, content: String, tags: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            title,
            content,
            tags,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the editable fields and refresh `updated_at`.
    pub fn update(&mut self, title: String, content: String, tags: Vec<String>) {
        self.title = title;
        self.content = content;
        self.tags = tags;
        // never step backwards if the wall clock does
        self.updated_at = Utc::now().max(self.updated_at);
    }

    /// The update time rendered through the given strategy.
    pub fn formatted_updated_at(&self, formatter: &dyn TimestampFormatter) -> String {
        formatter.format(self.updated_at)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn id(&self) -> PostId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    #[cfg(test)]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Persisted shape of a post.
///
/// Older saves named the timestamps `createdDate`/`updatedDate`, and some carry none at all.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    pub id: PostId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, alias = "createdDate")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "updatedDate")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<PostRecord> for Post {
    fn from(record: PostRecord) -> Self {
        let now = Utc::now();
        let created_at = record.created_at.unwrap_or(now);
        let updated_at = record.updated_at.unwrap_or(now).max(created_at);
        Self {
            id: record.id,
            title: record.title,
            content: record.content,
            tags: record.tags,
            created_at,
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{ConfiguredFormatter, TimeFormat};
    use chrono::TimeZone;

    fn tags(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_create_sets_equal_timestamps() {
        let post = Post::create(1, "Hello".into(), "World".into(), tags(&["a"]));

        assert_eq!(post.title(), "Hello");
        assert_eq!(post.content(), "World");
        assert_eq!(post.tags(), &["a".to_string()]);
        assert_eq!(post.created_at(), post.updated_at());
    }

    #[test]
    fn test_update_preserves_identity() {
        let mut post = Post::create(1, "t".into(), "c".into(), vec![]);
        let id = post.id();
        let created = post.created_at();
        let before = post.updated_at();

        post.update("t2".into(), "c2".into(), tags(&["x", "x"]));

        assert_eq!(post.id(), id);
        assert_eq!(post.created_at(), created);
        assert!(post.updated_at() >= before);
        assert_eq!(post.title(), "t2");
        assert_eq!(post.content(), "c2");
        assert_eq!(post.tags(), &tags(&["x", "x"])[..]);
    }

    #[test]
    fn test_update_never_moves_backwards() {
        let future = Utc::now() + chrono::Duration::days(1);
        let mut post = Post::from(PostRecord {
            id: 1,
            title: "t".into(),
            content: "c".into(),
            tags: vec![],
            created_at: Some(future),
            updated_at: Some(future),
        });

        post.update("t".into(), "c".into(), vec![]);

        assert_eq!(post.updated_at(), future);
    }

    #[test]
    fn test_id_clock_strictly_increases() {
        let clock = IdClock::new();
        let ids: Vec<PostId> = (0..1000).map(|_| clock.next_id().unwrap()).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_id_clock_starting_after() {
        let far = Utc::now().timestamp_millis() + 1_000_000;
        let clock = IdClock::starting_after(far);
        assert_eq!(clock.next_id(), Some(far + 1));
    }

    #[test]
    fn test_id_clock_exhausted_at_max() {
        let clock = IdClock::starting_after(PostId::MAX);
        assert_eq!(clock.next_id(), None);
        assert_eq!(clock.next_id(), None);

        let clock = IdClock::starting_after(PostId::MAX - 1);
        assert_eq!(clock.next_id(), Some(PostId::MAX));
        assert_eq!(clock.next_id(), None);
    }

    #[test]
    fn test_has_tag() {
        let post = Post::create(1, "t".into(), "c".into(), tags(&["go", "infra"]));
        assert!(post.has_tag("go"));
        assert!(!post.has_tag("rust"));
    }

    #[test]
    fn test_formatted_updated_at_uses_strategy() {
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let post = Post::from(PostRecord {
            id: 1,
            title: "t".into(),
            content: "c".into(),
            tags: vec![],
            created_at: Some(at),
            updated_at: Some(at),
        });
        let iso = ConfiguredFormatter::new(TimeFormat::Iso, 0).unwrap();

        assert_eq!(
            post.formatted_updated_at(&ConfiguredFormatter::default()),
            "January 2, 2026 03:04"
        );
        assert_eq!(post.formatted_updated_at(&iso), "2026-01-02T03:04:05Z");
    }

    #[test]
    fn test_record_accepts_legacy_names() {
        let json = r#"{"id":1700000000000,"title":"t","content":"c","tags":["a"],
            "createdDate":"2024-01-01T00:00:00.000Z","updatedDate":"2024-01-02T00:00:00.000Z"}"#;
        let post = Post::from(serde_json::from_str::<PostRecord>(json).unwrap());

        assert_eq!(post.id(), 1_700_000_000_000);
        assert_eq!(
            post.created_at(),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            post.updated_at(),
            Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_record_without_timestamps() {
        let json = r#"{"id":5,"title":"t","content":"c"}"#;
        let post = Post::from(serde_json::from_str::<PostRecord>(json).unwrap());

        assert!(post.tags().is_empty());
        assert!(post.updated_at() >= post.created_at());
    }

    #[test]
    fn test_serializes_camel_case() {
        let post = Post::create(1, "t".into(), "c".into(), vec![]);
        let value = serde_json::to_value(&post).unwrap();

        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
        assert!(value.get("created_at").is_none());
    }
}
