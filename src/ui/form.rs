//! Create/edit form: input parsing, validation, and the form mode.

use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{Post, PostId};

pub const VALIDATION_MESSAGE: &str = "Please enter both a title and content for the post.";
pub const TAG_COMMA_MESSAGE: &str = "Tags cannot contain commas.";

/// Whether the form creates a post or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    New,
    Editing(PostId),
}

/// Raw form fields as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PostForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Comma-separated tags
    #[serde(default)]
    pub tags: String,
    /// Hidden field; empty for a new post
    #[serde(default)]
    pub edit_id: String,
}

/// A validated submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub mode: FormMode,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

impl PostForm {
    /// Form prefilled from an existing post, in editing mode.
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title().to_string(),
            content: post.content().to_string(),
            tags: post.tags().join(", "),
            edit_id: post.id().to_string(),
        }
    }

    /// The mode implied by the hidden edit-id field. Blank, zero, or unparseable means new.
    pub fn mode(&self) -> FormMode {
        match self.edit_id.trim().parse::<PostId>() {
            Ok(id) if id != 0 => FormMode::Editing(id),
            _ => FormMode::New,
        }
    }

    /// Trim and check the fields.
    pub fn validate(&self) -> Result<Submission, AppError> {
        let title = self.title.trim();
        let content = self.content.trim();

        if title.is_empty() || content.is_empty() {
            return Err(AppError::Validation(VALIDATION_MESSAGE.to_string()));
        }

        Ok(Submission {
            mode: self.mode(),
            title: title.to_string(),
            content: content.to_string(),
            tags: parse_tags(&self.tags),
        })
    }
}

/// Split a comma-separated tag field into trimmed, non-empty tags. Duplicates are kept.
pub fn parse_tags(raw: &str) -> Vec<String> {
    normalize_tags(raw.split(','))
}

/// Trim each tag and drop the empty ones.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|tag| tag.as_ref().trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// [`normalize_tags`] for tags given one by one. A comma inside a tag is rejected, since the
/// form field would split it on the next edit.
pub fn check_tags<I, S>(tags: I) -> Result<Vec<String>, AppError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let tags = normalize_tags(tags);
    if tags.iter().any(|tag| tag.contains(',')) {
        return Err(AppError::Validation(TAG_COMMA_MESSAGE.to_string()));
    }
    Ok(tags)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(title: &str, content: &str, tags: &str, edit_id: &str) -> PostForm {
        PostForm {
            title: title.into(),
            content: content.into(),
            tags: tags.into(),
            edit_id: edit_id.into(),
        }
    }

    #[test]
    fn test_parse_tags_keeps_duplicates() {
        assert_eq!(parse_tags("a, b, a"), vec!["a", "b", "a"]);
        assert_eq!(parse_tags(" , x ,, "), vec!["x"]);
        assert!(parse_tags("").is_empty());
    }

    #[test]
    fn test_check_tags_rejects_commas() {
        assert_eq!(check_tags([" a ", "", "b"]).unwrap(), vec!["a", "b"]);

        let err = check_tags(["ok", "c,d"]).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert_eq!(err.message(), TAG_COMMA_MESSAGE);
    }

    #[test]
    fn test_form_tags_survive_edit_round_trip() {
        let tags = check_tags(["go", "infra", "go"]).unwrap();
        let post = Post::create(1, "T".into(), "C".into(), tags.clone());

        assert_eq!(parse_tags(&PostForm::from_post(&post).tags), tags);
    }

    #[test]
    fn test_validate_trims() {
        let submission = form("  Hello ", "\nWorld\n", "a, b, a", "").validate().unwrap();

        assert_eq!(submission.mode, FormMode::New);
        assert_eq!(submission.title, "Hello");
        assert_eq!(submission.content, "World");
        assert_eq!(submission.tags, vec!["a", "b", "a"]);
    }

    #[test]
    fn test_validate_rejects_blank_fields() {
        let err = form("   ", "body", "", "").validate().unwrap_err();
        assert_eq!(err.message(), VALIDATION_MESSAGE);

        assert!(form("title", "  ", "", "").validate().is_err());
    }

    #[test]
    fn test_mode_from_edit_id() {
        assert_eq!(form("", "", "", "").mode(), FormMode::New);
        assert_eq!(form("", "", "", "0").mode(), FormMode::New);
        assert_eq!(form("", "", "", "abc").mode(), FormMode::New);
        assert_eq!(
            form("", "", "", " 1700000000000 ").mode(),
            FormMode::Editing(1_700_000_000_000)
        );
    }

    #[test]
    fn test_from_post() {
        let post = Post::create(
            1_700_000_000_000,
            "T".into(),
            "C".into(),
            vec!["go".into(), "infra".into()],
        );
        let form = PostForm::from_post(&post);

        assert_eq!(form.tags, "go, infra");
        assert_eq!(form.mode(), FormMode::Editing(post.id()));
    }
}
