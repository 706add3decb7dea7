//! Page view models and their HTML rendering.
//!
//! View models carry data only. Action URLs come from [`super::routes`], the same table the
//! router registers, so markup never names a handler.

use std::fmt::Write;

use super::form::{FormMode, PostForm};
use super::routes;
use crate::models::{Post, PostId};
use crate::render::{escape_html, escape_multiline, TimestampFormatter};
use crate::store::PostStore;

/// One post as shown in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostCard {
    pub id: PostId,
    pub title: String,
    pub updated: String,
    pub content: String,
    pub tags: Vec<String>,
}

impl PostCard {
    pub fn from_post(post: &Post, formatter: &dyn TimestampFormatter) -> Self {
        Self {
            id: post.id(),
            title: post.title().to_string(),
            updated: post.formatted_updated_at(formatter),
            content: post.content().to_string(),
            tags: post.tags().to_vec(),
        }
    }
}

/// Tag selector state: the available tags and the current choice (empty means all).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
    pub tags: Vec<String>,
    pub selected: String,
}

/// Everything the main page shows.
#[derive(Debug, Clone)]
pub struct PageModel {
    pub mode: FormMode,
    pub form: PostForm,
    pub alert: Option<String>,
    pub cards: Vec<PostCard>,
    pub filter: TagFilter,
}

impl PageModel {
    /// Snapshot the store for display, filtered by `selected_tag`.
    pub fn build(
        store: &PostStore,
        formatter: &dyn TimestampFormatter,
        selected_tag: &str,
        form: PostForm,
    ) -> Self {
        let cards = store
            .filter_by_tag(selected_tag)
            .into_iter()
            .map(|post| PostCard::from_post(post, formatter))
            .collect();

        Self {
            mode: form.mode(),
            form,
            alert: None,
            cards,
            filter: TagFilter {
                tags: store.unique_tags(),
                selected: selected_tag.to_string(),
            },
        }
    }

    pub fn with_alert(mut self, message: impl Into<String>) -> Self {
        self.alert = Some(message.into());
        self
    }
}

const STYLE: &str = "body{font-family:sans-serif;max-width:48rem;margin:2rem auto;padding:0 1rem}\
.post{border-bottom:1px solid #ddd;padding:1rem 0}.date{color:#666;font-size:.85rem}\
.tag{background:#eef;border-radius:3px;padding:0 .3rem}.alert{background:#fdd;padding:.5rem}\
form.post-form input,form.post-form textarea{display:block;width:100%;margin:.3rem 0}";

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape_html(title),
        STYLE,
        body
    )
}

/// Render the main page: form, tag filter, and post list.
pub fn render_page(page: &PageModel) -> String {
    let mut body = String::new();

    if let Some(alert) = &page.alert {
        let _ = writeln!(body, "<div class=\"alert\" role=\"alert\">{}</div>", escape_html(alert));
    }

    render_form(&mut body, page.mode, &page.form);
    render_tag_filter(&mut body, &page.filter);
    render_list(&mut body, &page.cards);

    layout("Blog", &body)
}

fn render_form(out: &mut String, mode: FormMode, form: &PostForm) {
    let heading = match mode {
        FormMode::New => "Write a new post",
        FormMode::Editing(_) => "Edit post",
    };
    let edit_id = match mode {
        FormMode::New => String::new(),
        FormMode::Editing(id) => id.to_string(),
    };

    let _ = writeln!(out, "<h1 id=\"form-title\">{}</h1>", heading);
    let _ = writeln!(
        out,
        "<form id=\"blog-form\" class=\"post-form\" method=\"post\" action=\"{}\">",
        routes::SUBMIT
    );
    let _ = writeln!(
        out,
        "<input type=\"hidden\" id=\"edit-id\" name=\"edit_id\" value=\"{}\">",
        edit_id
    );
    let _ = writeln!(
        out,
        "<input type=\"text\" id=\"title\" name=\"title\" placeholder=\"Title\" value=\"{}\">",
        escape_html(&form.title)
    );
    let _ = writeln!(
        out,
        "<textarea id=\"content\" name=\"content\" rows=\"6\" placeholder=\"Content\">{}</textarea>",
        escape_html(&form.content)
    );
    let _ = writeln!(
        out,
        "<input type=\"text\" id=\"tags\" name=\"tags\" placeholder=\"Tags (comma separated)\" value=\"{}\">",
        escape_html(&form.tags)
    );
    let _ = writeln!(out, "<button type=\"submit\">Save</button>");
    if let FormMode::Editing(_) = mode {
        let _ = writeln!(out, "<a id=\"cancel-btn\" href=\"{}\">Cancel</a>", routes::INDEX);
    }
    let _ = writeln!(out, "</form>");
}

fn render_tag_filter(out: &mut String, filter: &TagFilter) {
    let _ = writeln!(
        out,
        "<form class=\"filter-section\" method=\"get\" action=\"{}\">",
        routes::INDEX
    );
    let _ = writeln!(out, "<label for=\"tag-filter\">Filter by tag: </label>");
    let _ = writeln!(out, "<select id=\"tag-filter\" name=\"tag\">");
    let _ = writeln!(
        out,
        "<option value=\"\"{}>All</option>",
        selected_attr(filter.selected.is_empty())
    );
    for tag in &filter.tags {
        let escaped = escape_html(tag);
        let _ = writeln!(
            out,
            "<option value=\"{}\"{}>{}</option>",
            escaped,
            selected_attr(*tag == filter.selected),
            escaped
        );
    }
    let _ = writeln!(out, "</select>");
    let _ = writeln!(out, "<button type=\"submit\">Filter</button>");
    let _ = writeln!(out, "</form>");
}

fn selected_attr(selected: bool) -> &'static str {
    if selected {
        " selected"
    } else {
        ""
    }
}

fn render_list(out: &mut String, cards: &[PostCard]) {
    let _ = writeln!(out, "<div id=\"blog-list\">");
    if cards.is_empty() {
        let _ = writeln!(out, "<p class=\"empty\">No posts yet.</p>");
    }
    for card in cards {
        let tags = card
            .tags
            .iter()
            .map(|tag| format!("<span class=\"tag\">{}</span>", escape_html(tag)))
            .collect::<Vec<_>>()
            .join(", ");

        let _ = writeln!(out, "<div class=\"post\" id=\"post-{}\">", card.id);
        let _ = writeln!(out, "<h2 class=\"post-title\">{}</h2>", escape_html(&card.title));
        let _ = writeln!(
            out,
            "<div class=\"date\">Updated: {}</div>",
            escape_html(&card.updated)
        );
        let _ = writeln!(
            out,
            "<div class=\"post-content\">{}</div>",
            escape_multiline(&card.content)
        );
        let _ = writeln!(out, "<div class=\"post-tags\">Tags: {}</div>", tags);
        let _ = writeln!(
            out,
            "<div class=\"post-actions\"><a class=\"btn-edit\" href=\"{}\">Edit</a> \
             <a class=\"btn-delete\" href=\"{}\">Delete</a></div>",
            routes::edit_path(card.id),
            routes::delete_path(card.id)
        );
        let _ = writeln!(out, "</div>");
    }
    let _ = writeln!(out, "</div>");
}

/// Confirmation prompt shown before a delete.
pub fn render_delete_confirmation(card: &PostCard) -> String {
    let body = format!(
        "<h1>Delete this post?</h1>\n<p>&ldquo;{}&rdquo;</p>\n\
         <form method=\"post\" action=\"{}\">\n<button type=\"submit\">Delete</button>\n\
         <a href=\"{}\">Cancel</a>\n</form>\n",
        escape_html(&card.title),
        routes::delete_path(card.id),
        routes::INDEX
    );
    layout("Delete post", &body)
}

/// Minimal page for unexpected failures.
pub fn render_error(message: &str) -> String {
    let body = format!(
        "<h1>Something went wrong</h1>\n<p>{}</p>\n<a href=\"{}\">Back</a>\n",
        escape_html(message),
        routes::INDEX
    );
    layout("Error", &body)
}
