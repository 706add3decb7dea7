//! URL table for the HTML pages.
//!
//! The router registers these patterns and the views build links from the same helpers.

use crate::models::PostId;

pub const INDEX: &str = "/";
pub const SUBMIT: &str = "/posts";
pub const EDIT: &str = "/posts/{id}/edit";
pub const DELETE: &str = "/posts/{id}/delete";

pub fn edit_path(id: PostId) -> String {
    EDIT.replace("{id}", &id.to_string())
}

pub fn delete_path(id: PostId) -> String {
    DELETE.replace("{id}", &id.to_string())
}
