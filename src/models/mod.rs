//! Data models for the blog manager.

mod post;

pub use post::*;
