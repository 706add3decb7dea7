//! Rendering helpers shared by the HTML views.

mod html;
mod timestamp;

pub use html::*;
pub use timestamp::*;
