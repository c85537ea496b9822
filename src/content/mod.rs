//! Content module - loads posts and derives their summaries

mod error;
mod frontmatter;
pub mod loader;
mod post;

pub use error::PostError;
pub use frontmatter::{parse_date_string, FrontMatter};
pub use post::{Article, Post};
