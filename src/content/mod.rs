//! Content module - post records, loading, formatting and selection

mod anchor;
mod filter;
mod formatter;
mod post;
mod related;
pub mod repository;

pub use anchor::{anchor_id, table_of_contents, AnchorRegistry, TocEntry};
pub use filter::{filter_posts, CategoryFilter, PostFilter};
pub use formatter::format_content;
pub use post::{Post, PostContent, Section};
pub use related::related_posts;
pub use repository::{CategoryCount, DataSource, PostRepository};
