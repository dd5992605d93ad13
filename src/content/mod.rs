//! Content module - post records, the post scanner and new-post creation

mod frontmatter;
pub mod loader;
mod markdown;
pub mod media;
mod post;
pub mod schema;
mod submission;

pub use frontmatter::FrontMatter;
pub use loader::ContentLoader;
pub use markdown::MarkdownRenderer;
pub use media::{MediaOptions, Upload};
pub use post::{
    author_or_unknown, ExistingPost, NewPost, PostRecord, DEFAULT_TAG, MEDIA_DIR, POST_FILE,
    POST_PAGE, UNKNOWN_AUTHOR,
};
pub use submission::{extract_tags, Submission, TAG_FIELD_PREFIX};
