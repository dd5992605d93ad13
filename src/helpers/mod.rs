//! Small pure helpers shared by content loading and generation

mod date;
mod slug;
mod url;

pub use date::*;
pub use slug::*;
pub use url::*;
