//! Configuration module

mod site;

pub use site::HighlightConfig;
pub use site::JournalConfig;
pub use site::CONFIG_FILE;
