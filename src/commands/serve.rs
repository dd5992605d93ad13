//! Build the site, then serve it and accept new posts

use anyhow::Result;

use super::build;
use crate::server;
use crate::Journal;

/// Run the serve command
pub async fn run(journal: Journal, ip: &str, port: u16) -> Result<()> {
    tracing::info!("Generating static files...");
    let journal_for_build = journal.clone();
    let summary = tokio::task::spawn_blocking(move || build::run(&journal_for_build)).await??;
    println!("{}", summary);

    tracing::info!("Starting server at http://{}:{}", ip, port);
    server::start(journal, ip, port).await
}
