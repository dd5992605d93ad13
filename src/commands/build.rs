//! Regenerate the whole site

use anyhow::Result;
use std::time::Instant;

use crate::generator::RebuildSummary;
use crate::Journal;

/// Rebuild every post page, thumbnail and index
pub fn run(journal: &Journal) -> Result<RebuildSummary> {
    let start = Instant::now();
    let summary = journal.rebuild(None)?;
    tracing::info!("Generated site in {:.2?}", start.elapsed());
    Ok(summary)
}
