use std::path::Path;

use paintsync_core::load_sync_config;
use paintsync_fetch::client::DEFAULT_USER_AGENT;
use paintsync_fetch::CatalogClient;
use paintsync_sync::{preview_catalogs, run_sync, SyncError, SyncReport};

/// Run the refresh, or only the fetch and flatten steps when `dry_run` is set.
pub(crate) async fn run(conf: &Path, dry_run: bool) -> Result<(), SyncError> {
    let config = load_sync_config(conf)?;
    tracing::debug!(path = %conf.display(), sources = config.sources.len(), "configuration loaded");

    let report = if dry_run {
        let client = CatalogClient::new(DEFAULT_USER_AGENT)?;
        preview_catalogs(&config, &client).await?
    } else {
        run_sync(&config).await?
    };

    println!("{}", summarize(&report));
    Ok(())
}

pub(crate) fn summarize(report: &SyncReport) -> String {
    let elapsed_ms = (report.finished_at - report.started_at).num_milliseconds();
    if report.dry_run {
        format!(
            "dry-run {}: would load {} records from {} envelopes across {} sources ({elapsed_ms} ms)",
            report.run_id, report.records_flattened, report.envelopes, report.sources
        )
    } else {
        format!(
            "run {}: loaded {} records from {} envelopes across {} sources ({elapsed_ms} ms)",
            report.run_id, report.records_loaded, report.envelopes, report.sources
        )
    }
}
