use std::fmt::Write as _;
use std::path::Path;

use paintsync_core::{load_sync_config, CatalogSource, SyncConfig};
use paintsync_sync::SyncError;

pub(crate) fn run(conf: &Path) -> Result<(), SyncError> {
    let config = load_sync_config(conf)?;
    print!("{}", render_config(&config));
    Ok(())
}

/// Human-readable dump of the resolved configuration. The password is never
/// printed.
pub(crate) fn render_config(config: &SyncConfig) -> String {
    let store = &config.store;
    let mut out = String::new();

    if let Some(description) = &config.description {
        let _ = writeln!(out, "description: {description}");
    }
    let _ = writeln!(out, "store:");
    let _ = writeln!(out, "  url: {}", store.redacted_url());
    let _ = writeln!(out, "  login: {}", store.login);
    let _ = writeln!(out, "  hostname: {}", store.hostname);
    let _ = writeln!(out, "  port: {}", store.port);
    let _ = writeln!(out, "  database: {}", store.database);
    if !store.options.is_empty() {
        let _ = writeln!(out, "  options: {}", store.options);
    }
    let _ = writeln!(out, "  timeout: {}s", store.dial_timeout.as_secs());
    let _ = writeln!(out, "  collection: {}", store.collection);
    let _ = writeln!(out, "  drop-scope: {}", store.drop_scope);
    if let Some(description) = &store.description {
        let _ = writeln!(out, "  description: {description}");
    }

    write_sources(&mut out, "sources", &config.sources);
    if !config.reserved_sources.is_empty() {
        write_sources(&mut out, "reserved (not synced)", &config.reserved_sources);
    }
    out
}

fn write_sources(out: &mut String, heading: &str, sources: &[CatalogSource]) {
    let _ = writeln!(out, "{heading}:");
    for source in sources {
        let _ = writeln!(out, "  {}: {}", source.name, source.url);
    }
}
