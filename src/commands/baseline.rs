use crate::baseline::BaselineCommand;
use crate::config::Config;
use crate::db::connection::{connect_with_retry, mask_url_password};
use crate::migration::FileSystemResolver;
use crate::migration_tracking::{PgTrackingStore, TrackingStore, format_tracking_table_name};
use anyhow::Result;
use console::style;
use std::path::Path;
use tracing::{debug, info};

pub async fn cmd_baseline(config: &Config, root_dir: &Path) -> Result<()> {
    let table_name = format_tracking_table_name(&config.tracking_table)?;
    info!(
        "Baselining {} on {}",
        table_name,
        mask_url_password(&config.database.url)
    );
    let pool = connect_with_retry(&config.database.url).await?;

    let store = PgTrackingStore::new(pool.clone(), &config.tracking_table)?;
    let resolver = FileSystemResolver::new(root_dir.join(&config.directories.migrations));

    let version = config.baseline.version.clone();
    let description = config.baseline.description.clone();

    debug!(
        "Baselining {} with ({},{})",
        store.identifier(),
        version,
        description
    );

    let outcome = BaselineCommand::new(&resolver, version.clone(), &store, description.as_str())
        .run()
        .await;

    pool.close().await;
    outcome?;

    println!(
        "{} Baseline {} ({}) is recorded in {}",
        style("✓").green(),
        style(&version).bold(),
        description,
        store.identifier()
    );

    Ok(())
}
