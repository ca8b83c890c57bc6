use crate::config::Config;
use crate::db::connection::connect_with_retry;
use crate::migration::{
    FileSystemResolver, MigrationInfo, MigrationResolver, MigrationState, migration_infos,
};
use crate::migration_tracking::{PgTrackingStore, TrackingStore, format_tracking_table_name};
use anyhow::Result;
use console::style;
use std::path::Path;
use tracing::info;

#[derive(clap::ValueEnum, Clone, Debug, PartialEq)]
pub enum StatusFormat {
    /// Human-readable table
    Human,
    /// JSON output for piping to jq
    Json,
}

pub async fn cmd_status(config: &Config, root_dir: &Path, format: StatusFormat) -> Result<()> {
    format_tracking_table_name(&config.tracking_table)?;

    let resolver = FileSystemResolver::new(root_dir.join(&config.directories.migrations));
    let resolved = resolver.resolve()?;

    let pool = connect_with_retry(&config.database.url).await?;
    let store = PgTrackingStore::new(pool.clone(), &config.tracking_table)?;
    let applied = store.applied_migrations().await;
    pool.close().await;
    let applied = applied?;

    info!(
        "{} resolved migration(s), {} tracking row(s)",
        resolved.len(),
        applied.len()
    );

    let infos = migration_infos(&resolved, &applied);

    match format {
        StatusFormat::Json => println!("{}", serde_json::to_string_pretty(&infos)?),
        StatusFormat::Human => print_status_table(&store.identifier(), &infos),
    }

    Ok(())
}

fn print_status_table(table_name: &str, infos: &[MigrationInfo]) {
    println!("📋 Migration status for {}", style(table_name).bold());

    if infos.is_empty() {
        println!("No migrations found");
        return;
    }

    println!();
    println!(
        "{:<12} {:<40} {:<8} {:<20}",
        "Version", "Description", "State", "Installed on"
    );

    for info in infos {
        let version = info
            .version
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_default();
        let installed_on = info
            .installed_on
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();
        let state = format!("{:<8}", info.state.display_name());
        let state = match info.state {
            MigrationState::Success | MigrationState::Baseline => style(state).green(),
            MigrationState::Failed => style(state).red(),
            MigrationState::Missing | MigrationState::Future => style(state).yellow(),
            MigrationState::Pending | MigrationState::BelowBaseline => style(state).dim(),
        };

        println!(
            "{:<12} {:<40} {} {:<20}",
            version, info.description, state, installed_on
        );
    }

    let applied = infos.iter().filter(|i| i.state.is_applied()).count();
    let failed = infos.iter().filter(|i| i.state.is_failed()).count();
    println!();
    println!(
        "{} applied, {} not applied, {} failed",
        applied,
        infos.len() - applied,
        failed
    );
}
