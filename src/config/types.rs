use crate::migration::MigrationVersion;
use clap::Args;
use serde::{Deserialize, Serialize};

/// Raw configuration input - all fields Optional for merging
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ConfigInput {
    pub database: Option<DatabaseInput>,
    pub directories: Option<DirectoriesInput>,
    pub tracking_table: Option<TrackingTableInput>,
    pub baseline: Option<BaselineInput>,
}

/// Resolved configuration with all defaults applied
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub database: Database,
    pub directories: Directories,
    pub tracking_table: TrackingTable,
    pub baseline: Baseline,
}

// Database configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DatabaseInput {
    pub url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

// Directory configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DirectoriesInput {
    pub migrations_dir: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Directories {
    pub migrations: String,
}

// Tracking table configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TrackingTableInput {
    pub schema: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingTable {
    pub schema: String,
    pub name: String,
}

// Baseline configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BaselineInput {
    pub version: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Baseline {
    pub version: MigrationVersion,
    pub description: String,
}

// CLI argument groups for command-specific options
#[derive(Debug, Clone, Default, Args)]
pub struct DatabaseArgs {
    #[arg(long, help = "Database URL holding the tracking table")]
    pub database_url: Option<String>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct DirectoryArgs {
    #[arg(long, help = "Migrations directory path")]
    pub migrations_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct TrackingTableArgs {
    #[arg(long, help = "Schema of the tracking table")]
    pub tracking_schema: Option<String>,

    #[arg(long, help = "Name of the tracking table")]
    pub tracking_table: Option<String>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct BaselineArgs {
    #[arg(long, help = "Version to tag the existing schema with")]
    pub baseline_version: Option<String>,

    #[arg(long, help = "Description recorded with the baseline marker")]
    pub description: Option<String>,
}

// Conversion functions from CLI args to config input
impl From<DatabaseArgs> for DatabaseInput {
    fn from(args: DatabaseArgs) -> Self {
        Self {
            url: args.database_url,
        }
    }
}

impl From<DirectoryArgs> for DirectoriesInput {
    fn from(args: DirectoryArgs) -> Self {
        Self {
            migrations_dir: args.migrations_dir,
        }
    }
}

impl From<TrackingTableArgs> for TrackingTableInput {
    fn from(args: TrackingTableArgs) -> Self {
        Self {
            schema: args.tracking_schema,
            name: args.tracking_table,
        }
    }
}

impl From<BaselineArgs> for BaselineInput {
    fn from(args: BaselineArgs) -> Self {
        Self {
            version: args.baseline_version,
            description: args.description,
        }
    }
}
