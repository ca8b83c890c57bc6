use crate::config::types::*;
use crate::constants::DEFAULT_BASELINE_DESCRIPTION;
use crate::migration::MigrationVersion;

impl Default for Database {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/postgres".to_string(),
        }
    }
}

impl Default for Directories {
    fn default() -> Self {
        Self {
            migrations: "migrations".to_string(),
        }
    }
}

impl Default for TrackingTable {
    fn default() -> Self {
        Self {
            schema: "public".to_string(),
            name: "pgbaseline_history".to_string(),
        }
    }
}

impl Default for Baseline {
    fn default() -> Self {
        Self {
            version: MigrationVersion::default_baseline(),
            description: DEFAULT_BASELINE_DESCRIPTION.to_string(),
        }
    }
}
