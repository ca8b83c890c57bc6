// Migration file naming conventions
pub const MIGRATION_FILENAME_PREFIX: &str = "V";
pub const MIGRATION_FILENAME_SEPARATOR: &str = "__";
pub const MIGRATION_FILENAME_SUFFIX: &str = ".sql";

// Configuration file name
pub const CONFIG_FILENAME: &str = "pgbaseline.yaml";

// Reserved for the schema-creation bookkeeping row; never a legal baseline target
pub const SCHEMA_CREATION_VERSION: &str = "0";

pub const DEFAULT_BASELINE_VERSION: &str = "1";
pub const DEFAULT_BASELINE_DESCRIPTION: &str = "<< Baseline >>";

// Script column value for the baseline marker row
pub const BASELINE_SCRIPT: &str = "<< Baseline >>";

// Tracking table column limits
pub const MAX_DESCRIPTION_LENGTH: usize = 200;
pub const MAX_SCRIPT_LENGTH: usize = 1000;
