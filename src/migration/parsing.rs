use crate::constants::{
    MIGRATION_FILENAME_PREFIX, MIGRATION_FILENAME_SEPARATOR, MIGRATION_FILENAME_SUFFIX,
};
use crate::migration::version::MigrationVersion;
use anyhow::{Context, Result};

/// Parse a migration filename like "V1_2__add_user_index.sql" into its version
/// and a human readable description ("add user index").
///
/// Returns `Ok(None)` for files that do not follow the naming convention, so
/// that unrelated files in the migrations directory are ignored. A file that
/// does follow it but carries an unparseable version is an error.
pub fn parse_migration_filename(filename: &str) -> Result<Option<(MigrationVersion, String)>> {
    let Some((version_str, description)) = filename
        .strip_prefix(MIGRATION_FILENAME_PREFIX)
        .and_then(|rest| rest.strip_suffix(MIGRATION_FILENAME_SUFFIX))
        .and_then(|stem| stem.split_once(MIGRATION_FILENAME_SEPARATOR))
    else {
        return Ok(None);
    };

    let version = MigrationVersion::parse(version_str)
        .with_context(|| format!("Invalid version in migration filename '{}'", filename))?;

    Ok(Some((version, description.replace('_', " ").trim().to_string())))
}

/// Calculate checksum for migration content
pub fn calculate_checksum(content: &str) -> String {
    format!("{:x}", md5::compute(content))
}
