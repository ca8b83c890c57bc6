use crate::migration::parsing::{calculate_checksum, parse_migration_filename};
use crate::migration::types::{MigrationType, ResolvedMigration};
use anyhow::{Context, Result, anyhow};
use std::path::PathBuf;
use tracing::debug;

/// Source of the versioned migrations a deployment knows about
pub trait MigrationResolver {
    /// All available migrations, sorted by version
    fn resolve(&self) -> Result<Vec<ResolvedMigration>>;
}

/// Resolves `V<version>__<description>.sql` scripts from a single directory
#[derive(Debug, Clone)]
pub struct FileSystemResolver {
    migrations_dir: PathBuf,
}

impl FileSystemResolver {
    pub fn new(migrations_dir: impl Into<PathBuf>) -> Self {
        Self {
            migrations_dir: migrations_dir.into(),
        }
    }
}

impl MigrationResolver for FileSystemResolver {
    fn resolve(&self) -> Result<Vec<ResolvedMigration>> {
        let mut migrations = Vec::new();

        if !self.migrations_dir.exists() {
            debug!(
                "Migrations directory {} does not exist",
                self.migrations_dir.display()
            );
            return Ok(migrations);
        }

        let entries = std::fs::read_dir(&self.migrations_dir).with_context(|| {
            format!(
                "Failed to read migrations directory: {}",
                self.migrations_dir.display()
            )
        })?;

        for entry in entries {
            let path = entry?.path();

            if path.is_file()
                && let Some(filename) = path.file_name().and_then(|n| n.to_str())
                && let Some((version, description)) = parse_migration_filename(filename)?
            {
                let content = std::fs::read_to_string(&path).with_context(|| {
                    format!("Failed to read migration file: {}", path.display())
                })?;

                migrations.push(ResolvedMigration {
                    version,
                    description,
                    script: filename.to_string(),
                    checksum: calculate_checksum(&content),
                    migration_type: MigrationType::Sql,
                    physical_location: path,
                });
            }
        }

        migrations.sort_by(|a, b| a.version.cmp(&b.version));

        if let Some(pair) = migrations.windows(2).find(|w| w[0].version == w[1].version) {
            return Err(anyhow!(
                "Found more than one migration with version {}: {} and {}",
                pair[0].version,
                pair[0].physical_location.display(),
                pair[1].physical_location.display()
            ));
        }

        debug!(
            "Resolved {} migration(s) from {}",
            migrations.len(),
            self.migrations_dir.display()
        );

        Ok(migrations)
    }
}

/// Resolver over a fixed list, for callers that already know their migrations
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    migrations: Vec<ResolvedMigration>,
}

impl StaticResolver {
    pub fn new(mut migrations: Vec<ResolvedMigration>) -> Self {
        migrations.sort_by(|a, b| a.version.cmp(&b.version));
        Self { migrations }
    }
}

impl MigrationResolver for StaticResolver {
    fn resolve(&self) -> Result<Vec<ResolvedMigration>> {
        Ok(self.migrations.clone())
    }
}
