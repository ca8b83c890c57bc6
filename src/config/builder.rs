use crate::config::{merge::Merge, types::*};
use crate::constants::MAX_DESCRIPTION_LENGTH;
use crate::migration::MigrationVersion;
use anyhow::{Context, Result, bail};

pub struct ConfigBuilder {
    config_input: ConfigInput,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config_input: ConfigInput::default(),
        }
    }

    pub fn with_file(mut self, file_input: ConfigInput) -> Self {
        self.config_input = self.config_input.merge(file_input);
        self
    }

    pub fn with_cli_args(mut self, cli_input: ConfigInput) -> Self {
        self.config_input = self.config_input.merge(cli_input);
        self
    }

    pub fn resolve(self) -> Result<Config> {
        let defaults = Config::default();

        Ok(Config {
            database: self.resolve_database(&defaults.database),
            directories: self.resolve_directories(&defaults.directories),
            tracking_table: self.resolve_tracking_table(&defaults.tracking_table),
            baseline: self.resolve_baseline(&defaults.baseline)?,
        })
    }

    fn resolve_database(&self, defaults: &Database) -> Database {
        let url = self
            .config_input
            .database
            .as_ref()
            .and_then(|d| d.url.as_ref())
            .cloned()
            .or_else(|| std::env::var("DATABASE_URL").ok())
            .unwrap_or_else(|| defaults.url.clone());

        Database { url }
    }

    fn resolve_directories(&self, defaults: &Directories) -> Directories {
        let dir_input = self.config_input.directories.as_ref();

        Directories {
            migrations: dir_input
                .and_then(|d| d.migrations_dir.as_ref())
                .cloned()
                .unwrap_or_else(|| defaults.migrations.clone()),
        }
    }

    fn resolve_tracking_table(&self, defaults: &TrackingTable) -> TrackingTable {
        let table_input = self.config_input.tracking_table.as_ref();

        TrackingTable {
            schema: table_input
                .and_then(|t| t.schema.as_ref())
                .cloned()
                .unwrap_or_else(|| defaults.schema.clone()),
            name: table_input
                .and_then(|t| t.name.as_ref())
                .cloned()
                .unwrap_or_else(|| defaults.name.clone()),
        }
    }

    fn resolve_baseline(&self, defaults: &Baseline) -> Result<Baseline> {
        let baseline_input = self.config_input.baseline.as_ref();

        let version = match baseline_input.and_then(|b| b.version.as_deref()) {
            Some(raw) => MigrationVersion::parse(raw)
                .with_context(|| format!("Invalid baseline version '{}'", raw))?,
            None => defaults.version.clone(),
        };

        let description = baseline_input
            .and_then(|b| b.description.as_ref())
            .cloned()
            .unwrap_or_else(|| defaults.description.clone());

        let length = description.chars().count();
        if length > MAX_DESCRIPTION_LENGTH {
            bail!(
                "Baseline description is {} characters long, the limit is {}",
                length,
                MAX_DESCRIPTION_LENGTH
            );
        }

        Ok(Baseline {
            version,
            description,
        })
    }
}
