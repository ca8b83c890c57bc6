use crate::config::types::TrackingTable;
use crate::constants::BASELINE_SCRIPT;
use crate::migration::{AppliedMigration, BaselineMarker, MigrationType, MigrationVersion};
use crate::migration_tracking::{MarkerInsert, TrackingStore, format_tracking_table_name};
use anyhow::{Context, Result, anyhow};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::debug;

/// Tracking store backed by a PostgreSQL table
#[derive(Debug, Clone)]
pub struct PgTrackingStore {
    pool: PgPool,
    tracking_table: TrackingTable,
    table_name: String,
}

impl PgTrackingStore {
    pub fn new(pool: PgPool, tracking_table: &TrackingTable) -> Result<Self> {
        let table_name = format_tracking_table_name(tracking_table)?;
        Ok(Self {
            pool,
            tracking_table: tracking_table.clone(),
            table_name,
        })
    }

    /// Create the tracking table and its single-marker index if they are missing
    pub async fn ensure_tracking_table(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        self.lock_table(&mut tx).await?;
        self.create_table(&mut tx).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn lock_table(&self, tx: &mut Transaction<'_, Postgres>) -> Result<()> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(&self.table_name)
            .execute(&mut **tx)
            .await
            .with_context(|| format!("Failed to lock tracking table {}", self.table_name))?;
        Ok(())
    }

    async fn create_table(&self, tx: &mut Transaction<'_, Postgres>) -> Result<()> {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                installed_rank SERIAL PRIMARY KEY,
                version TEXT,
                description TEXT NOT NULL,
                type TEXT NOT NULL,
                script TEXT NOT NULL,
                checksum TEXT,
                installed_by TEXT DEFAULT CURRENT_USER,
                installed_on TIMESTAMP WITH TIME ZONE DEFAULT CURRENT_TIMESTAMP,
                execution_time INTEGER NOT NULL DEFAULT 0,
                success BOOLEAN NOT NULL
            )
            "#,
            self.table_name
        ))
        .execute(&mut **tx)
        .await
        .with_context(|| format!("Failed to create tracking table {}", self.table_name))?;

        // At most one baseline marker per table
        sqlx::query(&format!(
            r#"CREATE UNIQUE INDEX IF NOT EXISTS "{}_baseline_marker" ON {} (type) WHERE type = '{}'"#,
            self.tracking_table.name,
            self.table_name,
            MigrationType::Baseline.as_str()
        ))
        .execute(&mut **tx)
        .await
        .with_context(|| {
            format!(
                "Failed to create baseline marker index on {}",
                self.table_name
            )
        })?;

        Ok(())
    }

    async fn table_exists(&self) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT to_regclass($1) IS NOT NULL")
            .bind(&self.table_name)
            .fetch_one(&self.pool)
            .await
            .with_context(|| format!("Failed to look up tracking table {}", self.table_name))?;
        Ok(exists)
    }
}

fn parse_stored_version(raw: Option<String>) -> Result<Option<MigrationVersion>> {
    raw.map(|v| {
        MigrationVersion::parse(&v)
            .map_err(|e| anyhow!("Corrupted version '{}' in tracking table: {}", v, e))
    })
    .transpose()
}

fn applied_from_row(row: &PgRow) -> Result<AppliedMigration> {
    let migration_type: String = row.try_get("type")?;
    Ok(AppliedMigration {
        installed_rank: row.try_get("installed_rank")?,
        version: parse_stored_version(row.try_get("version")?)?,
        description: row.try_get("description")?,
        migration_type: migration_type.parse()?,
        script: row.try_get("script")?,
        checksum: row.try_get("checksum")?,
        installed_by: row.try_get("installed_by")?,
        installed_on: row.try_get("installed_on")?,
        execution_time_ms: row.try_get("execution_time")?,
        success: row.try_get("success")?,
    })
}

impl TrackingStore for PgTrackingStore {
    fn identifier(&self) -> String {
        self.table_name.clone()
    }

    async fn has_applied_migrations(&self) -> Result<bool> {
        if !self.table_exists().await? {
            return Ok(false);
        }

        let exists: bool = sqlx::query_scalar(&format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE type NOT IN ($1, $2))",
            self.table_name
        ))
        .bind(MigrationType::Schema.as_str())
        .bind(MigrationType::Baseline.as_str())
        .fetch_one(&self.pool)
        .await
        .with_context(|| format!("Failed to query applied migrations in {}", self.table_name))?;

        Ok(exists)
    }

    async fn baseline_marker(&self) -> Result<Option<BaselineMarker>> {
        if !self.table_exists().await? {
            return Ok(None);
        }

        let row: Option<(Option<String>, String)> = sqlx::query_as(&format!(
            "SELECT version, description FROM {} WHERE type = $1",
            self.table_name
        ))
        .bind(MigrationType::Baseline.as_str())
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Failed to query baseline marker in {}", self.table_name))?;

        match row {
            None => Ok(None),
            Some((version, description)) => match parse_stored_version(version)? {
                Some(version) => Ok(Some(BaselineMarker::new(version, description))),
                None => Err(anyhow!(
                    "Baseline marker in {} has no version",
                    self.table_name
                )),
            },
        }
    }

    async fn add_baseline_marker(
        &self,
        version: &MigrationVersion,
        description: &str,
    ) -> Result<MarkerInsert> {
        let mut tx = self.pool.begin().await?;
        self.lock_table(&mut tx).await?;
        self.create_table(&mut tx).await?;

        let has_history: bool = sqlx::query_scalar(&format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE type NOT IN ($1, $2))",
            self.table_name
        ))
        .bind(MigrationType::Schema.as_str())
        .bind(MigrationType::Baseline.as_str())
        .fetch_one(&mut *tx)
        .await?;

        if has_history {
            debug!("Refusing baseline marker: {} has history", self.table_name);
            tx.rollback().await?;
            return Ok(MarkerInsert::HistoryPresent);
        }

        let marker = AppliedMigration::new(
            Some(version.clone()),
            description,
            MigrationType::Baseline,
            BASELINE_SCRIPT,
            None,
            0,
            true,
        );

        let result = sqlx::query(&format!(
            "INSERT INTO {} (version, description, type, script, execution_time, success) \
             VALUES ($1, $2, $3, $4, $5, $6) ON CONFLICT DO NOTHING",
            self.table_name
        ))
        .bind(version.as_str())
        .bind(&marker.description)
        .bind(marker.migration_type.as_str())
        .bind(&marker.script)
        .bind(marker.execution_time_ms)
        .bind(marker.success)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to record baseline {} in tracking table", version))?;

        if result.rows_affected() == 0 {
            debug!("Baseline marker already present in {}", self.table_name);
            tx.rollback().await?;
            return Ok(MarkerInsert::MarkerPresent);
        }

        tx.commit().await?;
        Ok(MarkerInsert::Inserted)
    }

    async fn applied_migrations(&self) -> Result<Vec<AppliedMigration>> {
        if !self.table_exists().await? {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(&format!(
            "SELECT installed_rank, version, description, type, script, checksum, \
             installed_by, installed_on, execution_time, success \
             FROM {} ORDER BY installed_rank",
            self.table_name
        ))
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("Failed to read tracking table {}", self.table_name))?;

        rows.iter().map(applied_from_row).collect()
    }
}
