use crate::helpers::harness::with_test_db;
use anyhow::Result;
use pgbaseline::config::types::TrackingTable;
use pgbaseline::migration::{MigrationType, MigrationVersion, StaticResolver};
use pgbaseline::migration_tracking::PgTrackingStore;
use pgbaseline::{BaselineCommand, BaselineError, BaselineMarker, MarkerInsert, TrackingStore};

fn v(s: &str) -> MigrationVersion {
    MigrationVersion::parse(s).unwrap()
}

fn tracking_table() -> TrackingTable {
    TrackingTable {
        schema: "public".to_string(),
        name: "schema_version".to_string(),
    }
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_reads_on_missing_table() -> Result<()> {
    with_test_db(async |db| {
        let store = PgTrackingStore::new(db.pool().clone(), &tracking_table())?;

        assert!(!store.has_applied_migrations().await?);
        assert!(!store.has_baseline_marker().await?);
        assert!(store.applied_migrations().await?.is_empty());
        assert_eq!(store.identifier(), r#""public"."schema_version""#);

        Ok(())
    })
    .await
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_add_marker_creates_table_and_row() -> Result<()> {
    with_test_db(async |db| {
        let store = PgTrackingStore::new(db.pool().clone(), &tracking_table())?;

        assert_eq!(
            store.add_baseline_marker(&v("1.2"), "adopt").await?,
            MarkerInsert::Inserted
        );
        assert_eq!(
            store.baseline_marker().await?,
            Some(BaselineMarker::new(v("1.2"), "adopt"))
        );

        let rows = store.applied_migrations().await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].migration_type, MigrationType::Baseline);
        assert!(rows[0].success);
        assert!(rows[0].installed_on.is_some());
        assert!(!store.has_applied_migrations().await?);

        Ok(())
    })
    .await
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_second_marker_is_refused() -> Result<()> {
    with_test_db(async |db| {
        let store = PgTrackingStore::new(db.pool().clone(), &tracking_table())?;
        store.add_baseline_marker(&v("1"), "init").await?;

        assert_eq!(
            store.add_baseline_marker(&v("2"), "other").await?,
            MarkerInsert::MarkerPresent
        );

        // the unique index holds even for writers that bypass the store
        let direct = sqlx::query(
            "INSERT INTO \"public\".\"schema_version\" (version, description, type, script, success) \
             VALUES ('3', 'sneaky', 'BASELINE', 'x', TRUE)",
        )
        .execute(db.pool())
        .await;
        assert!(direct.is_err());

        assert_eq!(
            store.baseline_marker().await?,
            Some(BaselineMarker::new(v("1"), "init"))
        );
        Ok(())
    })
    .await
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_history_blocks_baseline() -> Result<()> {
    with_test_db(async |db| {
        let store = PgTrackingStore::new(db.pool().clone(), &tracking_table())?;
        store.ensure_tracking_table().await?;
        db.execute(
            "INSERT INTO \"public\".\"schema_version\" (version, description, type, script, checksum, success) \
             VALUES ('1', 'create users', 'SQL', 'V1__create_users.sql', 'abc', TRUE)",
        )
        .await;

        assert!(store.has_applied_migrations().await?);
        assert_eq!(
            store.add_baseline_marker(&v("1"), "init").await?,
            MarkerInsert::HistoryPresent
        );

        let resolver = StaticResolver::default();
        let err = BaselineCommand::new(&resolver, v("1"), &store, "init")
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, BaselineError::AlreadyMigrated { .. }));
        assert!(!store.has_baseline_marker().await?);

        Ok(())
    })
    .await
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_baseline_command_scenario() -> Result<()> {
    with_test_db(async |db| {
        let store = PgTrackingStore::new(db.pool().clone(), &tracking_table())?;
        let resolver = StaticResolver::default();

        let reserved = BaselineCommand::new(&resolver, v("0"), &store, "init")
            .run()
            .await;
        assert!(matches!(reserved, Err(BaselineError::ReservedVersion { .. })));

        BaselineCommand::new(&resolver, v("1"), &store, "init")
            .run()
            .await?;
        BaselineCommand::new(&resolver, v("1"), &store, "init")
            .run()
            .await?;

        let conflict = BaselineCommand::new(&resolver, v("2"), &store, "other")
            .run()
            .await;
        assert!(matches!(conflict, Err(BaselineError::Conflict { .. })));

        assert_eq!(store.applied_migrations().await?.len(), 1);
        Ok(())
    })
    .await
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_concurrent_baselines_on_separate_connections() -> Result<()> {
    with_test_db(async |db| {
        let first = PgTrackingStore::new(db.pool().clone(), &tracking_table())?;
        let second = PgTrackingStore::new(db.pool().clone(), &tracking_table())?;

        let handles: Vec<_> = [(first, "1", "init"), (second, "2", "other")]
            .into_iter()
            .map(|(store, version, description)| {
                tokio::spawn(async move {
                    let resolver = StaticResolver::default();
                    BaselineCommand::new(&resolver, v(version), &store, description)
                        .run()
                        .await
                })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            match handle.await? {
                Ok(()) => successes += 1,
                Err(BaselineError::Conflict { .. }) => {}
                Err(other) => panic!("unexpected outcome: {other}"),
            }
        }
        assert_eq!(successes, 1);

        let markers: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM \"public\".\"schema_version\" WHERE type = 'BASELINE'",
        )
        .fetch_one(db.pool())
        .await?;
        assert_eq!(markers, 1);

        Ok(())
    })
    .await
}
