use crate::baseline::error::{BaselineError, BaselineResult};
use crate::constants::MAX_DESCRIPTION_LENGTH;
use crate::migration::{BaselineMarker, MigrationResolver, MigrationVersion};
use crate::migration_tracking::{MarkerInsert, TrackingStore};

/// Establishes the baseline marker of a tracking store.
///
/// The resolver is held alongside the store so the command can be built the
/// same way as the other migration commands, but baselining never consults it.
pub struct BaselineCommand<'a, R, S> {
    #[allow(dead_code)]
    resolver: &'a R,
    baseline_version: MigrationVersion,
    store: &'a S,
    baseline_description: String,
}

impl<'a, R, S> BaselineCommand<'a, R, S>
where
    R: MigrationResolver,
    S: TrackingStore,
{
    pub fn new(
        resolver: &'a R,
        baseline_version: MigrationVersion,
        store: &'a S,
        baseline_description: impl Into<String>,
    ) -> Self {
        Self {
            resolver,
            baseline_version,
            store,
            baseline_description: baseline_description.into(),
        }
    }

    /// Write the baseline marker, or confirm an identical one already exists.
    ///
    /// Performs at most one write. Applied migrations take precedence over
    /// every other check.
    pub async fn run(&self) -> BaselineResult<()> {
        // The marker is stored verbatim so reruns compare against the same text
        let length = self.baseline_description.chars().count();
        if length > MAX_DESCRIPTION_LENGTH {
            return Err(BaselineError::DescriptionTooLong {
                store: self.store.identifier(),
                length,
                max: MAX_DESCRIPTION_LENGTH,
            });
        }

        let existing = self.store.baseline_marker().await.map_err(|e| self.store_error(e))?;
        let has_history = self
            .store
            .has_applied_migrations()
            .await
            .map_err(|e| self.store_error(e))?;

        if has_history {
            return Err(self.already_migrated());
        }

        match existing {
            Some(existing) => self.compare_with(existing),
            None => {
                if self.baseline_version.is_schema_creation() {
                    return Err(BaselineError::ReservedVersion {
                        store: self.store.identifier(),
                    });
                }
                self.write_marker().await
            }
        }
    }

    async fn write_marker(&self) -> BaselineResult<()> {
        let outcome = self
            .store
            .add_baseline_marker(&self.baseline_version, &self.baseline_description)
            .await
            .map_err(|e| self.store_error(e))?;

        match outcome {
            MarkerInsert::Inserted => Ok(()),
            MarkerInsert::HistoryPresent => Err(self.already_migrated()),
            MarkerInsert::MarkerPresent => {
                // Lost the race: classify against whatever the winner wrote
                let winner = self
                    .store
                    .baseline_marker()
                    .await
                    .map_err(|e| self.store_error(e))?;
                match winner {
                    Some(winner) => self.compare_with(winner),
                    None => Err(BaselineError::ConcurrentWrite {
                        store: self.store.identifier(),
                    }),
                }
            }
        }
    }

    fn compare_with(&self, existing: BaselineMarker) -> BaselineResult<()> {
        if existing.matches(&self.baseline_version, &self.baseline_description) {
            return Ok(());
        }

        Err(BaselineError::Conflict {
            store: self.store.identifier(),
            requested: self.requested(),
            existing,
        })
    }

    fn requested(&self) -> BaselineMarker {
        BaselineMarker::new(
            self.baseline_version.clone(),
            self.baseline_description.clone(),
        )
    }

    fn already_migrated(&self) -> BaselineError {
        BaselineError::AlreadyMigrated {
            store: self.store.identifier(),
        }
    }

    fn store_error(&self, source: anyhow::Error) -> BaselineError {
        BaselineError::Store {
            store: self.store.identifier(),
            source,
        }
    }
}
