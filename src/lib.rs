pub mod baseline;
pub mod commands;
pub mod config;
pub mod constants;
pub mod db;
pub mod migration;
pub mod migration_tracking;

pub use baseline::{BaselineCommand, BaselineError};
pub use migration::{BaselineMarker, MigrationResolver, MigrationVersion};
pub use migration_tracking::{MarkerInsert, TrackingStore};
