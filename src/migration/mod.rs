pub mod info;
pub mod parsing;
pub mod resolver;
pub mod types;
pub mod version;

pub use info::{MigrationInfo, MigrationState, migration_infos};
pub use parsing::{calculate_checksum, parse_migration_filename};
pub use resolver::{FileSystemResolver, MigrationResolver, StaticResolver};
pub use types::{AppliedMigration, BaselineMarker, MigrationType, ResolvedMigration};
pub use version::{MigrationVersion, VersionError};
