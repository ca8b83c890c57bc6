use crate::migration::BaselineMarker;
use thiserror::Error;

/// Why a baseline request was refused.
///
/// Every variant is terminal for the invocation. None of them is transient,
/// so they are returned to the caller unchanged.
#[derive(Error, Debug)]
pub enum BaselineError {
    #[error("Unable to baseline metadata table {store} as it already contains migrations")]
    AlreadyMigrated { store: String },

    #[error(
        "Unable to baseline metadata table {store} with {requested} as it has already been initialized with {existing}"
    )]
    Conflict {
        store: String,
        requested: BaselineMarker,
        existing: BaselineMarker,
    },

    #[error(
        "Unable to baseline metadata table {store} with version 0 as this version was used for schema creation"
    )]
    ReservedVersion { store: String },

    #[error(
        "Unable to baseline metadata table {store}: description is {length} characters long, the limit is {max}"
    )]
    DescriptionTooLong {
        store: String,
        length: usize,
        max: usize,
    },

    #[error(
        "Unable to baseline metadata table {store}: a concurrent baseline changed the marker while it was being written"
    )]
    ConcurrentWrite { store: String },

    #[error("Tracking store {store} failed")]
    Store {
        store: String,
        #[source]
        source: anyhow::Error,
    },
}

pub type BaselineResult<T> = Result<T, BaselineError>;
