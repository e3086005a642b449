use thiserror::Error;

use crate::{DatabaseError, TableNumber};

pub type SeatingResult<T> = std::result::Result<T, SeatingError>;

#[derive(Debug, Error)]
pub enum SeatingError {
    /// The input is malformed or points at something that doesn't exist
    #[error("{0}")]
    Validation(String),
    /// Seating the party would put the table over capacity
    #[error("Table {table} has {free} free seats but {needed} are needed")]
    InsufficientCapacity {
        table: TableNumber,
        needed: i64,
        free: i64,
    },
    /// A resource already exists
    #[error("{resource} with {field} of value {value} already exists")]
    Conflict {
        resource: &'static str,
        field: &'static str,
        value: String,
    },
    #[error("{resource}:{identifier} doesn't exist")]
    NotFound {
        resource: &'static str,
        identifier: String,
    },
    /// The store failed for any other reason
    #[error(transparent)]
    Storage(DatabaseError),
}

impl From<DatabaseError> for SeatingError {
    fn from(value: DatabaseError) -> Self {
        match value {
            DatabaseError::NotFound {
                resource,
                identifier,
            } => Self::NotFound {
                resource,
                identifier,
            },
            DatabaseError::Conflict {
                resource,
                field,
                value,
            } => Self::Conflict {
                resource,
                field,
                value,
            },
            e @ DatabaseError::InvalidReference { .. } => Self::Validation(e.to_string()),
            e => Self::Storage(e),
        }
    }
}
