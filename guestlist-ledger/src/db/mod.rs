use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

mod data;
pub use data::*;

mod memory;
pub use memory::*;

mod pg;
pub use pg::*;

pub type Result<T> = std::result::Result<T, DatabaseError>;
pub type SharedDatabase = Arc<dyn Database>;

#[derive(Debug, Error)]
pub enum DatabaseError {
    /// An unknown or internal error happened with the database
    #[error(transparent)]
    Internal(Box<dyn std::error::Error + Send + Sync>),
    /// A resource already exists
    #[error("{resource} with {field} of value {value} already exists")]
    Conflict {
        /// The resource in question
        resource: &'static str,
        /// The field that is conflicting
        field: &'static str,
        /// The conflicting value
        value: String,
    },
    /// A resource in the database doesn't exist
    #[error("{resource}:{identifier} doesn't exist")]
    NotFound {
        resource: &'static str,
        identifier: String,
    },
    /// A row points at a resource that doesn't exist
    #[error("{resource} {value} referenced by {field} doesn't exist")]
    InvalidReference {
        resource: &'static str,
        field: &'static str,
        value: String,
    },
}

/// Helper trait to reduce boilerplate
pub trait IntoDatabaseError {
    fn not_found_or(self, resource: &'static str, identifier: impl ToString) -> DatabaseError;
    fn any(self) -> DatabaseError;
}

/// Represents a type that can read and write seating data.
///
/// Every method is a single round-trip to the store. Nothing here enforces
/// seat capacity, that is up to the caller.
#[async_trait]
pub trait Database: Send + Sync {
    async fn create_table(&self, new_table: NewTable) -> Result<TableData>;
    async fn table_by_number(&self, table_number: TableNumber) -> Result<TableData>;
    async fn list_tables(&self) -> Result<Vec<TableData>>;
    /// Sum of seats over all tables, `None` when the venue has no tables
    async fn total_seats(&self) -> Result<Option<i64>>;

    /// Seats claimed at a table, `None` when nobody is seated there
    async fn claimed_seats(&self, table_number: TableNumber) -> Result<Option<i64>>;
    /// Seats claimed across the venue, `None` when the guest list is empty
    async fn total_claimed_seats(&self) -> Result<Option<i64>>;
    /// Seats claimed per table, only tables with at least one guest are listed
    async fn claimed_seats_per_table(&self) -> Result<Vec<(TableNumber, i64)>>;

    async fn guest_by_name(&self, name: &str) -> Result<GuestData>;
    async fn list_guests(&self) -> Result<Vec<GuestData>>;
    async fn list_arrived_guests(&self) -> Result<Vec<GuestData>>;
    async fn create_guest(&self, new_guest: NewGuest) -> Result<()>;
    async fn mark_arrived(&self, arrival: GuestArrival) -> Result<()>;
    /// Returns how many rows were deleted
    async fn delete_guest(&self, name: &str) -> Result<u64>;
}

#[derive(Debug)]
pub struct NewTable {
    pub seats: i32,
}

#[derive(Debug)]
pub struct NewGuest {
    pub name: String,
    pub table: TableNumber,
    pub accompanying_guests: i32,
}

#[derive(Debug)]
pub struct GuestArrival {
    pub name: String,
    /// The new party size, if it changed since registration
    pub accompanying_guests: Option<i32>,
}
