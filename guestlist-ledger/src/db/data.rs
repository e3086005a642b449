use chrono::{DateTime, Utc};

/// The identifier the store assigns to a table in the venue.
pub type TableNumber = i32;

/// A table in the venue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableData {
    pub table_number: TableNumber,
    /// How many people can sit at this table
    pub seats: i32,
}

/// A guest on the guest list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestData {
    /// Unique name of the guest
    pub name: String,
    /// The table the guest and their party are seated at
    pub table: TableNumber,
    /// Size of the party, not counting the guest themselves
    pub accompanying_guests: i32,
    pub arrived: bool,
    /// Set the first time the guest arrives
    pub time_arrived: Option<DateTime<Utc>>,
}

impl GuestData {
    /// How many seats the guest and their party take up
    pub fn claimed_seats(&self) -> i64 {
        i64::from(self.accompanying_guests) + 1
    }
}
