/// How many seats a table gets when none are specified
pub const DEFAULT_TABLE_SEATS: i32 = 4;

/// The configuration of the seating system
#[derive(Debug, Clone)]
pub struct Config {
    /// Serializes capacity checks at the same table within this process.
    /// Without it, two registrations that each fit on their own can
    /// together overflow a table.
    pub table_locks: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self { table_locks: true }
    }
}
