mod config;
mod db;
mod error;
mod guests;
mod locks;
mod venue;

use std::sync::Arc;

pub use config::*;
pub use db::*;
pub use error::*;
pub use guests::*;
pub use venue::*;

/// The seating system, tracking the tables of the venue and who sits at them.
pub struct Seating<Db: ?Sized> {
    pub venue: Venue<Db>,
    pub guests: Ledger<Db>,
}

impl<Db> Seating<Db>
where
    Db: Database + ?Sized,
{
    pub fn new(database: Arc<Db>, config: Config) -> Self {
        Self {
            venue: Venue::new(&database),
            guests: Ledger::new(&database, &config),
        }
    }
}
