use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::OwnedMutexGuard;

use crate::{
    locks::TableLocks, Config, Database, DatabaseError, GuestArrival, GuestData, NewGuest,
    SeatingError, SeatingResult, TableNumber, Venue,
};

/// The longest name the guestlist table can store
pub const MAX_NAME_LENGTH: usize = 64;

/// The guest list, keeping every table within its capacity.
///
/// Capacity is never cached. Registering a guest or changing the size of a
/// party reads the current occupancy of the table and only then writes. Unless
/// table locks are enabled, concurrent writes to the same table can race between
/// the read and the write.
pub struct Ledger<Db: ?Sized> {
    db: Arc<Db>,
    venue: Venue<Db>,
    locks: Option<TableLocks>,
}

impl<Db> Ledger<Db>
where
    Db: Database + ?Sized,
{
    pub fn new(db: &Arc<Db>, config: &Config) -> Self {
        Self {
            db: db.clone(),
            venue: Venue::new(db),
            locks: config.table_locks.then(TableLocks::default),
        }
    }

    /// Adds a guest and their party to a table, if it has room for all of them
    pub async fn register(&self, new_guest: NewGuest) -> SeatingResult<()> {
        validate_name(&new_guest.name)?;
        validate_party_size(new_guest.accompanying_guests)?;

        let table = new_guest.table;

        // Tables are only locked once they are known to exist
        self.db.table_by_number(table).await.map_err(|e| match e {
            DatabaseError::NotFound { .. } => {
                SeatingError::Validation(format!("Table {table} does not exist"))
            }
            e => e.into(),
        })?;

        let _guard = self.lock(table).await;
        let free = self.venue.free_seats(table).await?;

        let needed = i64::from(new_guest.accompanying_guests) + 1;

        if free - needed < 0 {
            warn!(
                "Refused {}, table {} has {} free seats but {} are needed",
                new_guest.name, table, free, needed
            );
            return Err(SeatingError::InsufficientCapacity {
                table,
                needed,
                free,
            });
        }

        let name = new_guest.name.clone();
        self.db.create_guest(new_guest).await?;

        info!("Registered {name} at table {table} taking {needed} seats");
        Ok(())
    }

    /// Marks a guest as arrived, possibly with a different party than registered.
    ///
    /// An unchanged party takes up no extra seats, so it is let in without a
    /// capacity check even if the table is full.
    pub async fn record_arrival(&self, name: &str, accompanying_guests: i32) -> SeatingResult<()> {
        validate_party_size(accompanying_guests)?;

        let (registered, _guard) = self.lock_guest(name).await?;
        let previous = registered.accompanying_guests;

        if previous == accompanying_guests {
            self.db
                .mark_arrived(GuestArrival {
                    name: name.to_string(),
                    accompanying_guests: None,
                })
                .await?;

            info!("{name} arrived at table {}", registered.table);
            return Ok(());
        }

        let free = self.venue.free_seats(registered.table).await?;
        let adjusted_free = free + i64::from(previous) - i64::from(accompanying_guests);

        if adjusted_free < 0 {
            let needed = i64::from(accompanying_guests - previous);

            warn!(
                "Refused the party of {} at table {}, {} more seats are needed but {} are free",
                name, registered.table, needed, free
            );
            return Err(SeatingError::InsufficientCapacity {
                table: registered.table,
                needed,
                free,
            });
        }

        self.db
            .mark_arrived(GuestArrival {
                name: name.to_string(),
                accompanying_guests: Some(accompanying_guests),
            })
            .await?;

        info!(
            "{name} arrived at table {} with {accompanying_guests} accompanying guests instead of {previous}",
            registered.table
        );
        Ok(())
    }

    /// Removes a guest and with them their whole party.
    /// Removing a guest that isn't on the list does nothing.
    pub async fn remove(&self, name: &str) -> SeatingResult<()> {
        let deleted = self.db.delete_guest(name).await?;

        if deleted == 0 {
            debug!("{name} left but was not on the guest list");
        } else {
            info!("{name} left with their party");
        }

        Ok(())
    }

    /// Returns every guest, arrived or not
    pub async fn list_all(&self) -> SeatingResult<Vec<GuestData>> {
        Ok(self.db.list_guests().await?)
    }

    /// Returns the guests that have arrived
    pub async fn list_arrived(&self) -> SeatingResult<Vec<GuestData>> {
        Ok(self.db.list_arrived_guests().await?)
    }

    pub async fn get(&self, name: &str) -> SeatingResult<GuestData> {
        Ok(self.db.guest_by_name(name).await?)
    }

    /// Looks up a guest and locks their table.
    ///
    /// The guest is read again once the lock is held, since they may have left
    /// or changed their party while we waited. If they were registered again at
    /// another table, that table is locked instead.
    async fn lock_guest(
        &self,
        name: &str,
    ) -> SeatingResult<(GuestData, Option<OwnedMutexGuard<()>>)> {
        let mut registered = self.db.guest_by_name(name).await?;

        loop {
            let guard = self.lock(registered.table).await;

            if guard.is_none() {
                return Ok((registered, None));
            }

            let current = self.db.guest_by_name(name).await?;

            if current.table == registered.table {
                return Ok((current, guard));
            }

            debug!(
                "{name} moved from table {} to table {} while waiting",
                registered.table, current.table
            );
            registered = current;
        }
    }

    async fn lock(&self, table: TableNumber) -> Option<OwnedMutexGuard<()>> {
        match &self.locks {
            Some(locks) => Some(locks.acquire(table).await),
            None => None,
        }
    }
}

fn validate_name(name: &str) -> SeatingResult<()> {
    if name.trim().is_empty() {
        return Err(SeatingError::Validation("Guest name cannot be empty".into()));
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(SeatingError::Validation(format!(
            "Guest name cannot be longer than {MAX_NAME_LENGTH} characters"
        )));
    }

    Ok(())
}

fn validate_party_size(accompanying_guests: i32) -> SeatingResult<()> {
    if accompanying_guests < 0 {
        return Err(SeatingError::Validation(format!(
            "A party cannot have {accompanying_guests} accompanying guests"
        )));
    }

    Ok(())
}
