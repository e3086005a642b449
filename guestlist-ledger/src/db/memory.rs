use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use crate::{
    Database, DatabaseError, GuestArrival, GuestData, NewGuest, NewTable, Result, TableData,
    TableNumber,
};

/// An in-memory database, mirroring what the postgres schema enforces.
///
/// Rows are kept in insertion order, names are unique, guests must point at an
/// existing table, and sums over no rows come back as `None`, like SQL `SUM`.
#[derive(Default)]
pub struct MemoryDatabase {
    state: RwLock<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    last_table_number: TableNumber,
    tables: Vec<TableData>,
    guests: Vec<GuestData>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoryState {
    fn guest_mut(&mut self, name: &str) -> Option<&mut GuestData> {
        self.guests.iter_mut().find(|g| g.name == name)
    }

    fn sum_claimed<'a>(guests: impl Iterator<Item = &'a GuestData>) -> Option<i64> {
        guests
            .map(GuestData::claimed_seats)
            .fold(None, |sum, seats| Some(sum.unwrap_or(0) + seats))
    }
}

fn guest_not_found(name: &str) -> DatabaseError {
    DatabaseError::NotFound {
        resource: "guest",
        identifier: name.to_string(),
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    async fn create_table(&self, new_table: NewTable) -> Result<TableData> {
        let mut state = self.state.write();

        state.last_table_number += 1;
        let table = TableData {
            table_number: state.last_table_number,
            seats: new_table.seats,
        };

        state.tables.push(table.clone());
        Ok(table)
    }

    async fn table_by_number(&self, table_number: TableNumber) -> Result<TableData> {
        self.state
            .read()
            .tables
            .iter()
            .find(|t| t.table_number == table_number)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound {
                resource: "table",
                identifier: table_number.to_string(),
            })
    }

    async fn list_tables(&self) -> Result<Vec<TableData>> {
        Ok(self.state.read().tables.clone())
    }

    async fn total_seats(&self) -> Result<Option<i64>> {
        let state = self.state.read();

        Ok(state
            .tables
            .iter()
            .map(|t| i64::from(t.seats))
            .reduce(|a, b| a + b))
    }

    async fn claimed_seats(&self, table_number: TableNumber) -> Result<Option<i64>> {
        let state = self.state.read();
        let at_table = state.guests.iter().filter(|g| g.table == table_number);

        Ok(MemoryState::sum_claimed(at_table))
    }

    async fn total_claimed_seats(&self) -> Result<Option<i64>> {
        Ok(MemoryState::sum_claimed(self.state.read().guests.iter()))
    }

    async fn claimed_seats_per_table(&self) -> Result<Vec<(TableNumber, i64)>> {
        let state = self.state.read();
        let mut claimed: Vec<(TableNumber, i64)> = vec![];

        for guest in &state.guests {
            match claimed.iter_mut().find(|(t, _)| *t == guest.table) {
                Some((_, seats)) => *seats += guest.claimed_seats(),
                None => claimed.push((guest.table, guest.claimed_seats())),
            }
        }

        Ok(claimed)
    }

    async fn guest_by_name(&self, name: &str) -> Result<GuestData> {
        self.state
            .read()
            .guests
            .iter()
            .find(|g| g.name == name)
            .cloned()
            .ok_or_else(|| guest_not_found(name))
    }

    async fn list_guests(&self) -> Result<Vec<GuestData>> {
        Ok(self.state.read().guests.clone())
    }

    async fn list_arrived_guests(&self) -> Result<Vec<GuestData>> {
        let state = self.state.read();

        Ok(state.guests.iter().filter(|g| g.arrived).cloned().collect())
    }

    async fn create_guest(&self, new_guest: NewGuest) -> Result<()> {
        let mut state = self.state.write();

        if state.guests.iter().any(|g| g.name == new_guest.name) {
            return Err(DatabaseError::Conflict {
                resource: "guest",
                field: "name",
                value: new_guest.name,
            });
        }

        if !state
            .tables
            .iter()
            .any(|t| t.table_number == new_guest.table)
        {
            return Err(DatabaseError::InvalidReference {
                resource: "table",
                field: "guest",
                value: new_guest.table.to_string(),
            });
        }

        state.guests.push(GuestData {
            name: new_guest.name,
            table: new_guest.table,
            accompanying_guests: new_guest.accompanying_guests,
            arrived: false,
            time_arrived: None,
        });

        Ok(())
    }

    async fn mark_arrived(&self, arrival: GuestArrival) -> Result<()> {
        let mut state = self.state.write();
        let guest = state
            .guest_mut(&arrival.name)
            .ok_or_else(|| guest_not_found(&arrival.name))?;

        if let Some(accompanying_guests) = arrival.accompanying_guests {
            guest.accompanying_guests = accompanying_guests;
        }

        guest.arrived = true;
        guest.time_arrived.get_or_insert_with(Utc::now);

        Ok(())
    }

    async fn delete_guest(&self, name: &str) -> Result<u64> {
        let mut state = self.state.write();
        let before = state.guests.len();

        state.guests.retain(|g| g.name != name);
        Ok((before - state.guests.len()) as u64)
    }
}
