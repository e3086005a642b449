use std::sync::Arc;

use log::info;

use crate::{Database, NewTable, SeatingError, SeatingResult, TableData, TableNumber};

/// The tables of the venue and how full they are
pub struct Venue<Db: ?Sized> {
    db: Arc<Db>,
}

/// A table along with its current occupancy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOccupancy {
    pub table_number: TableNumber,
    pub seats: i32,
    pub occupied_seats: i64,
    pub free_seats: i64,
}

impl TableOccupancy {
    fn new(table: TableData, occupied_seats: i64) -> Self {
        Self {
            table_number: table.table_number,
            seats: table.seats,
            occupied_seats,
            free_seats: i64::from(table.seats) - occupied_seats,
        }
    }
}

impl<Db> Venue<Db>
where
    Db: Database + ?Sized,
{
    pub fn new(db: &Arc<Db>) -> Self {
        Self { db: db.clone() }
    }

    /// Adds a table to the venue. Any capacity is accepted.
    pub async fn add_table(&self, seats: i32) -> SeatingResult<TableData> {
        if seats < 0 {
            return Err(SeatingError::Validation(format!(
                "A table cannot have {seats} seats"
            )));
        }

        let table = self.db.create_table(NewTable { seats }).await?;
        info!("Added table {} with {} seats", table.table_number, seats);

        Ok(table)
    }

    /// Returns how many seats the guests at a table and their parties take up.
    ///
    /// A table nobody is seated at has no rows to sum, which counts as zero
    /// occupancy rather than an error.
    pub async fn occupied_seats(&self, table_number: TableNumber) -> SeatingResult<i64> {
        let claimed = self.db.claimed_seats(table_number).await?;

        Ok(claimed.unwrap_or(0))
    }

    /// Returns how many seats are left at a table
    pub async fn free_seats(&self, table_number: TableNumber) -> SeatingResult<i64> {
        Ok(self.table(table_number).await?.free_seats)
    }

    /// Returns how many seats are left in the whole venue.
    ///
    /// This is two aggregates over the store rather than a sum of
    /// [`Venue::free_seats`] for every table.
    pub async fn free_seats_total(&self) -> SeatingResult<i64> {
        let seats = self.db.total_seats().await?.unwrap_or(0);
        let claimed = self.db.total_claimed_seats().await?.unwrap_or(0);

        Ok(seats - claimed)
    }

    /// Returns a table and its occupancy
    pub async fn table(&self, table_number: TableNumber) -> SeatingResult<TableOccupancy> {
        let table = self.db.table_by_number(table_number).await?;
        let occupied = self.occupied_seats(table_number).await?;

        Ok(TableOccupancy::new(table, occupied))
    }

    /// Returns every table and its occupancy
    pub async fn tables(&self) -> SeatingResult<Vec<TableOccupancy>> {
        let tables = self.db.list_tables().await?;
        let claimed = self.db.claimed_seats_per_table().await?;

        let occupancy = tables
            .into_iter()
            .map(|table| {
                let occupied = claimed
                    .iter()
                    .find_map(|(n, seats)| (*n == table.table_number).then_some(*seats))
                    .unwrap_or_default();

                TableOccupancy::new(table, occupied)
            })
            .collect();

        Ok(occupancy)
    }
}

impl<Db: ?Sized> Clone for Venue<Db> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{MemoryDatabase, NewGuest};

    fn venue() -> (Arc<MemoryDatabase>, Venue<MemoryDatabase>) {
        let db = Arc::new(MemoryDatabase::new());
        let venue = Venue::new(&db);

        (db, venue)
    }

    async fn seat(db: &MemoryDatabase, name: &str, table: TableNumber, accompanying_guests: i32) {
        db.create_guest(NewGuest {
            name: name.to_string(),
            table,
            accompanying_guests,
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn empty_venue_has_no_free_seats() {
        let (_, venue) = venue();

        assert_eq!(venue.free_seats_total().await.unwrap(), 0);
        assert!(venue.tables().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn free_seats_total_follows_tables_and_guests() {
        let (db, venue) = venue();

        for _ in 0..3 {
            venue.add_table(12).await.unwrap();
        }
        assert_eq!(venue.free_seats_total().await.unwrap(), 36);

        seat(&db, "ada", 1, 3).await;
        assert_eq!(venue.free_seats_total().await.unwrap(), 32);
    }

    #[tokio::test]
    async fn table_without_guests_is_empty_not_missing() {
        let (_, venue) = venue();
        let table = venue.add_table(6).await.unwrap();

        assert_eq!(venue.occupied_seats(table.table_number).await.unwrap(), 0);
        assert_eq!(venue.free_seats(table.table_number).await.unwrap(), 6);
    }

    #[tokio::test]
    async fn missing_table_is_not_found() {
        let (_, venue) = venue();

        assert!(matches!(
            venue.free_seats(7).await,
            Err(SeatingError::NotFound {
                resource: "table",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn negative_capacity_is_rejected() {
        let (_, venue) = venue();

        assert!(matches!(
            venue.add_table(-1).await,
            Err(SeatingError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn tables_report_their_occupancy() {
        let (db, venue) = venue();

        venue.add_table(4).await.unwrap();
        venue.add_table(10).await.unwrap();
        seat(&db, "ada", 2, 2).await;
        seat(&db, "grace", 2, 0).await;

        assert_eq!(
            venue.tables().await.unwrap(),
            vec![
                TableOccupancy {
                    table_number: 1,
                    seats: 4,
                    occupied_seats: 0,
                    free_seats: 4,
                },
                TableOccupancy {
                    table_number: 2,
                    seats: 10,
                    occupied_seats: 4,
                    free_seats: 6,
                },
            ]
        );
    }
}
