use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::info;
use sqlx::{
    postgres::PgPoolOptions, query, query_as, query_scalar, Error as SqlxError, FromRow, PgPool,
};

use crate::{
    Database, DatabaseError, GuestArrival, GuestData, IntoDatabaseError, NewGuest, NewTable,
    Result, TableData, TableNumber,
};

/// A postgres database implementation for the guest list
pub struct PgDatabase {
    pool: PgPool,
}

#[derive(FromRow)]
struct TableRow {
    table_number: i32,
    seats: i32,
}

#[derive(FromRow)]
struct GuestRow {
    guest_name: String,
    table_number: i32,
    accompanying_guests: i32,
    arrived: bool,
    time_arrived: Option<DateTime<Utc>>,
}

impl From<TableRow> for TableData {
    fn from(row: TableRow) -> Self {
        Self {
            table_number: row.table_number,
            seats: row.seats,
        }
    }
}

impl From<GuestRow> for GuestData {
    fn from(row: GuestRow) -> Self {
        Self {
            name: row.guest_name,
            table: row.table_number,
            accompanying_guests: row.accompanying_guests,
            arrived: row.arrived,
            time_arrived: row.time_arrived,
        }
    }
}

const GUEST_COLUMNS: &str =
    "guest_name, table_number, accompanying_guests, arrived, time_arrived";

impl PgDatabase {
    pub async fn new(url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(|e| e.any())?;

        Ok(Self { pool })
    }

    /// Creates the venue and guestlist tables if they don't exist yet
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DatabaseError::Internal(Box::new(e)))?;

        info!("Database schema is up to date");
        Ok(())
    }

    /// Waits for in-flight queries and closes every connection in the pool
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn fetch_guests(&self, filter: &str) -> Result<Vec<GuestData>> {
        let sql = format!("SELECT {GUEST_COLUMNS} FROM guestlist {filter} ORDER BY id");

        let rows: Vec<GuestRow> = query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| e.any())?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl Database for PgDatabase {
    async fn create_table(&self, new_table: NewTable) -> Result<TableData> {
        let row: TableRow =
            query_as("INSERT INTO venue (seats) VALUES ($1) RETURNING table_number, seats")
                .bind(new_table.seats)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| e.any())?;

        Ok(row.into())
    }

    async fn table_by_number(&self, table_number: TableNumber) -> Result<TableData> {
        query_as::<_, TableRow>("SELECT table_number, seats FROM venue WHERE table_number = $1")
            .bind(table_number)
            .fetch_one(&self.pool)
            .await
            .map(Into::into)
            .map_err(|e| e.not_found_or("table", table_number))
    }

    async fn list_tables(&self) -> Result<Vec<TableData>> {
        let rows: Vec<TableRow> =
            query_as("SELECT table_number, seats FROM venue ORDER BY table_number")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| e.any())?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn total_seats(&self) -> Result<Option<i64>> {
        query_scalar("SELECT SUM(seats) FROM venue")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| e.any())
    }

    async fn claimed_seats(&self, table_number: TableNumber) -> Result<Option<i64>> {
        query_scalar("SELECT SUM(accompanying_guests + 1) FROM guestlist WHERE table_number = $1")
            .bind(table_number)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| e.any())
    }

    async fn total_claimed_seats(&self) -> Result<Option<i64>> {
        query_scalar("SELECT SUM(accompanying_guests + 1) FROM guestlist")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| e.any())
    }

    async fn claimed_seats_per_table(&self) -> Result<Vec<(TableNumber, i64)>> {
        query_as(
            "SELECT table_number, SUM(accompanying_guests + 1) FROM guestlist GROUP BY table_number",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| e.any())
    }

    async fn guest_by_name(&self, name: &str) -> Result<GuestData> {
        let sql = format!("SELECT {GUEST_COLUMNS} FROM guestlist WHERE guest_name = $1");

        query_as::<_, GuestRow>(&sql)
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map(Into::into)
            .map_err(|e| e.not_found_or("guest", name))
    }

    async fn list_guests(&self) -> Result<Vec<GuestData>> {
        self.fetch_guests("").await
    }

    async fn list_arrived_guests(&self) -> Result<Vec<GuestData>> {
        self.fetch_guests("WHERE arrived = TRUE").await
    }

    async fn create_guest(&self, new_guest: NewGuest) -> Result<()> {
        query(
            "INSERT INTO guestlist (guest_name, table_number, accompanying_guests, arrived)
            VALUES ($1, $2, $3, FALSE)",
        )
        .bind(&new_guest.name)
        .bind(new_guest.table)
        .bind(new_guest.accompanying_guests)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            SqlxError::Database(ref db) if db.is_unique_violation() => DatabaseError::Conflict {
                resource: "guest",
                field: "name",
                value: new_guest.name.clone(),
            },
            SqlxError::Database(ref db) if db.is_foreign_key_violation() => {
                DatabaseError::InvalidReference {
                    resource: "table",
                    field: "guest",
                    value: new_guest.table.to_string(),
                }
            }
            e => e.any(),
        })
        .map(|_| ())
    }

    async fn mark_arrived(&self, arrival: GuestArrival) -> Result<()> {
        // The first arrival time sticks, later arrivals only change the party size
        let result = query(
            "UPDATE guestlist SET
                accompanying_guests = COALESCE($2, accompanying_guests),
                arrived = TRUE,
                time_arrived = COALESCE(time_arrived, now())
            WHERE guest_name = $1",
        )
        .bind(&arrival.name)
        .bind(arrival.accompanying_guests)
        .execute(&self.pool)
        .await
        .map_err(|e| e.any())?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound {
                resource: "guest",
                identifier: arrival.name,
            });
        }

        Ok(())
    }

    async fn delete_guest(&self, name: &str) -> Result<u64> {
        query("DELETE FROM guestlist WHERE guest_name = $1")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| e.any())
            .map(|r| r.rows_affected())
    }
}

impl IntoDatabaseError for SqlxError {
    fn any(self) -> DatabaseError {
        DatabaseError::Internal(Box::new(self))
    }

    fn not_found_or(self, resource: &'static str, identifier: impl ToString) -> DatabaseError {
        match self {
            SqlxError::RowNotFound => DatabaseError::NotFound {
                resource,
                identifier: identifier.to_string(),
            },
            e => Self::any(e),
        }
    }
}
