use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
};
use guestlist_ledger::{
    Config, Database, DatabaseError, GuestArrival, GuestData, MemoryDatabase, NewGuest, NewTable,
    Seating, SharedDatabase, TableData, TableNumber,
};
use serde_json::Value;
use tower::ServiceExt;

use crate::{app, context::ServerContext};

/// The server backed by an in-memory database
pub struct TestApp {
    pub router: axum::Router,
    pub context: ServerContext,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_database(Arc::new(MemoryDatabase::new()))
    }

    /// The server backed by a database that is down
    pub fn failing() -> Self {
        Self::with_database(Arc::new(FailingDatabase))
    }

    fn with_database(database: SharedDatabase) -> Self {
        let context = ServerContext::new(Seating::new(database, Config::default()));

        Self {
            router: app(context.clone()),
            context,
        }
    }

    pub async fn with_tables(seats: &[i32]) -> Self {
        let app = Self::new();

        for seats in seats {
            app.context.seating.venue.add_table(*seats).await.unwrap();
        }

        app
    }

    /// Registers `TestGuest1` to `TestGuestN`, spread over three tables
    pub async fn add_guests(&self, count: i32) {
        for i in 1..=count {
            self.context
                .seating
                .guests
                .register(NewGuest {
                    name: format!("TestGuest{i}"),
                    table: i % 3 + 1,
                    accompanying_guests: i * 4 % 12,
                })
                .await
                .unwrap();
        }
    }
}

/// Every call fails as if the connection was lost
struct FailingDatabase;

type DbResult<T> = Result<T, DatabaseError>;

fn connection_lost<T>() -> DbResult<T> {
    Err(DatabaseError::Internal("connection lost".into()))
}

#[async_trait]
impl Database for FailingDatabase {
    async fn create_table(&self, _: NewTable) -> DbResult<TableData> {
        connection_lost()
    }

    async fn table_by_number(&self, _: TableNumber) -> DbResult<TableData> {
        connection_lost()
    }

    async fn list_tables(&self) -> DbResult<Vec<TableData>> {
        connection_lost()
    }

    async fn total_seats(&self) -> DbResult<Option<i64>> {
        connection_lost()
    }

    async fn claimed_seats(&self, _: TableNumber) -> DbResult<Option<i64>> {
        connection_lost()
    }

    async fn total_claimed_seats(&self) -> DbResult<Option<i64>> {
        connection_lost()
    }

    async fn claimed_seats_per_table(&self) -> DbResult<Vec<(TableNumber, i64)>> {
        connection_lost()
    }

    async fn guest_by_name(&self, _: &str) -> DbResult<GuestData> {
        connection_lost()
    }

    async fn list_guests(&self) -> DbResult<Vec<GuestData>> {
        connection_lost()
    }

    async fn list_arrived_guests(&self) -> DbResult<Vec<GuestData>> {
        connection_lost()
    }

    async fn create_guest(&self, _: NewGuest) -> DbResult<()> {
        connection_lost()
    }

    async fn mark_arrived(&self, _: GuestArrival) -> DbResult<()> {
        connection_lost()
    }

    async fn delete_guest(&self, _: &str) -> DbResult<u64> {
        connection_lost()
    }
}

impl std::ops::Deref for TestApp {
    type Target = ServerContext;

    fn deref(&self) -> &Self::Target {
        &self.context
    }
}

/// Sends a request and returns the status with the parsed JSON body
pub async fn send(
    app: &TestApp,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);

    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, body)
}
