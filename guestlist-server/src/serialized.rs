//! All schemas that are exposed from endpoints are defined here
//! along with the ToSerialized impls

use chrono::{DateTime, Utc};
use guestlist_ledger::{GuestData, TableData, TableOccupancy};
use serde::Serialize;
use utoipa::ToSchema;

/// A guest as shown on the guest list
#[derive(Debug, Serialize, ToSchema)]
pub struct Guest {
    name: String,
    table: i32,
    accompanying_guests: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GuestList {
    guests: Vec<Guest>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ArrivedGuest {
    name: String,
    table: i32,
    time_arrived: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ArrivedGuestList {
    guests: Vec<ArrivedGuest>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GuestDetails {
    name: String,
    table: i32,
    accompanying_guests: i32,
    arrived: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Table {
    table_number: i32,
    seats: i32,
    occupied_seats: i64,
    free_seats: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NewTable {
    table_number: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SeatsEmpty {
    seats_empty: i64,
}

impl SeatsEmpty {
    pub fn new(seats_empty: i64) -> Self {
        Self { seats_empty }
    }
}

/// The name of the guest a request was about
#[derive(Debug, Serialize, ToSchema)]
pub struct GuestName {
    name: String,
}

impl GuestName {
    pub fn new(name: String) -> Self {
        Self { name }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Outcome {
    result: String,
}

impl Outcome {
    pub fn success() -> Self {
        Self {
            result: "success".to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorMessage {
    pub error: String,
}

/// Helper trait to convert any type into a serialized version
pub trait ToSerialized<T>
where
    T: Serialize,
{
    fn to_serialized(&self) -> T;
}

impl<I, O> ToSerialized<Vec<O>> for Vec<I>
where
    I: ToSerialized<O>,
    O: Serialize,
{
    fn to_serialized(&self) -> Vec<O> {
        self.iter().map(|x| x.to_serialized()).collect()
    }
}

impl ToSerialized<Guest> for GuestData {
    fn to_serialized(&self) -> Guest {
        Guest {
            name: self.name.clone(),
            table: self.table,
            accompanying_guests: self.accompanying_guests,
        }
    }
}

impl ToSerialized<GuestList> for Vec<GuestData> {
    fn to_serialized(&self) -> GuestList {
        GuestList {
            guests: self.to_serialized(),
        }
    }
}

impl ToSerialized<ArrivedGuest> for GuestData {
    fn to_serialized(&self) -> ArrivedGuest {
        ArrivedGuest {
            name: self.name.clone(),
            table: self.table,
            time_arrived: self.time_arrived,
        }
    }
}

impl ToSerialized<ArrivedGuestList> for Vec<GuestData> {
    fn to_serialized(&self) -> ArrivedGuestList {
        ArrivedGuestList {
            guests: self.to_serialized(),
        }
    }
}

impl ToSerialized<GuestDetails> for GuestData {
    fn to_serialized(&self) -> GuestDetails {
        GuestDetails {
            name: self.name.clone(),
            table: self.table,
            accompanying_guests: self.accompanying_guests,
            arrived: self.arrived,
        }
    }
}

impl ToSerialized<Table> for TableOccupancy {
    fn to_serialized(&self) -> Table {
        Table {
            table_number: self.table_number,
            seats: self.seats,
            occupied_seats: self.occupied_seats,
            free_seats: self.free_seats,
        }
    }
}

impl ToSerialized<NewTable> for TableData {
    fn to_serialized(&self) -> NewTable {
        NewTable {
            table_number: self.table_number,
        }
    }
}
