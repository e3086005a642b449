use axum::{response::IntoResponse, Json};
use utoipa::OpenApi;

use crate::{guests, schemas, serialized, venue};

#[derive(OpenApi)]
#[openapi(
    paths(
        guests::add_guest,
        guests::guest_list,
        guests::guest_arrives,
        guests::guest_leaves,
        guests::arrived_guests,
        guests::guest,
        venue::add_table,
        venue::tables,
        venue::table,
        venue::seats_empty,
    ),
    components(schemas(
        schemas::NewGuestSchema,
        schemas::ArrivalSchema,
        schemas::NewTableSchema,
        serialized::Guest,
        serialized::GuestList,
        serialized::ArrivedGuest,
        serialized::ArrivedGuestList,
        serialized::GuestDetails,
        serialized::Table,
        serialized::NewTable,
        serialized::SeatsEmpty,
        serialized::GuestName,
        serialized::Outcome,
        serialized::ErrorMessage,
    )),
    tags(
        (name = "guests", description = "Registering guests and tracking their arrival"),
        (name = "venue", description = "Tables and how many seats are left"),
    ),
    info(description = "guestlist-server keeps track of who sits where at the party")
)]
pub struct ApiDoc;

pub async fn docs() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
