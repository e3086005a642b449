use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json,
};

use crate::{
    context::ServerContext,
    errors::ServerResult,
    schemas::{NewTableSchema, PathParam, ValidatedJson},
    serialized::{ErrorMessage, NewTable, SeatsEmpty, Table, ToSerialized},
    Router,
};

#[utoipa::path(
    post,
    path = "/venue",
    tag = "venue",
    request_body = NewTableSchema,
    responses(
        (status = 201, body = NewTable),
        (status = 400, body = ErrorMessage)
    )
)]
pub async fn add_table(
    State(context): State<ServerContext>,
    ValidatedJson(body): ValidatedJson<NewTableSchema>,
) -> ServerResult<(StatusCode, Json<NewTable>)> {
    let table = context.seating.venue.add_table(body.seats).await?;

    Ok((StatusCode::CREATED, Json(table.to_serialized())))
}

#[utoipa::path(
    get,
    path = "/venue",
    tag = "venue",
    responses(
        (status = 200, body = Vec<Table>)
    )
)]
pub async fn tables(State(context): State<ServerContext>) -> ServerResult<Json<Vec<Table>>> {
    let tables = context.seating.venue.tables().await?;

    Ok(Json(tables.to_serialized()))
}

#[utoipa::path(
    get,
    path = "/venue/{table_number}",
    tag = "venue",
    params(("table_number" = i32, Path, description = "Number of the table")),
    responses(
        (status = 200, body = Table),
        (status = 400, body = ErrorMessage, description = "The table number is not a number"),
        (status = 404, body = ErrorMessage)
    )
)]
pub async fn table(
    State(context): State<ServerContext>,
    PathParam(table_number): PathParam<i32>,
) -> ServerResult<Json<Table>> {
    let table = context.seating.venue.table(table_number).await?;

    Ok(Json(table.to_serialized()))
}

#[utoipa::path(
    get,
    path = "/seats_empty",
    tag = "venue",
    responses(
        (status = 200, body = SeatsEmpty, description = "Free seats across every table")
    )
)]
pub async fn seats_empty(State(context): State<ServerContext>) -> ServerResult<Json<SeatsEmpty>> {
    let free = context.seating.venue.free_seats_total().await?;

    Ok(Json(SeatsEmpty::new(free)))
}

pub fn router() -> Router {
    Router::new()
        .route("/venue", get(tables).post(add_table))
        .route("/venue/:table_number", get(table))
        .route("/seats_empty", get(seats_empty))
}
