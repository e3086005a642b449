use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json,
};
use guestlist_ledger::NewGuest;

use crate::{
    context::ServerContext,
    errors::ServerResult,
    schemas::{ArrivalSchema, NewGuestSchema, PathParam, ValidatedJson},
    serialized::{
        ArrivedGuestList, ErrorMessage, GuestDetails, GuestList, GuestName, Outcome, ToSerialized,
    },
    Router,
};

#[utoipa::path(
    post,
    path = "/guest_list/{name}",
    tag = "guests",
    request_body = NewGuestSchema,
    params(("name" = String, Path, description = "Name of the guest")),
    responses(
        (status = 201, body = GuestName),
        (status = 400, body = ErrorMessage, description = "The table does not exist or the body is invalid"),
        (status = 409, body = ErrorMessage, description = "The table is full or the guest is already registered")
    )
)]
pub async fn add_guest(
    State(context): State<ServerContext>,
    PathParam(name): PathParam<String>,
    ValidatedJson(body): ValidatedJson<NewGuestSchema>,
) -> ServerResult<(StatusCode, Json<GuestName>)> {
    context
        .seating
        .guests
        .register(NewGuest {
            name: name.clone(),
            table: body.table,
            accompanying_guests: body.accompanying_guests,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(GuestName::new(name))))
}

#[utoipa::path(
    get,
    path = "/guest_list",
    tag = "guests",
    responses(
        (status = 200, body = GuestList)
    )
)]
pub async fn guest_list(State(context): State<ServerContext>) -> ServerResult<Json<GuestList>> {
    let guests = context.seating.guests.list_all().await?;

    Ok(Json(guests.to_serialized()))
}

#[utoipa::path(
    put,
    path = "/guests/{name}",
    tag = "guests",
    request_body = ArrivalSchema,
    params(("name" = String, Path, description = "Name of the guest")),
    responses(
        (status = 200, body = GuestName),
        (status = 404, body = ErrorMessage, description = "The guest is not on the guest list"),
        (status = 409, body = ErrorMessage, description = "The table has no room for the larger party")
    )
)]
pub async fn guest_arrives(
    State(context): State<ServerContext>,
    PathParam(name): PathParam<String>,
    ValidatedJson(body): ValidatedJson<ArrivalSchema>,
) -> ServerResult<Json<GuestName>> {
    context
        .seating
        .guests
        .record_arrival(&name, body.accompanying_guests)
        .await?;

    Ok(Json(GuestName::new(name)))
}

#[utoipa::path(
    delete,
    path = "/guests/{name}",
    tag = "guests",
    params(("name" = String, Path, description = "Name of the guest")),
    responses(
        (status = 200, body = Outcome, description = "The guest and their party left, or were never there")
    )
)]
pub async fn guest_leaves(
    State(context): State<ServerContext>,
    PathParam(name): PathParam<String>,
) -> ServerResult<Json<Outcome>> {
    context.seating.guests.remove(&name).await?;

    Ok(Json(Outcome::success()))
}

#[utoipa::path(
    get,
    path = "/guests",
    tag = "guests",
    responses(
        (status = 200, body = ArrivedGuestList)
    )
)]
pub async fn arrived_guests(
    State(context): State<ServerContext>,
) -> ServerResult<Json<ArrivedGuestList>> {
    let guests = context.seating.guests.list_arrived().await?;

    Ok(Json(guests.to_serialized()))
}

#[utoipa::path(
    get,
    path = "/guests/{name}",
    tag = "guests",
    params(("name" = String, Path, description = "Name of the guest")),
    responses(
        (status = 200, body = GuestDetails),
        (status = 404, body = ErrorMessage)
    )
)]
pub async fn guest(
    State(context): State<ServerContext>,
    PathParam(name): PathParam<String>,
) -> ServerResult<Json<GuestDetails>> {
    let guest = context.seating.guests.get(&name).await?;

    Ok(Json(guest.to_serialized()))
}

pub fn router() -> Router {
    Router::new()
        .route("/guest_list", get(guest_list))
        .route("/guest_list/:name", post(add_guest))
        .route("/guests", get(arrived_guests))
        .route(
            "/guests/:name",
            get(guest).put(guest_arrives).delete(guest_leaves),
        )
}

#[cfg(test)]
mod test {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::test_util::{send, TestApp};

    #[tokio::test]
    async fn empty_guest_list() {
        let app = TestApp::new();

        let (status, body) = send(&app, "GET", "/guest_list", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "guests": [] }));
    }

    #[tokio::test]
    async fn add_guest() {
        let app = TestApp::with_tables(&[12, 12, 12]).await;

        let (status, body) = send(
            &app,
            "POST",
            "/guest_list/TestGuest1",
            Some(json!({ "table": 1, "accompanying_guests": 2 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, json!({ "name": "TestGuest1" }));

        // 9 free seats left, 13 needed
        let (status, body) = send(
            &app,
            "POST",
            "/guest_list/TestGuest2",
            Some(json!({ "table": 1, "accompanying_guests": 12 })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["error"].is_string(), "conflicts carry an error message");
    }

    #[tokio::test]
    async fn add_guest_rejects_bad_input() {
        let app = TestApp::with_tables(&[4]).await;

        for body in [
            json!({ "table": 1, "accompanying_guests": -1 }),
            json!({ "table": 1 }),
            json!({ "table": 9, "accompanying_guests": 0 }),
            json!({ "table": 1, "accompanying_guests": 0, "vip": true }),
        ] {
            let (status, _) = send(&app, "POST", "/guest_list/TestGuest1", Some(body.clone())).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{body} should be rejected");
        }
    }

    #[tokio::test]
    async fn duplicate_guest_conflicts() {
        let app = TestApp::with_tables(&[12, 12, 12]).await;
        app.add_guests(1).await;

        let (status, _) = send(
            &app,
            "POST",
            "/guest_list/TestGuest1",
            Some(json!({ "table": 1, "accompanying_guests": 0 })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn store_failures_are_internal_errors() {
        let app = TestApp::failing();
        let body = json!({ "table": 1, "accompanying_guests": 0 });

        for (method, uri, body) in [
            ("GET", "/guest_list", None),
            ("POST", "/guest_list/TestGuest1", Some(body.clone())),
            ("PUT", "/guests/TestGuest1", Some(json!({ "accompanying_guests": 0 }))),
            ("DELETE", "/guests/TestGuest1", None),
            ("GET", "/guests", None),
        ] {
            let (status, body) = send(&app, method, uri, body).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{method} {uri}");
            assert!(body["error"].is_string());
        }
    }

    #[tokio::test]
    async fn guest_list() {
        let app = TestApp::with_tables(&[12, 12, 12]).await;
        app.add_guests(3).await;

        let (status, body) = send(&app, "GET", "/guest_list", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "guests": [
                { "name": "TestGuest1", "table": 2, "accompanying_guests": 4 },
                { "name": "TestGuest2", "table": 3, "accompanying_guests": 8 },
                { "name": "TestGuest3", "table": 1, "accompanying_guests": 0 },
            ]})
        );
    }

    #[tokio::test]
    async fn guest_arrives() {
        let app = TestApp::with_tables(&[12, 12, 12]).await;
        app.add_guests(3).await;

        let (status, body) = send(
            &app,
            "PUT",
            "/guests/TestGuest1",
            Some(json!({ "accompanying_guests": 6 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "name": "TestGuest1" }));

        // TestGuest2 holds 9 of 12 seats, a party of 12 cannot fit
        let (status, _) = send(
            &app,
            "PUT",
            "/guests/TestGuest2",
            Some(json!({ "accompanying_guests": 12 })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = send(
            &app,
            "PUT",
            "/guests/TestGuest3",
            Some(json!({ "accompanying_guests": 0 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "name": "TestGuest3" }));

        let (status, _) = send(
            &app,
            "PUT",
            "/guests/Nobody",
            Some(json!({ "accompanying_guests": 0 })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn get_guest() {
        let app = TestApp::with_tables(&[12, 12, 12]).await;
        app.add_guests(1).await;

        let (status, body) = send(&app, "GET", "/guests/TestGuest1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "name": "TestGuest1",
                "table": 2,
                "accompanying_guests": 4,
                "arrived": false,
            })
        );

        let (status, _) = send(&app, "GET", "/guests/TestGuest2", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn guest_leaves() {
        let app = TestApp::with_tables(&[12, 12, 12]).await;
        app.add_guests(1).await;

        let (status, body) = send(&app, "DELETE", "/guests/TestGuest1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "result": "success" }));

        let (status, _) = send(&app, "GET", "/guests/TestGuest1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "DELETE", "/guests/TestGuest1", None).await;
        assert_eq!(status, StatusCode::OK, "leaving twice is not an error");
    }

    #[tokio::test]
    async fn arrived_guests() {
        let app = TestApp::with_tables(&[12, 12, 12]).await;
        app.add_guests(3).await;

        let (status, body) = send(&app, "GET", "/guests", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "guests": [] }));

        for name in ["TestGuest1", "TestGuest3"] {
            app.seating.guests.record_arrival(name, 0).await.unwrap();
        }

        let (_, body) = send(&app, "GET", "/guests", None).await;
        let guests = body["guests"].as_array().unwrap();

        assert_eq!(guests.len(), 2);
        assert_eq!(guests[0]["name"], "TestGuest1");
        assert_eq!(guests[0]["table"], 2);
        assert!(guests[0]["time_arrived"].is_string());
        assert_eq!(guests[1]["name"], "TestGuest3");
    }
}
