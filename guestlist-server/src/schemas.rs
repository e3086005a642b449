use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use guestlist_ledger::DEFAULT_TABLE_SEATS;
use serde::{de::DeserializeOwned, Deserialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::errors::ServerError;

#[derive(Debug, ToSchema, Validate, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewGuestSchema {
    /// The table the guest is seated at
    #[validate(range(min = 1))]
    pub table: i32,
    /// How many people come along with the guest
    #[validate(range(min = 0))]
    pub accompanying_guests: i32,
}

#[derive(Debug, ToSchema, Validate, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArrivalSchema {
    /// How many people actually came along with the guest
    #[validate(range(min = 0))]
    pub accompanying_guests: i32,
}

#[derive(Debug, ToSchema, Validate, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewTableSchema {
    #[serde(default = "default_seats")]
    #[validate(range(min = 0))]
    pub seats: i32,
}

fn default_seats() -> i32 {
    DEFAULT_TABLE_SEATS
}

pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ServerError::BadRequest(e.body_text()))?;

        body.validate()
            .map_err(|e| ServerError::BadRequest(format!("Request body is invalid: {e}")))?;

        Ok(Self(body))
    }
}

/// A path parameter that reports parse failures as a JSON error body
pub struct PathParam<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for PathParam<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ServerError::BadRequest(e.body_text()))?;

        Ok(Self(value))
    }
}
