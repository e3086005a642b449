mod context;
mod docs;
mod errors;
mod guests;
mod schemas;
mod serialized;
mod venue;

#[cfg(test)]
mod test_util;

use std::{
    future::Future,
    net::{Ipv6Addr, SocketAddr},
};

use axum::routing::get;
use log::info;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

pub use context::ServerContext;
pub use errors::{ServerError, ServerResult};

/// The default port the server will listen on.
pub const DEFAULT_PORT: u16 = 3000;

pub type Router = axum::Router<ServerContext>;

/// Builds every route of the server, ready to be served
pub fn app(context: ServerContext) -> axum::Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(guests::router())
        .merge(venue::router())
        .route("/api.json", get(docs::docs))
        .layer(cors)
        .with_state(context)
}

/// Starts the guestlist server, running until `shutdown` resolves
pub async fn run_server(
    context: ServerContext,
    port: u16,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let addr: SocketAddr = (Ipv6Addr::UNSPECIFIED, port).into();
    let listener = TcpListener::bind(&addr).await?;

    info!("Listening on {addr}");

    axum::serve(listener, app(context).into_make_service())
        .with_graceful_shutdown(shutdown)
        .await
}
