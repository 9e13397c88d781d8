//! REST API over a shared sizing session.
//!
//! Endpoints:
//! - `GET /state`, `GET /devices`, `GET /summary`
//! - `POST /devices`, `PATCH /devices/{index}`, `DELETE /devices/{index}`
//! - `PUT /config`, `POST /calculate`, `POST /reset`
//!
//! Errors are returned as `{"error": "..."}`: 400 for invalid input, 404 for
//! unknown device indices, 422 when sizing an empty inventory.

mod handlers;
pub mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::routing::{get, patch, post, put};
use tracing::info;

use crate::session::Session;
use crate::store::StateStore;

/// Session shared across request handlers.
pub type SharedSession<S> = Arc<Mutex<Session<S>>>;

/// Wraps a session for use with [`router`].
pub fn shared<S: StateStore>(session: Session<S>) -> SharedSession<S> {
    Arc::new(Mutex::new(session))
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `session` - Shared session
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router<S>(session: SharedSession<S>) -> Router
where
    S: StateStore + Send + 'static,
{
    Router::new()
        .route("/state", get(handlers::get_state::<S>))
        .route("/summary", get(handlers::get_summary::<S>))
        .route(
            "/devices",
            get(handlers::list_devices::<S>).post(handlers::add_device::<S>),
        )
        .route(
            "/devices/{index}",
            patch(handlers::update_device::<S>).delete(handlers::remove_device::<S>),
        )
        .route("/config", put(handlers::update_config::<S>))
        .route("/calculate", post(handlers::calculate::<S>))
        .route("/reset", post(handlers::reset::<S>))
        .with_state(session)
}

/// Binds to the given address and serves the API until the server stops.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind to `addr` or the server
/// fails.
pub async fn serve<S>(session: SharedSession<S>, addr: SocketAddr) -> io::Result<()>
where
    S: StateStore + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API server listening on http://{addr}");
    axum::serve(listener, router(session)).await
}
