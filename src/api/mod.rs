//! HTTP API module: page shells, the EMY data endpoint, health and metrics.

pub mod envelope;
pub mod handlers;
pub mod routes;

pub use envelope::{Envelope, EnvelopeStatus, FAILURE_MESSAGE};
pub use handlers::AppState;
pub use routes::create_router;
