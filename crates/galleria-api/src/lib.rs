//! Galleria API Library
//!
//! HTTP handlers, middleware, and application setup for the image service.

mod handlers;
mod middleware;
mod telemetry;
mod utils;

pub mod error;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use middleware::REQUEST_ID_HEADER;
pub use setup::{build_app, initialize_app};
pub use state::AppState;
