//! Web API for sitedeploy.
//!
//! A JSON API over the staging tree and the deployer. It stands in for the
//! browser front end, which can be served from `web.static_path`.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;
