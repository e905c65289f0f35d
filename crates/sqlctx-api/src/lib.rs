//! # sqlctx API
//!
//! HTTP surface over the hybrid retriever.
//!
//! ```text
//! GET  /                      service info
//! POST /api/v1/search         run one retrieval
//! GET  /api/v1/domains        configured domains
//! GET  /api/v1/health         component health
//! POST /api/v1/admin/reload   re-read domain settings from the config file
//! GET  /metrics               Prometheus text exposition
//! ```

pub mod error;
pub mod http;
pub mod server;
pub mod state;

#[cfg(test)]
mod test_support;

pub use error::{ApiError, ErrorResponse};
pub use http::routes::create_router;
pub use server::ApiServer;
pub use state::AppState;
