//! HTTP interface.

pub mod admin;
pub mod handlers;
pub mod monitoring;
pub mod routes;
