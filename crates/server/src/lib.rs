//! HTTP surface for face verification: configuration, routing and the
//! mapping of verification outcomes to responses.

pub mod api_error;
pub mod app;
pub mod config;
