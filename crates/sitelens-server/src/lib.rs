//! REST API server: analysis endpoints, provider discovery and session history.

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;
