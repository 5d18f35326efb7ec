//! API Module
//!
//! HTTP handlers and routing for the blob server REST API.
//!
//! # Endpoints
//! - `GET /blobs/*key` - Fetch a blob (read-through cache)
//! - `PUT /blobs/*key` - Store a blob (write-through cache)
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
