//! Operational health probe.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/health` | Process and database liveness |

pub mod dtos;
pub mod handlers;
pub mod routes;
