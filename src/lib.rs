//! The `taskboard` library crate.
//!
//! Domain models, authentication, routing configuration, and error
//! handling for the taskboard backend. The binary in `main.rs` assembles
//! these into the running application; integration tests build the same
//! application from the pieces exported here.

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
