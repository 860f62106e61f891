//! Boutique admin library.
//!
//! Exposes the admin API as a library so integration tests can exercise
//! its router without spawning the binary.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
