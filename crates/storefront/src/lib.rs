//! Boutique storefront library.
//!
//! This crate provides the storefront API as a library, allowing it to be
//! tested and reused (the CLI reuses its repositories and migrations).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
