//! External and domain services.

pub mod auth;
pub mod exchange;
