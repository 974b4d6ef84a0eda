//! API endpoint handlers.

pub mod check;
pub mod health;
