//! API route definitions
//!
//! The primary API is GraphQL at /graphql (wired up in [crate::app]).
//! Only the health endpoints live here.

pub mod health;
