//! Bookshelf: search Google Books and keep a per-user list of saved books.
//!
//! The server exposes everything over GraphQL at `/graphql`; the terminal
//! client in [`tui`] talks to it through [`client::GraphqlClient`].

pub mod api;
pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod graphql;
pub mod services;
pub mod tui;
