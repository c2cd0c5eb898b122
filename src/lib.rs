//! rustshort - maps long URLs to short codes and redirects back.

pub mod admin;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;
pub mod services;
pub mod state;
pub mod store;
