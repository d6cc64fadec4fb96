//! HTTP API: configuration, authentication, routing and response mapping.

pub mod app;
pub mod auth;
pub mod config;
pub mod context;
pub mod middleware;
