pub mod api;
pub mod config;
pub mod handlers;
pub mod prometheus;
pub mod query;
pub mod resources;
pub mod router;
pub mod seed;
pub mod server;
pub mod service;
pub mod store;
