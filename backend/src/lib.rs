pub mod config;
pub mod error;
pub mod model;
pub mod routes;
pub mod server;
pub mod service;
pub mod store;
