pub mod config;
pub mod db;
pub mod errors;
pub mod server;
pub mod service;
pub mod telemetry;
pub mod transfer;
