pub mod app;
pub mod config;
pub mod filter;
pub mod interface;
pub mod stats;
pub mod status;
