pub mod controller;
pub mod events;
pub mod filter_store;
pub mod messages;
pub mod service;
