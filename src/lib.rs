pub mod auth;
pub mod bidding;
pub mod catalog;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod policy;
pub mod routes;
pub mod state;
pub mod store;
