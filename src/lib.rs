//! Short links and session verification for the nobull.fit backend.

pub mod auth;
pub mod config;
pub mod dao;
pub mod error;
pub mod links;
pub mod model;
pub mod routes;
pub mod state;
pub mod token;
pub mod utils;
