pub mod auth;
pub mod config;
pub mod database;
pub mod repositories;
pub mod seed;
pub mod utils;
