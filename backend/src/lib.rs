pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod hospital;
pub mod models;
pub mod schedule;
pub mod services;
pub mod state;
