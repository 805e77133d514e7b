//! Shared library surface for the medfleet server and its tests.

pub mod api;
pub mod config;
pub mod engine;
pub mod export;
pub mod loops;
pub mod persistence;
pub mod state;
