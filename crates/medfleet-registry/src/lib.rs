//! Client for the external fleet capability registry.

mod client;

pub use client::RegistryClient;
