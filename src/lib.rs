//! Snapshot client for the RabbitMQ management HTTP API
//!
//! - [`broker`] - HTTP client, payload types and errors
//! - [`resource`] - Per-resource fetching and concurrent snapshot aggregation
//! - [`config`] - Persistent user configuration
//! - [`render`] - Text output of a snapshot

pub mod broker;
pub mod config;
pub mod render;
pub mod resource;

pub use broker::{BrokerClient, BrokerClientConfig, FetchError};
pub use resource::Snapshot;
