//! Management API interaction module
//!
//! This module provides the pieces needed to talk to the RabbitMQ
//! management HTTP API.
//!
//! # Module Structure
//!
//! - [`client`] - Main broker client: per-resource accessors, snapshots, connection closing
//! - [`error`] - Error taxonomy shared by every request
//! - [`http`] - HTTP utilities for REST API calls
//! - [`models`] - Typed payloads of each resource

pub mod client;
pub mod error;
pub mod http;
pub mod models;

pub use client::{BrokerClient, BrokerClientConfig};
pub use error::{format_broker_error, ErrorKind, FetchError};
