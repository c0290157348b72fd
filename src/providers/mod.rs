//! Upstream provider implementations.

pub mod http;

pub use http::{HttpProvider, HttpProviderConfig};
