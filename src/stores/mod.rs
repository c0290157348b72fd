//! Store implementations for the definition cache.

pub mod moka;
pub mod redis;

pub use moka::{MokaStore, MokaStoreConfig};
pub use redis::{RedisStore, RedisStoreConfig};
