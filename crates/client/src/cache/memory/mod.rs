//! In-memory cache backend.
//!
//! Provides the LRU-bounded TTL cache and the in-process change bus used by
//! a single client process.

mod cache;
mod pubsub;

pub use cache::MemoryCache;
pub use pubsub::MemoryPubSub;
