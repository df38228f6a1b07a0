//! Cache backend implementations.
//!
//! Concrete implementations of the traits defined in
//! `finanzas_core::cache`: an in-memory cache and bus per process, plus a
//! file-backed slot shared by every process on the machine.

pub mod memory;
pub mod slot;

pub use memory::{MemoryCache, MemoryPubSub};
pub use slot::{FileSlot, SlotWatcher};
