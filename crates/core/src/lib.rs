//! finanzas_core - pure logic for the finanzas personal-finance client.
//!
//! Nothing in this crate performs I/O. The client crate supplies the cache
//! backends, the HTTP transport and the cross-process change slot.

pub mod cache;
pub mod finance;
pub mod period;
