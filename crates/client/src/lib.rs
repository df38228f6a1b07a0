//! finanzas_client - cached CLI client for the finanzas services.

pub mod cache;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod output;

pub use client::{FinanceApi, FinanzasClient};
pub use error::{ClientError, Result};
pub use gateway::{CachedDataGateway, ChangeListener, GatewayError};
