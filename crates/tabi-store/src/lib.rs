//! Durable storage for the trip budget ledger.
//!
//! [`file::JsonFileStore`] keeps one JSON document per ledger key under a
//! data directory resolved by [`config::StoreConfig`].

pub mod config;
pub mod file;

pub use config::StoreConfig;
pub use file::JsonFileStore;
