//! Core traits for the DDNS plugin system
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`DnsProvider`]: Update DNS records for the host
//! - [`ProcessRunner`]: Run external programs on behalf of a provider
//! - [`ConfigStore`]: The host's configuration store, namespaced per plugin

pub mod config_store;
pub mod dns_provider;
pub mod process_runner;

pub use config_store::ConfigStore;
pub use dns_provider::DnsProvider;
pub use process_runner::ProcessRunner;
