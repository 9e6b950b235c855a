// # ddns-core
//
// Core library for DDNS provider plugins that drive an external tool.
//
// ## Architecture Overview
//
// The host application owns scheduling, IP detection, retries and the user
// interface. This crate is the contract between the host and its providers:
// - **DnsProvider**: Trait a provider plugin implements to upsert a record
// - **ProcessRunner**: Trait for running the provider's external CLI
// - **ConfigStore**: Trait for the host configuration store, one namespace per plugin
// - **PluginDefinition**: Static metadata a provider exposes to the host UI
// - **ProviderRegistry**: Name-keyed registry of providers
//
// ## Design Principles
//
// 1. **Stateless providers**: Every call re-derives its inputs; nothing is cached
// 2. **No retries**: Failures are reported immediately; the host decides what next
// 3. **Collaborators behind traits**: Processes and storage are swappable in tests

pub mod config;
pub mod error;
pub mod plugin;
pub mod process;
pub mod registry;
pub mod store;
pub mod traits;

// Re-export core types for convenience
pub use config::{DnsRecordSpec, IpAddressSet, IpFamily, ProfileZoneMap, RecordType, ZoneMap};
pub use error::{Error, Result};
pub use plugin::{Configurator, FieldKind, PluginDefinition, Position, RecordField, SelectOption};
pub use process::{ProcessError, ProcessOutput, TokioProcessRunner};
pub use registry::ProviderRegistry;
pub use store::{FileConfigStore, MemoryConfigStore};
pub use traits::{ConfigStore, DnsProvider, ProcessRunner};
