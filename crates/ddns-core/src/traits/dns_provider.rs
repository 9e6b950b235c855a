// # DNS Provider Trait
//
// Defines the interface the host uses to push a new address into a DNS record.
//
// ## Implementations
//
// - Route 53 via the AWS CLI: `ddns-provider-route53` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::{DnsProvider, DnsRecordSpec, IpAddressSet, IpFamily};
//
// let record = DnsRecordSpec::new("api.example.com.", IpFamily::V4, 300, "default", "Z1");
// let ip = IpAddressSet::v4("203.0.113.5".parse()?);
// provider.update(&record, &ip).await?;
// ```

use async_trait::async_trait;

use crate::config::{DnsRecordSpec, IpAddressSet};
use crate::plugin::PluginDefinition;

/// Trait for DNS provider plugins
///
/// Providers are stateless: every call re-derives what it needs from its
/// arguments. They never retry; the host owns any retry policy across update
/// cycles and a failed call is reported immediately.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Upsert `record` with the address in `ip` matching the record's family
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The provider accepted the change
    /// - `Err(Error)`: The update could not be performed
    async fn update(&self, record: &DnsRecordSpec, ip: &IpAddressSet)
    -> Result<(), crate::Error>;

    /// Name of the external program this provider drives (e.g. "aws")
    fn program_name(&self) -> &str;

    /// Static description shown by the host
    fn definition(&self) -> &'static PluginDefinition;

    /// Namespace used for this provider in the registry and config store
    fn provider_name(&self) -> &'static str;
}
