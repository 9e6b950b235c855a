// # Route 53 DNS Provider
//
// This crate provides an AWS Route 53 provider for the DDNS system. It does
// not talk to AWS directly: every change goes through the AWS CLI, which
// must be installed and configured with at least one profile.
//
// ## Update flow
//
// 1. Preflight: `aws --version` must succeed, otherwise `CliUnavailable`
// 2. Build the `change-resource-record-sets` arguments (one UPSERT)
// 3. Run the CLI once; any failure is `UpdateFailed`
//
// No retries, no caching, no background tasks. The host owns the retry policy
// across update cycles.
//
// ## Configurator data
//
// `GET /route53/data` lists every profile from the AWS config file and the
// hosted zones each one can see, stores the result under the `route53`
// namespace of the host configuration and returns it. See [`routes`].
//
// ## CLI Reference
//
// - `aws --output json --profile P route53 change-resource-record-sets --hosted-zone-id Z --change-batch JSON`
// - `aws --output json --profile P route53 list-hosted-zones`

pub mod command;
pub mod definition;
pub mod discovery;
pub mod routes;

use async_trait::async_trait;
use ddns_core::{
    DnsProvider, DnsRecordSpec, Error, IpAddressSet, PluginDefinition, ProcessRunner,
    ProfileZoneMap, ProviderRegistry, Result,
};
use std::path::PathBuf;
use std::sync::Arc;

pub use command::PROGRAM_NAME;
pub use definition::DEFINITION;

/// Namespace of this provider in the registry and host configuration
pub const NAMESPACE: &str = "route53";

/// Route 53 provider driving the AWS CLI
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider will:
/// - Run the CLI preflight check
/// - Build and log the update arguments
/// - **NOT** run the update
pub struct Route53Provider {
    /// Runs the CLI
    runner: Arc<dyn ProcessRunner>,

    /// CLI executable (normally "aws")
    program: String,

    /// AWS config file; resolved from the environment when unset
    config_path: Option<PathBuf>,

    /// Dry-run mode: check and build, but skip the update call
    dry_run: bool,
}

impl std::fmt::Debug for Route53Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route53Provider")
            .field("program", &self.program)
            .field("config_path", &self.config_path)
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

impl Route53Provider {
    /// Create a provider running `aws` through `runner`
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            runner,
            program: PROGRAM_NAME.to_string(),
            config_path: None,
            dry_run: false,
        }
    }

    /// Use another CLI executable (absolute path or name on PATH)
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Read profiles from `path` instead of the default AWS config location
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Whether updates are only logged
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Verify the CLI can be run
    ///
    /// Not cached: every call spawns `aws --version`.
    pub async fn check_cli(&self) -> Result<()> {
        self.runner
            .run(&self.program, &command::version_args())
            .await
            .map_err(|e| Error::cli_unavailable(&self.program, e))?;
        Ok(())
    }

    /// Discover profiles and the hosted zones each one can see
    pub async fn discover(&self) -> Result<ProfileZoneMap> {
        let path = self.config_path()?;
        discovery::discover(self.runner.as_ref(), &self.program, &path).await
    }

    fn config_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.config_path {
            return Ok(path.clone());
        }
        discovery::default_config_path().ok_or_else(|| {
            Error::profiles_unavailable(
                "~/.aws/config",
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "home directory could not be determined",
                ),
            )
        })
    }
}

#[async_trait]
impl DnsProvider for Route53Provider {
    async fn update(&self, record: &DnsRecordSpec, ip: &IpAddressSet) -> Result<()> {
        tracing::debug!("Updating {}...", record.record);

        self.check_cli().await?;

        let address = ip.for_family(record.family).ok_or_else(|| {
            Error::invalid_input(format!(
                "No {} address available for {}",
                record.record_type(),
                record.record
            ))
        })?;
        let args = command::upsert_args(record, address);

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would run: {} {}",
                self.program,
                args.join(" ")
            );
            return Ok(());
        }

        self.runner.run(&self.program, &args).await.map_err(|e| {
            tracing::debug!("{} update of {} failed: {}", self.program, record.record, e);
            Error::update_failed(&self.program, &record.record, e)
        })?;

        tracing::info!("{} updated.", record.record);
        Ok(())
    }

    fn program_name(&self) -> &str {
        &self.program
    }

    fn definition(&self) -> &'static PluginDefinition {
        &DEFINITION
    }

    fn provider_name(&self) -> &'static str {
        NAMESPACE
    }
}

/// Register the Route 53 provider with a registry
///
/// # Example
///
/// ```rust
/// use ddns_core::{ProviderRegistry, TokioProcessRunner};
/// use ddns_provider_route53::Route53Provider;
/// use std::sync::Arc;
///
/// let registry = ProviderRegistry::new();
/// let provider = Route53Provider::new(Arc::new(TokioProcessRunner::new()));
/// ddns_provider_route53::register(&registry, Arc::new(provider));
/// assert!(registry.has_provider("route53"));
/// ```
pub fn register(registry: &ProviderRegistry, provider: Arc<Route53Provider>) {
    registry.register_provider(provider);
}
