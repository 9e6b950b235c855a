// # ddnsd - DDNS Plugin Host
//
// A THIN host for DDNS provider plugins. All DNS and CLI logic lives in the
// provider crates; this binary only:
// 1. Reads configuration from environment variables
// 2. Initializes logging and the runtime
// 3. Registers the Route 53 provider
// 4. Runs one command
//
// ## Commands (`DDNS_COMMAND`)
//
// - `serve` (default): serve the configurator data route and plugin metadata
// - `update`: upsert one record and exit
// - `discover`: list profiles and hosted zones, store and print them
//
// ## Configuration
//
// ### Common
// - `DDNS_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
// - `DDNS_CONFIG_PATH`: Host configuration file (default: ddns-config.json)
// - `DDNS_AWS_PROGRAM`: AWS CLI executable (default: aws)
// - `DDNS_AWS_CONFIG_FILE`: AWS config file (default: $AWS_CONFIG_FILE or ~/.aws/config)
// - `DDNS_CLI_TIMEOUT_SECS`: Kill CLI calls running longer than this (default: none)
// - `DDNS_DRY_RUN`: `true` to log updates without running them
//
// ### update
// - `DDNS_RECORD`: Fully-qualified record name
// - `DDNS_RECORD_TYPE`: v4 or v6 (default: v4)
// - `DDNS_TTL`: TTL in seconds (default: 300)
// - `DDNS_PROFILE`: AWS CLI profile (default: default)
// - `DDNS_ZONE_ID`: Hosted zone ID
// - `DDNS_IP_V4` / `DDNS_IP_V6`: Address to publish
//
// ### serve
// - `DDNS_LISTEN_ADDR`: Bind address (default: 127.0.0.1:8080)
//
// ## Example
//
// ```bash
// export DDNS_COMMAND=update
// export DDNS_RECORD=api.example.com.
// export DDNS_ZONE_ID=Z1
// export DDNS_IP_V4=203.0.113.5
//
// ddnsd
// ```

use anyhow::{Context, Result};
use axum::{Json, Router, routing::get};
use ddns_core::{
    ConfigStore, DnsRecordSpec, FileConfigStore, IpAddressSet, IpFamily, ProviderRegistry,
    TokioProcessRunner,
};
use ddns_provider_route53::{NAMESPACE, Route53Provider, routes};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// - 0: Success
/// - 1: Configuration or startup error
/// - 2: Runtime error
#[derive(Debug, Clone, Copy)]
enum DdnsExitCode {
    /// Command completed
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// What the binary does once configured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Serve,
    Update,
    Discover,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "serve" => Ok(Command::Serve),
            "update" => Ok(Command::Update),
            "discover" => Ok(Command::Discover),
            other => anyhow::bail!(
                "DDNS_COMMAND '{}' is not supported. Supported commands: serve, update, discover",
                other
            ),
        }
    }
}

/// Application configuration
#[derive(Debug)]
struct Config {
    command: Command,
    log_level: String,
    config_path: PathBuf,
    aws_program: String,
    aws_config_file: Option<PathBuf>,
    cli_timeout_secs: Option<u64>,
    dry_run: bool,
    listen_addr: String,
    record: Option<String>,
    record_type: IpFamily,
    ttl: u32,
    profile: String,
    zone_id: Option<String>,
    ip_v4: Option<String>,
    ip_v6: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            command: var("DDNS_COMMAND")
                .map(|s| s.parse())
                .transpose()?
                .unwrap_or(Command::Serve),
            log_level: var("DDNS_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            config_path: var("DDNS_CONFIG_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("ddns-config.json")),
            aws_program: var("DDNS_AWS_PROGRAM")
                .unwrap_or_else(|| ddns_provider_route53::PROGRAM_NAME.to_string()),
            aws_config_file: var("DDNS_AWS_CONFIG_FILE").map(PathBuf::from),
            cli_timeout_secs: parse_var(&var, "DDNS_CLI_TIMEOUT_SECS")?,
            dry_run: var("DDNS_DRY_RUN")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            listen_addr: var("DDNS_LISTEN_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string()),
            record: var("DDNS_RECORD"),
            record_type: parse_var(&var, "DDNS_RECORD_TYPE")?.unwrap_or(IpFamily::V4),
            ttl: parse_var(&var, "DDNS_TTL")?.unwrap_or(300),
            profile: var("DDNS_PROFILE").unwrap_or_else(|| "default".to_string()),
            zone_id: var("DDNS_ZONE_ID"),
            ip_v4: var("DDNS_IP_V4"),
            ip_v6: var("DDNS_IP_V6"),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "DDNS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        if self.aws_program.is_empty() {
            anyhow::bail!("DDNS_AWS_PROGRAM cannot be empty");
        }

        if let Some(timeout) = self.cli_timeout_secs.filter(|t| !(1..=3600).contains(t)) {
            anyhow::bail!(
                "DDNS_CLI_TIMEOUT_SECS must be between 1 and 3600 seconds. Got: {}",
                timeout
            );
        }

        match self.command {
            Command::Serve => {
                self.listen_addr.parse::<SocketAddr>().with_context(|| {
                    format!("DDNS_LISTEN_ADDR '{}' is not a socket address", self.listen_addr)
                })?;
            }
            Command::Update => {
                self.record_spec()?.validate()?;
                let ip = self.ip_set()?;
                if ip.for_family(self.record_type).is_none() {
                    anyhow::bail!(
                        "DDNS_RECORD_TYPE is {:?} but no matching DDNS_IP_{} is set",
                        self.record_type,
                        if self.record_type == IpFamily::V4 { "V4" } else { "V6" }
                    );
                }
            }
            Command::Discover => {}
        }

        Ok(())
    }

    /// The record to update
    fn record_spec(&self) -> Result<DnsRecordSpec> {
        let record = self.record.clone().context(
            "DDNS_RECORD is required for update. \
            Set it via: export DDNS_RECORD=api.example.com.",
        )?;
        let zone_id = self.zone_id.clone().context(
            "DDNS_ZONE_ID is required for update. \
            Find it via: DDNS_COMMAND=discover ddnsd",
        )?;

        Ok(DnsRecordSpec::new(
            record,
            self.record_type,
            self.ttl,
            self.profile.clone(),
            zone_id,
        ))
    }

    /// The addresses to publish
    fn ip_set(&self) -> Result<IpAddressSet> {
        Ok(IpAddressSet {
            v4: parse_ip(self.ip_v4.as_deref(), "DDNS_IP_V4")?,
            v6: parse_ip(self.ip_v6.as_deref(), "DDNS_IP_V6")?,
        })
    }

    fn tracing_level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

fn parse_var<T>(var: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    var(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| anyhow::anyhow!("{} has invalid value '{}': {}", key, raw, e))
        })
        .transpose()
}

fn parse_ip<T: FromStr>(raw: Option<&str>, key: &str) -> Result<Option<T>> {
    raw.map(|s| {
        s.trim()
            .parse::<T>()
            .map_err(|_| anyhow::anyhow!("{} is not a valid address: {}", key, s))
    })
    .transpose()
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return DdnsExitCode::ConfigError.into();
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.tracing_level())
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run(config).await {
            error!("{:#}", e);
            DdnsExitCode::RuntimeError
        } else {
            DdnsExitCode::Success
        }
    });

    result.into()
}

/// Build the provider and run the configured command
async fn run(config: Config) -> Result<()> {
    let mut runner = TokioProcessRunner::new();
    if let Some(secs) = config.cli_timeout_secs {
        runner = runner.with_timeout(Duration::from_secs(secs));
    }

    let mut provider = Route53Provider::new(Arc::new(runner))
        .with_program(config.aws_program.clone())
        .with_dry_run(config.dry_run);
    if let Some(path) = &config.aws_config_file {
        provider = provider.with_config_path(path.clone());
    }
    let provider = Arc::new(provider);

    let registry = ProviderRegistry::new();
    ddns_provider_route53::register(&registry, provider.clone());

    match config.command {
        Command::Update => {
            let record = config.record_spec()?;
            let ip = config.ip_set()?;
            registry.provider(NAMESPACE)?.update(&record, &ip).await?;
        }
        Command::Discover => {
            let store = FileConfigStore::new(&config.config_path).await?;
            let data = provider.discover().await?;
            store
                .set_plugin(NAMESPACE, serde_json::to_value(&data)?)
                .await?;
            store.save().await?;
            info!(
                "Stored {} profile(s) in {}",
                data.len(),
                config.config_path.display()
            );
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Command::Serve => {
            let store: Arc<dyn ConfigStore> =
                Arc::new(FileConfigStore::new(&config.config_path).await?);
            let definitions = serde_json::to_value(registry.definitions())?;

            let app = Router::new()
                .route(
                    "/plugins",
                    get(move || {
                        let definitions = definitions.clone();
                        async move { Json(definitions) }
                    }),
                )
                .merge(routes::router(provider, store));

            let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
            info!("Listening on http://{}", config.listen_addr);
            info!("Configurator data: GET {}", routes::DATA_PATH);

            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    match wait_for_shutdown().await {
                        Ok(signal) => info!("Received shutdown signal: {}", signal),
                        Err(e) => error!("Shutdown signal error: {}", e),
                    }
                })
                .await?;
            info!("Server stopped");
        }
    }

    Ok(())
}

/// Wait for SIGTERM or SIGINT
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Wait for CTRL-C
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_to_serve() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.command, Command::Serve);
        assert_eq!(cfg.aws_program, "aws");
        assert_eq!(cfg.ttl, 300);
        assert!(!cfg.dry_run);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn update_builds_record_and_address() {
        let cfg = config(&[
            ("DDNS_COMMAND", "update"),
            ("DDNS_RECORD", "api.example.com."),
            ("DDNS_ZONE_ID", "Z1"),
            ("DDNS_IP_V4", "203.0.113.5"),
        ])
        .unwrap();

        cfg.validate().unwrap();
        let record = cfg.record_spec().unwrap();
        assert_eq!(record.profile, "default");
        assert_eq!(record.record_type().as_str(), "A");
        assert_eq!(
            cfg.ip_set().unwrap().v4,
            Some("203.0.113.5".parse().unwrap())
        );
    }

    #[test]
    fn update_requires_matching_address() {
        let cfg = config(&[
            ("DDNS_COMMAND", "update"),
            ("DDNS_RECORD", "api.example.com."),
            ("DDNS_ZONE_ID", "Z1"),
            ("DDNS_RECORD_TYPE", "v6"),
            ("DDNS_IP_V4", "203.0.113.5"),
        ])
        .unwrap();

        assert!(cfg.validate().is_err());
    }

    #[test]
    fn update_requires_zone_id() {
        let cfg = config(&[
            ("DDNS_COMMAND", "update"),
            ("DDNS_RECORD", "api.example.com."),
            ("DDNS_IP_V4", "203.0.113.5"),
        ])
        .unwrap();

        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(config(&[("DDNS_COMMAND", "restart")]).is_err());
        assert!(config(&[("DDNS_TTL", "soon")]).is_err());
        assert!(config(&[("DDNS_LOG_LEVEL", "loud")]).unwrap().validate().is_err());
        assert!(
            config(&[("DDNS_CLI_TIMEOUT_SECS", "0")])
                .unwrap()
                .validate()
                .is_err()
        );
        assert!(
            config(&[("DDNS_LISTEN_ADDR", "nowhere")])
                .unwrap()
                .validate()
                .is_err()
        );
    }

    #[test]
    fn dry_run_flag() {
        assert!(config(&[("DDNS_DRY_RUN", "true")]).unwrap().dry_run);
        assert!(!config(&[("DDNS_DRY_RUN", "no")]).unwrap().dry_run);
    }
}
