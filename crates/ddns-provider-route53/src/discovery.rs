//! Profile and hosted zone discovery
//!
//! Builds the profile → zone name → zone id map the configurator uses to fill
//! its drop-downs. Profiles come from the local AWS config file; zones come
//! from one `list-hosted-zones` call per profile, run strictly in file order.
//! The first failing profile aborts the whole discovery.

use ddns_core::{Error, ProcessRunner, ProfileZoneMap, Result, ZoneMap};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::command;

/// Section headers naming a profile: `[name]` or `[profile name]`
static PROFILE_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*\[(?:profile[ \t]+)?([^\]\s]+)\][ \t]*\r?$")
        .expect("profile header pattern is valid")
});

/// Final path segment of a hosted zone resource id
static ZONE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|/)(\w+)$").expect("zone id pattern is valid"));

/// Environment variable the AWS CLI reads for its config file location
pub const AWS_CONFIG_FILE_ENV: &str = "AWS_CONFIG_FILE";

/// `list-hosted-zones` output, trimmed to what discovery reads
#[derive(Debug, Deserialize)]
struct ListHostedZones {
    #[serde(rename = "HostedZones")]
    hosted_zones: Vec<HostedZone>,
}

#[derive(Debug, Deserialize)]
struct HostedZone {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Id")]
    id: String,
}

/// Location of the AWS config file
///
/// `AWS_CONFIG_FILE` if set, otherwise `~/.aws/config`.
pub fn default_config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(AWS_CONFIG_FILE_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|home| home.join(".aws").join("config"))
}

/// Profile names in file order
///
/// A profile declared twice is returned twice.
pub fn parse_profiles(config: &str) -> Vec<String> {
    PROFILE_HEADER
        .captures_iter(config)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Zone id from a resource id such as `/hostedzone/ZABC123`
pub fn extract_zone_id(resource_id: &str) -> Option<&str> {
    ZONE_ID
        .captures(resource_id)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Zone name → zone id from a `list-hosted-zones` JSON document
pub fn parse_hosted_zones(profile: &str, output: &str) -> Result<ZoneMap> {
    let listing: ListHostedZones = serde_json::from_str(output).map_err(|e| {
        Error::zone_discovery(profile, format!("Invalid list-hosted-zones output: {}", e))
    })?;

    let mut zones = ZoneMap::new();
    for zone in listing.hosted_zones {
        let id = extract_zone_id(&zone.id).ok_or_else(|| {
            Error::zone_discovery(profile, format!("Unexpected hosted zone id: {}", zone.id))
        })?;
        zones.insert(zone.name, id.to_string());
    }
    Ok(zones)
}

/// Read the profile names from the AWS config file at `path`
pub async fn read_profiles(path: &Path) -> Result<Vec<String>> {
    let config = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::profiles_unavailable(path, e))?;

    let profiles = parse_profiles(&config);
    tracing::debug!("Found {} profile(s) in {}", profiles.len(), path.display());
    Ok(profiles)
}

/// List the hosted zones visible to `profile`
pub async fn list_zones(
    runner: &dyn ProcessRunner,
    program: &str,
    profile: &str,
) -> Result<ZoneMap> {
    let args = command::list_hosted_zones_args(profile);
    let output = runner
        .run(program, &args)
        .await
        .map_err(|e| Error::zone_discovery(profile, e.to_string()))?;

    let zones = parse_hosted_zones(profile, &output.stdout)?;
    tracing::debug!("Profile {}: {} hosted zone(s)", profile, zones.len());
    Ok(zones)
}

/// Discover every profile in `config_path` and the zones each one can see
///
/// Profiles are listed one after another; the first failure is returned and
/// the remaining profiles are not listed.
pub async fn discover(
    runner: &dyn ProcessRunner,
    program: &str,
    config_path: &Path,
) -> Result<ProfileZoneMap> {
    let profiles = read_profiles(config_path).await?;

    let mut map = ProfileZoneMap::new();
    for profile in profiles {
        let zones = list_zones(runner, program, &profile).await?;
        map.insert(profile, zones);
    }
    Ok(map)
}
