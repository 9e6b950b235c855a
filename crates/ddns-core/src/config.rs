//! Record and address types handed to providers by the host
//!
//! Every value here is re-read from the host configuration on each call;
//! nothing is cached between updates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Address family a record tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpFamily {
    /// IPv4
    V4,
    /// IPv6
    V6,
}

impl IpFamily {
    /// The DNS record type holding addresses of this family
    pub fn record_type(self) -> RecordType {
        match self {
            IpFamily::V4 => RecordType::A,
            IpFamily::V6 => RecordType::Aaaa,
        }
    }
}

impl std::str::FromStr for IpFamily {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "v4" | "ipv4" => Ok(IpFamily::V4),
            "v6" | "ipv6" => Ok(IpFamily::V6),
            other => Err(crate::Error::config(format!(
                "Unknown address family '{}' (expected v4 or v6)",
                other
            ))),
        }
    }
}

/// DNS record type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordType {
    /// A record (IPv4)
    A,
    /// AAAA record (IPv6)
    #[serde(rename = "AAAA")]
    Aaaa,
}

impl RecordType {
    /// Wire spelling of the record type
    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A DNS record as stored by the host
///
/// `profile` and `zone_id` are the two fields the Route 53 plugin adds to the
/// host's record form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsRecordSpec {
    /// Fully-qualified record name (e.g. "api.example.com.")
    pub record: String,

    /// Address family; selects the record type and the address used
    #[serde(rename = "type")]
    pub family: IpFamily,

    /// Time-to-live in seconds
    pub ttl: u32,

    /// Credential profile the CLI runs under
    pub profile: String,

    /// Hosted zone holding the record
    pub zone_id: String,
}

impl DnsRecordSpec {
    /// Create a record spec
    pub fn new(
        record: impl Into<String>,
        family: IpFamily,
        ttl: u32,
        profile: impl Into<String>,
        zone_id: impl Into<String>,
    ) -> Self {
        Self {
            record: record.into(),
            family,
            ttl,
            profile: profile.into(),
            zone_id: zone_id.into(),
        }
    }

    /// Record type derived from the address family
    pub fn record_type(&self) -> RecordType {
        self.family.record_type()
    }

    /// Validate the record spec
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.record.trim().is_empty() {
            return Err(crate::Error::config("Record name cannot be empty"));
        }
        if self.ttl == 0 {
            return Err(crate::Error::config("Record TTL must be > 0"));
        }
        if self.profile.trim().is_empty() {
            return Err(crate::Error::config("Record profile cannot be empty"));
        }
        if self.zone_id.trim().is_empty() {
            return Err(crate::Error::config("Record hosted zone ID cannot be empty"));
        }
        Ok(())
    }
}

/// Current external addresses detected by the host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpAddressSet {
    /// IPv4 address, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v4: Option<Ipv4Addr>,
    /// IPv6 address, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v6: Option<Ipv6Addr>,
}

impl IpAddressSet {
    /// Address set with only an IPv4 address
    pub fn v4(addr: Ipv4Addr) -> Self {
        Self {
            v4: Some(addr),
            v6: None,
        }
    }

    /// Address set with only an IPv6 address
    pub fn v6(addr: Ipv6Addr) -> Self {
        Self {
            v4: None,
            v6: Some(addr),
        }
    }

    /// The address matching `family`, if the host detected one
    pub fn for_family(&self, family: IpFamily) -> Option<IpAddr> {
        match family {
            IpFamily::V4 => self.v4.map(IpAddr::V4),
            IpFamily::V6 => self.v6.map(IpAddr::V6),
        }
    }
}

/// Zone name → zone identifier for one profile
pub type ZoneMap = BTreeMap<String, String>;

/// Profile → zones, as discovered from the provider CLI
///
/// Serialises as a plain JSON object of objects. Stored by the host as an
/// opaque blob and never interpreted further by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileZoneMap(BTreeMap<String, ZoneMap>);

impl ProfileZoneMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the zones of a profile, replacing any earlier entry
    pub fn insert(&mut self, profile: impl Into<String>, zones: ZoneMap) {
        self.0.insert(profile.into(), zones);
    }

    /// Zones of a profile
    pub fn zones(&self, profile: &str) -> Option<&ZoneMap> {
        self.0.get(profile)
    }

    /// Profile names
    pub fn profiles(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterate over (profile, zones)
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ZoneMap)> {
        self.0.iter().map(|(p, z)| (p.as_str(), z))
    }

    /// Number of profiles
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no profile was discovered
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
