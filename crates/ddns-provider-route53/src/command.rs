//! AWS CLI argument vectors
//!
//! Pure functions: no process is spawned here. Argument order matches what
//! the AWS CLI expects, global options first.

use ddns_core::{DnsRecordSpec, Error, RecordType, Result};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Name of the AWS CLI executable
pub const PROGRAM_NAME: &str = "aws";

/// Change batch accepted by `route53 change-resource-record-sets`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChangeBatch {
    /// Changes applied atomically
    pub changes: Vec<Change>,
}

/// One change of a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Change {
    /// What to do with the record set
    pub action: ChangeAction,
    /// Target record set
    pub resource_record_set: ResourceRecordSet,
}

/// Change action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeAction {
    /// Create the record set, or replace it if it exists
    Upsert,
}

/// Resource record set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceRecordSet {
    /// Fully-qualified record name
    pub name: String,
    /// Record type
    #[serde(rename = "Type")]
    pub record_type: RecordType,
    /// Time-to-live in seconds
    #[serde(rename = "TTL")]
    pub ttl: u32,
    /// Record values
    pub resource_records: Vec<ResourceRecord>,
}

/// Single record value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceRecord {
    /// The address
    pub value: String,
}

impl ChangeBatch {
    /// A batch with one UPSERT of `record` pointing at `address`
    pub fn upsert(record: &DnsRecordSpec, address: IpAddr) -> Self {
        Self {
            changes: vec![Change {
                action: ChangeAction::Upsert,
                resource_record_set: ResourceRecordSet {
                    name: record.record.clone(),
                    record_type: record.record_type(),
                    ttl: record.ttl,
                    resource_records: vec![ResourceRecord {
                        value: address.to_string(),
                    }],
                },
            }],
        }
    }

    /// Serialise to JSON with every `"` escaped as `\"`
    ///
    /// The escaped form is passed as a single process argument and read
    /// verbatim by the CLI's argument parser.
    pub fn encode(&self) -> String {
        // Plain structs with string keys always serialise
        let json = serde_json::to_string(self).expect("change batch is serialisable");
        json.replace('"', "\\\"")
    }

    /// Inverse of [`ChangeBatch::encode`]
    pub fn decode(payload: &str) -> Result<Self> {
        let json = payload.replace("\\\"", "\"");
        serde_json::from_str(&json)
            .map_err(|e| Error::invalid_input(format!("Malformed change batch: {}", e)))
    }
}

/// `aws --version`
pub fn version_args() -> Vec<String> {
    vec!["--version".to_string()]
}

/// `aws ... route53 change-resource-record-sets` upserting `record` to `address`
pub fn upsert_args(record: &DnsRecordSpec, address: IpAddr) -> Vec<String> {
    let batch = ChangeBatch::upsert(record, address);

    let mut args = json_profile_args(&record.profile);
    args.extend([
        "route53".to_string(),
        "change-resource-record-sets".to_string(),
        "--hosted-zone-id".to_string(),
        record.zone_id.clone(),
        "--change-batch".to_string(),
        batch.encode(),
    ]);
    args
}

/// `aws ... route53 list-hosted-zones` under `profile`
pub fn list_hosted_zones_args(profile: &str) -> Vec<String> {
    let mut args = json_profile_args(profile);
    args.extend(["route53".to_string(), "list-hosted-zones".to_string()]);
    args
}

fn json_profile_args(profile: &str) -> Vec<String> {
    vec![
        "--output".to_string(),
        "json".to_string(),
        "--profile".to_string(),
        profile.to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddns_core::IpFamily;

    fn api_record() -> DnsRecordSpec {
        DnsRecordSpec::new("api.example.com.", IpFamily::V4, 300, "default", "Z1")
    }

    #[test]
    fn upsert_args_follow_cli_layout() {
        let args = upsert_args(&api_record(), "203.0.113.5".parse().unwrap());

        assert_eq!(
            &args[..9],
            &[
                "--output",
                "json",
                "--profile",
                "default",
                "route53",
                "change-resource-record-sets",
                "--hosted-zone-id",
                "Z1",
                "--change-batch",
            ]
        );
        assert_eq!(args.len(), 10);
    }

    #[test]
    fn payload_is_escaped_upsert() {
        let args = upsert_args(&api_record(), "203.0.113.5".parse().unwrap());
        let payload = &args[9];

        assert!(payload.starts_with("{\\\"Changes\\\":"));
        assert!(!payload.replace("\\\"", "").contains('"'));

        let json: serde_json::Value =
            serde_json::from_str(&payload.replace("\\\"", "\"")).unwrap();
        let change = &json["Changes"][0];
        assert_eq!(json["Changes"].as_array().unwrap().len(), 1);
        assert_eq!(change["Action"], "UPSERT");
        assert_eq!(change["ResourceRecordSet"]["Name"], "api.example.com.");
        assert_eq!(change["ResourceRecordSet"]["Type"], "A");
        assert_eq!(change["ResourceRecordSet"]["TTL"], 300);
        assert_eq!(
            change["ResourceRecordSet"]["ResourceRecords"][0]["Value"],
            "203.0.113.5"
        );
    }

    #[test]
    fn decode_recovers_ipv6_record() {
        let record = DnsRecordSpec::new("v6.example.com.", IpFamily::V6, 60, "work", "Z9");
        let address: IpAddr = "2001:db8::1".parse().unwrap();

        let batch = ChangeBatch::decode(&ChangeBatch::upsert(&record, address).encode()).unwrap();
        let set = &batch.changes[0].resource_record_set;

        assert_eq!(batch.changes[0].action, ChangeAction::Upsert);
        assert_eq!(set.name, "v6.example.com.");
        assert_eq!(set.record_type, RecordType::Aaaa);
        assert_eq!(set.ttl, 60);
        assert_eq!(set.resource_records[0].value, "2001:db8::1");
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(ChangeBatch::decode("not json").is_err());
    }

    #[test]
    fn list_and_version_args() {
        assert_eq!(version_args(), vec!["--version"]);
        assert_eq!(
            list_hosted_zones_args("work"),
            vec!["--output", "json", "--profile", "work", "route53", "list-hosted-zones"]
        );
    }
}
