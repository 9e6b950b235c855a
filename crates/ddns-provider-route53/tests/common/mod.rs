//! Test doubles shared by the Route 53 contract tests
//!
//! `FakeRunner` stands in for the AWS CLI: it answers from a scripted
//! function and records every invocation.

#![allow(dead_code)]

use async_trait::async_trait;
use ddns_core::{ProcessError, ProcessOutput, ProcessRunner};
use std::sync::Mutex;

type Responder = dyn Fn(&str, &[String]) -> Result<ProcessOutput, ProcessError> + Send + Sync;

/// One recorded process invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// Whether this was the `--version` preflight
    pub fn is_version_check(&self) -> bool {
        self.args == ["--version"]
    }

    /// The `--profile` argument, if any
    pub fn profile(&self) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == "--profile")
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }
}

/// A scripted ProcessRunner that records calls
pub struct FakeRunner {
    responder: Box<Responder>,
    calls: Mutex<Vec<Invocation>>,
}

impl FakeRunner {
    /// Answer every call with `responder`
    pub fn new(
        responder: impl Fn(&str, &[String]) -> Result<ProcessOutput, ProcessError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every call succeeds with empty output
    pub fn succeeding() -> Self {
        Self::new(|_, _| Ok(ProcessOutput::success("")))
    }

    /// The program is not installed
    pub fn missing() -> Self {
        Self::new(|program, _| Err(spawn_error(program)))
    }

    /// `--version` works, every other call exits 255
    pub fn failing_updates() -> Self {
        Self::new(|program, args| {
            if args == ["--version"] {
                Ok(ProcessOutput::success("aws-cli/2.15.0"))
            } else {
                Err(exit_error(program, "An error occurred (AccessDenied)"))
            }
        })
    }

    /// Answer `list-hosted-zones` per profile with `zones(profile)`
    pub fn with_zones(
        zones: impl Fn(&str) -> Result<String, ProcessError> + Send + Sync + 'static,
    ) -> Self {
        Self::new(move |_, args| {
            let profile = args
                .iter()
                .position(|a| a == "--profile")
                .and_then(|i| args.get(i + 1))
                .cloned()
                .unwrap_or_default();
            zones(&profile).map(ProcessOutput::success)
        })
    }

    /// Recorded invocations, oldest first
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    /// Recorded invocations other than the preflight
    pub fn non_version_calls(&self) -> Vec<Invocation> {
        self.calls()
            .into_iter()
            .filter(|c| !c.is_version_check())
            .collect()
    }
}

#[async_trait]
impl ProcessRunner for FakeRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<ProcessOutput, ProcessError> {
        self.calls.lock().unwrap().push(Invocation {
            program: program.to_string(),
            args: args.to_vec(),
        });
        (self.responder)(program, args)
    }
}

pub fn spawn_error(program: &str) -> ProcessError {
    ProcessError::Spawn {
        program: program.to_string(),
        source: std::io::Error::from(std::io::ErrorKind::NotFound),
    }
}

pub fn exit_error(program: &str, stderr: &str) -> ProcessError {
    ProcessError::NonZeroExit {
        program: program.to_string(),
        code: Some(255),
        stderr: stderr.to_string(),
    }
}

/// `list-hosted-zones` output for (name, resource id) pairs
pub fn zones_json(zones: &[(&str, &str)]) -> String {
    let zones: Vec<_> = zones
        .iter()
        .map(|(name, id)| serde_json::json!({ "Id": id, "Name": name, "ResourceRecordSetCount": 2 }))
        .collect();
    serde_json::json!({ "HostedZones": zones, "IsTruncated": false, "MaxItems": "100" }).to_string()
}

/// Write an AWS config file into a fresh temp dir
pub fn aws_config(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config");
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}
