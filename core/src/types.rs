//! Records returned by the service and payloads sent to it.
//!
//! # Design
//! Records are decoded all-or-nothing: every field is required and serde
//! fails the whole call on a missing one. Unknown fields are ignored so the
//! service can grow its responses without breaking old clients.
//!
//! Request payloads are typed structs rather than string maps. The wire
//! format stays what the service expects, including `slave_count` as a
//! decimal string.

use serde::{Deserialize, Serialize, Serializer};

/// Region used when a server is created without an explicit one.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Plans the service accepted at the time of writing. The client does not
/// check against this list; the service has the final word.
pub const KNOWN_PLANS: &[&str] = &[
    "minidev", "dev", "basic", "starter", "plus", "large", "xlarge", "2xlarge", "4xlarge",
    "15xlarge", "30xlarge", "60xlarge",
];

/// Regions the service accepted at the time of writing. Not enforced locally.
pub const KNOWN_REGIONS: &[&str] = &[
    "us-east-1",
    "us-west-1",
    "us-west-2",
    "eu-west-1",
    "ap-northeast-1",
    "ap-southeast-1",
    "ap-southeast-2",
    "sa-east-1",
];

/// A single hosted Redis server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Server {
    pub id: String,
    /// User-visible name.
    pub name: String,
    /// Redis connection URL, including password, host and port.
    pub url: String,
    /// Ids of this server's replicas.
    #[serde(rename = "slaves")]
    pub replicas: Vec<String>,
}

/// A monitor watching a Redis instance hosted elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Monitor {
    pub id: String,
    pub name: String,
    /// Full Redis URL being monitored.
    pub url: String,
}

/// Request payload for creating a server.
///
/// New servers can take several minutes to become reachable after the
/// create call returns.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CreateServer {
    pub name: String,
    /// One of [`KNOWN_PLANS`], validated by the service.
    pub plan: String,
    /// One of [`KNOWN_REGIONS`], validated by the service.
    pub region: String,
    #[serde(rename = "slave_count", serialize_with = "as_decimal_string")]
    pub replica_count: u32,
}

impl CreateServer {
    /// A server in [`DEFAULT_REGION`] with no replicas.
    pub fn new(name: impl Into<String>, plan: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            plan: plan.into(),
            region: DEFAULT_REGION.to_string(),
            replica_count: 0,
        }
    }

    pub fn in_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_replicas(mut self, count: u32) -> Self {
        self.replica_count = count;
        self
    }
}

/// Request payload for creating a monitor.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CreateMonitor {
    pub name: String,
    /// Must look like `redis://:password@host:port`; checked by the service.
    pub url: String,
}

impl CreateMonitor {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

fn as_decimal_string<S: Serializer>(value: &u32, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}
