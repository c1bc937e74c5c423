//! Error types for cfdns
//!
//! Every fallible operation in the workspace returns [`Error`]. Each layer
//! adds what it was attempting with [`ResultExt::context`], so the message a
//! user finally sees reads as a chain from the outermost step down to the
//! underlying cause.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias for cfdns operations
pub type Result<T> = std::result::Result<T, Error>;

/// A single `(code, message)` pair from a Cloudflare response envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

impl fmt::Display for ApiErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Code {}: {}", self.code, self.message)
    }
}

/// Joins the provider's error list the way it is shown to users.
pub fn join_api_errors(errors: &[ApiErrorDetail]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn payload_suffix(payload: &Option<String>) -> String {
    match payload {
        Some(p) => format!(". Payload: {}", p),
        None => String::new(),
    }
}

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid configuration (CLI input, credential file)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A caller passed an argument the operation cannot work with
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// HTTP transport failure talking to the provider
    #[error("Request problem: {0}")]
    Request(String),

    /// Response body could not be decoded
    #[error("JSON decoding problem: {0}")]
    Decode(String),

    /// The provider answered with `success: false`
    #[error("{operation} error: {}{}", join_api_errors(.errors), payload_suffix(.payload))]
    Api {
        /// Operation that failed (e.g. "List zones")
        operation: String,
        /// Errors reported by the provider
        errors: Vec<ApiErrorDetail>,
        /// Request body that was rejected, when there was one
        payload: Option<String>,
    },

    /// External IP lookup failed
    #[error("IP lookup failed: {0}")]
    Lookup(String),

    /// No usable `nameserver` line in the resolver configuration
    #[error("No resolver found: {0}")]
    NoResolverFound(String),

    /// DNS transport failure
    #[error("Unable to perform lookup: {0}")]
    Query(String),

    /// The nameserver answered with a non-success response code
    #[error("Lookup problem: {0}")]
    Resolution(String),

    /// Direct DNS query returned no A record for the host
    #[error("Unable to determine current record IP via DNS: no A records found for {hostname}")]
    NoCurrentRecord { hostname: String },

    /// Direct DNS query returned several A records for the host
    #[error("There are {count} A records for {hostname}. Unable to update.")]
    AmbiguousCurrentRecord { hostname: String, count: usize },

    /// No provider record matched the hostname and type
    #[error("Record not found for {hostname}. No update performed.")]
    RecordNotFound { hostname: String },

    /// Several provider records matched the hostname and type
    #[error("{count} matching records found for {hostname}. Unable to perform update.")]
    AmbiguousRecord { hostname: String, count: usize },

    /// No zone matched the domain
    #[error("Zone not found for domain: {domain}")]
    ZoneNotFound { domain: String },

    /// Several zones matched the domain
    #[error("{count} zones found for domain {domain}. Unable to choose one.")]
    AmbiguousZone { domain: String, count: usize },

    /// An error with the step that was being attempted
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a request (HTTP transport) error
    pub fn request(msg: impl Into<String>) -> Self {
        Self::Request(msg.into())
    }

    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create an API error from the provider's error list
    pub fn api(operation: impl Into<String>, errors: Vec<ApiErrorDetail>) -> Self {
        Self::Api {
            operation: operation.into(),
            errors,
            payload: None,
        }
    }

    /// Create an external IP lookup error
    pub fn lookup(msg: impl Into<String>) -> Self {
        Self::Lookup(msg.into())
    }

    /// Create a DNS query (transport) error
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Create a DNS resolution error
    pub fn resolution(msg: impl Into<String>) -> Self {
        Self::Resolution(msg.into())
    }

    /// Wrap this error with the step that was being attempted
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, looking through any context wrappers
    pub fn root(&self) -> &Error {
        match self {
            Self::Context { source, .. } => source.root(),
            other => other,
        }
    }

    /// True when exactly one record, address or zone was required but
    /// zero or several were found
    pub fn is_cardinality(&self) -> bool {
        matches!(
            self.root(),
            Self::NoCurrentRecord { .. }
                | Self::AmbiguousCurrentRecord { .. }
                | Self::RecordNotFound { .. }
                | Self::AmbiguousRecord { .. }
                | Self::ZoneNotFound { .. }
                | Self::AmbiguousZone { .. }
        )
    }

    /// True for transport-level failures (HTTP, DNS, IP lookup)
    pub fn is_transport(&self) -> bool {
        matches!(
            self.root(),
            Self::Request(_) | Self::Query(_) | Self::Lookup(_)
        )
    }
}

/// Adds step context to fallible results
pub trait ResultExt<T> {
    /// Wrap the error, if any, with `context`
    fn context(self, context: &str) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: &str) -> Result<T> {
        self.map_err(|e| e.context(context))
    }
}
