//! Configuration types
//!
//! There is no global state: the binaries build these bundles from their
//! command line and pass them down the call chain explicitly.

use crate::error::{Error, Result};
use std::fmt;
use std::net::IpAddr;
use std::path::Path;

/// Cloudflare account credentials (static email + API key)
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Email address on the account
    pub email: String,

    /// API key
    /// ⚠️ NEVER log this value
    key: String,
}

// Custom Debug implementation that hides the API key
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("key", &"<REDACTED>")
            .finish()
    }
}

impl Credentials {
    /// Build credentials from an email and an already loaded key
    ///
    /// The key is trimmed; an empty email or key is a configuration error.
    pub fn new(email: impl Into<String>, key: impl AsRef<str>) -> Result<Self> {
        let credentials = Self {
            email: email.into(),
            key: key.as_ref().trim().to_string(),
        };
        credentials.validate()?;
        Ok(credentials)
    }

    /// Load the API key from a file containing nothing but the key
    pub fn from_key_file(email: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let key = read_key_file(path.as_ref())?;
        Self::new(email, key)
    }

    /// The API key, for building request headers
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Validate the credentials
    pub fn validate(&self) -> Result<()> {
        if self.email.trim().is_empty() {
            return Err(Error::config("You must provide an email"));
        }
        if self.key.is_empty() {
            return Err(Error::config("No API key given"));
        }
        Ok(())
    }
}

/// Read and trim an API key file
pub fn read_key_file(path: &Path) -> Result<String> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::config(format!("Unable to read key file {}: {}", path.display(), e))
    })?;

    let key = content.trim();
    if key.is_empty() {
        return Err(Error::config(format!(
            "No key found in file {}",
            path.display()
        )));
    }

    Ok(key.to_string())
}

/// One reconciliation run of a hostname's A record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    /// Domain (zone name) the host lives in
    pub domain: String,

    /// Fully qualified hostname whose A record is updated
    pub hostname: String,

    /// IP to set; looked up externally when `None`
    pub ip: Option<IpAddr>,

    /// Check the current value via DNS first and skip the API when it matches
    pub only_if_different: bool,

    /// Do everything except the mutating call
    pub dry_run: bool,
}

impl UpdateRequest {
    /// Create a request with the default policy: look up the IP, always
    /// consult the API, really update
    pub fn new(domain: impl Into<String>, hostname: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            hostname: hostname.into(),
            ip: None,
            only_if_different: false,
            dry_run: false,
        }
    }

    /// Use an explicit IP instead of looking one up
    pub fn with_ip(mut self, ip: IpAddr) -> Self {
        self.ip = Some(ip);
        self
    }

    /// Enable or disable change-only mode
    pub fn with_only_if_different(mut self, only_if_different: bool) -> Self {
        self.only_if_different = only_if_different;
        self
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Validate the request
    pub fn validate(&self) -> Result<()> {
        if self.domain.trim().is_empty() {
            return Err(Error::config("You must provide a domain"));
        }
        if self.hostname.trim().is_empty() {
            return Err(Error::config("You must provide a hostname"));
        }
        Ok(())
    }
}
