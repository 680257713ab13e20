//! Configuration types for the Mentos service.
//!
//! Configuration is read from `mentos.json`. Every field has a default, so
//! a missing file or an empty object yields a runnable local setup.

use std::collections::HashSet;
use std::path::Path;

use axum::http::HeaderName;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// The default config file name.
const CONFIG_FILE_NAME: &str = "mentos.json";

/// Loose shape check for mail addresses: one `@`, no whitespace, a dot in the domain.
#[allow(clippy::unwrap_used)]
static MAIL_ADDRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    8080
}

/// Header set by the authenticating gateway with the caller's member id.
fn default_identity_header() -> String {
    "x-member-id".to_string()
}

fn default_complaint_recipient() -> String {
    "report@mentos.app".to_string()
}

/// Main configuration for the Mentos service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Address the HTTP server binds to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the HTTP server listens on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request header carrying the authenticated member id.
    #[serde(default = "default_identity_header")]
    pub identity_header: String,

    /// Mailbox that receives complaint reports.
    #[serde(default = "default_complaint_recipient")]
    pub complaint_recipient: String,

    /// Members known to the in-memory record store at startup.
    #[serde(default)]
    pub members: Vec<MemberSeed>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            identity_header: default_identity_header(),
            complaint_recipient: default_complaint_recipient(),
            members: Vec::new(),
        }
    }
}

/// A member registered at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSeed {
    /// Member id, as carried in the identity header.
    pub id: i64,
    /// Display nickname.
    pub nickname: String,
}

impl Config {
    /// Loads configuration from `mentos.json` in a specific directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is invalid.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        Self::load_from_file(&dir.join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from a specific file path.
    ///
    /// If the file does not exist, returns the default configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if the file cannot be read or is not valid
    /// JSON, and `ConfigError::Validation` if a value is out of range.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(e) => {
                return Err(ConfigError::parse(path, format!("failed to read file: {e}")));
            }
        };

        let config: Self =
            serde_json::from_str(&contents).map_err(|e| ConfigError::parse(path, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values, reporting the first violation.
    ///
    /// Checks that:
    /// - `host` is not empty
    /// - `identityHeader` is a valid HTTP header name
    /// - `complaintRecipient` looks like a mail address
    /// - every member has a positive, unique id and a non-empty nickname
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any check fails.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::validation(
                "host must not be empty",
                "Set host to an address such as 127.0.0.1 in your mentos.json",
            ));
        }

        if HeaderName::from_bytes(self.identity_header.as_bytes()).is_err() {
            return Err(ConfigError::validation(
                format!("identityHeader '{}' is not a valid header name", self.identity_header),
                "Use a lowercase token such as x-member-id",
            ));
        }

        if !MAIL_ADDRESS.is_match(&self.complaint_recipient) {
            return Err(ConfigError::validation(
                format!(
                    "complaintRecipient '{}' is not a mail address",
                    self.complaint_recipient
                ),
                "Set complaintRecipient to the moderators' mailbox, e.g. report@mentos.app",
            ));
        }

        let mut seen = HashSet::new();
        for member in &self.members {
            if member.id <= 0 {
                return Err(ConfigError::validation(
                    format!("member id {} must be positive", member.id),
                    "Member ids start at 1",
                ));
            }
            if member.nickname.trim().is_empty() {
                return Err(ConfigError::validation(
                    format!("member {} has an empty nickname", member.id),
                    "Give every entry in members a nickname",
                ));
            }
            if !seen.insert(member.id) {
                return Err(ConfigError::validation(
                    format!("member id {} is listed more than once", member.id),
                    "Remove the duplicate entry from members",
                ));
            }
        }

        Ok(())
    }

    /// The `host:port` string the server binds to.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
