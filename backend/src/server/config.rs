//! Application settings loaded via OrthoConfig.
//!
//! Every knob can come from CLI arguments, `BHULEKH_*` environment
//! variables or a configuration file, layered in that order. Accessors
//! apply the documented defaults so the rest of the server never sees an
//! `Option`.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error as ThisError;

use crate::domain::{Caller, FeePolicy, OwnerId, DEFAULT_MAX_UPLOAD_BYTES};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Configuration values for the land-records backend.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BHULEKH")]
pub struct AppSettings {
    /// Socket address to bind, e.g. `0.0.0.0:8080`.
    pub bind_addr: Option<String>,
    /// Upload ceiling in bytes (default 10 MiB).
    pub max_upload_bytes: Option<u64>,
    /// Stamp duty rate in basis points of assessed value (default 500).
    pub stamp_duty_bp: Option<u64>,
    /// Registration fee rate in basis points of assessed value (default 100).
    pub registration_fee_bp: Option<u64>,
    /// Assessed value per square foot in INR (default 3500).
    pub value_rate_inr_per_sqft: Option<u64>,
    /// Bearer-token directory entries, `token=owner-id` or
    /// `token=owner-id:registrar`.
    pub auth_tokens: Option<Vec<String>>,
}

/// Errors raised while interpreting settings values.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum SettingsError {
    /// The bind address does not parse as `host:port`.
    #[error("invalid bind address {value:?}")]
    InvalidBindAddr {
        /// The offending value.
        value: String,
    },
    /// An auth token entry does not match `token=owner-id[:registrar]`.
    #[error("invalid auth token entry {entry:?}: {reason}")]
    InvalidTokenEntry {
        /// The offending entry.
        entry: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl AppSettings {
    /// The socket address to bind, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse()
            .map_err(|_| SettingsError::InvalidBindAddr {
                value: raw.to_owned(),
            })
    }

    /// Upload ceiling in bytes.
    #[must_use]
    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES)
    }

    /// Fee schedule assembled from the configured rates.
    #[must_use]
    pub fn fee_policy(&self) -> FeePolicy {
        let defaults = FeePolicy::default();
        FeePolicy {
            stamp_duty_bp: self.stamp_duty_bp.unwrap_or(defaults.stamp_duty_bp),
            registration_fee_bp: self
                .registration_fee_bp
                .unwrap_or(defaults.registration_fee_bp),
            value_rate_inr_per_sqft: self
                .value_rate_inr_per_sqft
                .unwrap_or(defaults.value_rate_inr_per_sqft),
        }
    }

    /// Parse the configured token directory entries.
    pub fn token_entries(&self) -> Result<Vec<(String, Caller)>, SettingsError> {
        self.auth_tokens
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|entry| parse_token_entry(entry))
            .collect()
    }
}

fn parse_token_entry(entry: &str) -> Result<(String, Caller), SettingsError> {
    let invalid = |reason: &str| SettingsError::InvalidTokenEntry {
        entry: entry.to_owned(),
        reason: reason.to_owned(),
    };

    let (token, rest) = entry
        .split_once('=')
        .ok_or_else(|| invalid("expected token=owner-id"))?;
    if token.trim().is_empty() {
        return Err(invalid("token must not be empty"));
    }

    let (owner, registrar) = match rest.split_once(':') {
        Some((owner, "registrar")) => (owner, true),
        Some((_, role)) => {
            return Err(invalid(&format!("unknown role {role:?}")));
        }
        None => (rest, false),
    };
    let owner_id = OwnerId::new(owner).map_err(|err| invalid(&err.to_string()))?;

    let caller = if registrar {
        Caller::registrar(owner_id)
    } else {
        Caller::citizen(owner_id)
    };
    Ok((token.to_owned(), caller))
}
