//! Device configuration
//!
//! [`DeviceConfig`] is what the host application supplies (typically
//! deserialized from its own config format); [`DeviceConfig::validate`]
//! turns it into a [`SessionConfig`] or rejects it with
//! [`Error::InvalidConfig`] before any session is created.

use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;

use crate::{
    error::Error,
    transport::{Credential, TlsPolicy},
};

/// Host-supplied description of one device to consume.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceConfig {
    /// Device URL; a missing scheme defaults to `http://`.
    pub base_url: String,

    /// Session name, also the key for later lookups.
    pub name: Option<String>,

    #[serde(default)]
    pub auth_type: AuthType,

    pub username: Option<String>,

    pub password: Option<String>,

    pub token: Option<String>,

    /// Header name for `api_key` auth, defaults to `X-API-Key`.
    pub api_key_header: Option<String>,

    pub api_key: Option<String>,

    /// Seconds between polling cycles; must be positive when given.
    pub poll_interval: Option<u64>,

    #[serde(default)]
    pub ssl_verify: SslVerify,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthType {
    #[default]
    None,
    Basic,
    Bearer,
    ApiKey,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SslVerify {
    #[default]
    Strict,
    Disabled,
}

/// A validated, normalized session configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    pub name: String,
    /// Absolute http(s) URL without a trailing slash.
    pub base_url: String,
    pub credential: Credential,
    pub poll_interval: Option<Duration>,
    pub tls: TlsPolicy,
}

impl DeviceConfig {
    /// Checks and normalizes the configuration.
    ///
    /// The base URL must be http or https with a host; credential fields
    /// required by `auth_type` must be present.
    pub fn validate(&self) -> Result<SessionConfig, Error> {
        let raw = self.base_url.trim();
        if raw.is_empty() {
            return Err(Error::InvalidConfig("base_url is empty".to_string()));
        }
        let with_scheme = if raw.contains("://") {
            raw.to_string()
        } else {
            format!("http://{raw}")
        };

        let url = Url::parse(&with_scheme)
            .map_err(|err| Error::InvalidConfig(format!("base_url \"{raw}\": {err}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::InvalidConfig(format!(
                "base_url scheme \"{}\" is not http or https",
                url.scheme()
            )));
        }
        if url.host_str().is_none() {
            return Err(Error::InvalidConfig(format!("base_url \"{raw}\" has no host")));
        }

        let poll_interval = match self.poll_interval {
            Some(0) => {
                return Err(Error::InvalidConfig("poll_interval must be positive".to_string()));
            }
            Some(seconds) => Some(Duration::from_secs(seconds)),
            None => None,
        };

        let credential = self.credential()?;

        let tls = match self.ssl_verify {
            SslVerify::Strict => TlsPolicy::Strict,
            SslVerify::Disabled => TlsPolicy::Disabled,
        };

        Ok(SessionConfig {
            name: self
                .name
                .clone()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| "WoT Device".to_string()),
            base_url: with_scheme.trim_end_matches('/').to_string(),
            credential,
            poll_interval,
            tls,
        })
    }

    fn credential(&self) -> Result<Credential, Error> {
        match self.auth_type {
            AuthType::None => Ok(Credential::None),
            AuthType::Basic => {
                let (Some(username), Some(password)) = (&self.username, &self.password) else {
                    return Err(Error::InvalidConfig(
                        "basic auth requires username and password".to_string(),
                    ));
                };
                Ok(Credential::Basic {
                    username: username.clone(),
                    password: password.clone(),
                })
            }
            AuthType::Bearer => {
                let Some(token) = &self.token else {
                    return Err(Error::InvalidConfig("bearer auth requires a token".to_string()));
                };
                Ok(Credential::Bearer { token: token.clone() })
            }
            AuthType::ApiKey => {
                let Some(key) = &self.api_key else {
                    return Err(Error::InvalidConfig("api_key auth requires a key".to_string()));
                };
                Ok(Credential::ApiKey {
                    header: self
                        .api_key_header
                        .clone()
                        .unwrap_or_else(|| "X-API-Key".to_string()),
                    key: key.clone(),
                })
            }
        }
    }
}
