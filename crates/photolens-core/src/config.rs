//! Service configuration loaded from environment variables.
//!
//! Values are read once at startup. [`ServiceConfig::from_lookup`] takes any
//! key lookup so parsing can be tested without touching the process
//! environment.

use tracing::{debug, warn};

use crate::access::AccessPolicy;
use crate::defaults::{self, *};
use crate::normalize::ValidationMode;
use crate::{Error, Result};

/// Credentials for the media-upload relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub upload_preset: String,
    /// API base, overridable for tests.
    pub base_url: String,
}

impl CloudinaryConfig {
    /// Upload endpoint for images.
    pub fn upload_url(&self) -> String {
        format!(
            "{}/{}/image/upload",
            self.base_url.trim_end_matches('/'),
            self.cloud_name
        )
    }
}

/// Top-level server configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub access: AccessPolicy,
    pub validation_mode: ValidationMode,
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
    /// `None` when the upload relay is not configured.
    pub cloudinary: Option<CloudinaryConfig>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            access: AccessPolicy::default(),
            validation_mode: ValidationMode::default(),
            host: defaults::HOST.to_string(),
            port: defaults::PORT,
            max_body_bytes: defaults::MAX_BODY_BYTES,
            cloudinary: None,
        }
    }
}

/// Parse a boolean flag the way the deployment scripts set them.
pub fn parse_flag(value: Option<&str>) -> bool {
    value
        .map(|v| {
            let v = v.trim();
            v == "1" || v.eq_ignore_ascii_case("true")
        })
        .unwrap_or(false)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl ServiceConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access = AccessPolicy::new(
            non_empty(lookup(ENV_PRIMARY_DOMAIN)),
            parse_flag(lookup(ENV_LOCALHOST).as_deref()),
        );
        if access.is_lockdown() {
            warn!(
                subsystem = "api",
                component = "config",
                "No allowed domain and local origins disabled: every origin will be denied"
            );
        }

        let validation_mode = match non_empty(lookup(ENV_VALIDATION_MODE)) {
            Some(v) => v.parse()?,
            None => ValidationMode::default(),
        };

        let host = non_empty(lookup(ENV_HOST)).unwrap_or_else(|| defaults::HOST.to_string());
        let port = match non_empty(lookup(ENV_PORT)) {
            Some(v) => v
                .parse()
                .map_err(|e| Error::Config(format!("Invalid {} '{}': {}", ENV_PORT, v, e)))?,
            None => defaults::PORT,
        };
        let max_body_bytes = match non_empty(lookup(ENV_MAX_BODY_BYTES)) {
            Some(v) => v.parse().map_err(|e| {
                Error::Config(format!("Invalid {} '{}': {}", ENV_MAX_BODY_BYTES, v, e))
            })?,
            None => defaults::MAX_BODY_BYTES,
        };

        let cloudinary = match (
            non_empty(lookup(ENV_CLOUDINARY_CLOUD_NAME)),
            non_empty(lookup(ENV_CLOUDINARY_UPLOAD_PRESET)),
        ) {
            (Some(cloud_name), Some(upload_preset)) => Some(CloudinaryConfig {
                cloud_name,
                upload_preset,
                base_url: defaults::CLOUDINARY_BASE_URL.to_string(),
            }),
            _ => None,
        };

        debug!(
            subsystem = "api",
            component = "config",
            allowed_domain = access.allowed_domain.as_deref().unwrap_or("(none)"),
            allow_local = access.allow_local,
            validation_mode = validation_mode.as_str(),
            upload_configured = cloudinary.is_some(),
            "Service configuration loaded"
        );

        Ok(Self {
            access,
            validation_mode,
            host,
            port,
            max_body_bytes,
            cloudinary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<ServiceConfig> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServiceConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_are_lockdown() {
        let config = load(&[]).unwrap();
        assert!(config.access.is_lockdown());
        assert_eq!(config.validation_mode, ValidationMode::Strict);
        assert_eq!(config.port, defaults::PORT);
        assert_eq!(config.host, defaults::HOST);
        assert!(config.cloudinary.is_none());
    }

    #[test]
    fn test_access_settings() {
        let config = load(&[(ENV_PRIMARY_DOMAIN, "example.com"), (ENV_LOCALHOST, "true")]).unwrap();
        assert_eq!(config.access.allowed_domain.as_deref(), Some("example.com"));
        assert!(config.access.allow_local);
    }

    #[test]
    fn test_parse_flag_values() {
        assert!(parse_flag(Some("true")));
        assert!(parse_flag(Some("TRUE")));
        assert!(parse_flag(Some("1")));
        assert!(!parse_flag(Some("yes")));
        assert!(!parse_flag(Some("false")));
        assert!(!parse_flag(None));
    }

    #[test]
    fn test_validation_mode_lenient() {
        let config = load(&[(ENV_VALIDATION_MODE, "lenient")]).unwrap();
        assert_eq!(config.validation_mode, ValidationMode::Lenient);
    }

    #[test]
    fn test_invalid_validation_mode_is_config_error() {
        assert!(matches!(
            load(&[(ENV_VALIDATION_MODE, "sometimes")]),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_invalid_port_is_config_error() {
        assert!(matches!(load(&[(ENV_PORT, "http")]), Err(Error::Config(_))));
    }

    #[test]
    fn test_cloudinary_requires_both_values() {
        let config = load(&[(ENV_CLOUDINARY_CLOUD_NAME, "demo")]).unwrap();
        assert!(config.cloudinary.is_none());

        let config = load(&[
            (ENV_CLOUDINARY_CLOUD_NAME, "demo"),
            (ENV_CLOUDINARY_UPLOAD_PRESET, "unsigned"),
        ])
        .unwrap();
        let cloudinary = config.cloudinary.unwrap();
        assert_eq!(
            cloudinary.upload_url(),
            "https://api.cloudinary.com/v1_1/demo/image/upload"
        );
        assert_eq!(cloudinary.upload_preset, "unsigned");
    }
}
