//! Origin-based access control.
//!
//! The gate decides, from the caller's `Origin` header alone, whether a
//! request may use the service. An allowed origin is echoed back verbatim in
//! `Access-Control-Allow-Origin`, so credentialed cross-origin calls only
//! succeed for origins the gate accepted.
//!
//! Policy:
//! - allow when local development is enabled and the origin is local-like
//!   (loopback host or a native-app scheme);
//! - allow when an allowed domain is configured and the origin contains it;
//! - deny everything else.
//!
//! An empty allowed domain with local development disabled denies every
//! origin. That is a valid lockdown configuration.

/// Hosts treated as loopback.
const LOCAL_HOST_MARKERS: &[&str] = &["localhost", "127.0.0.1"];

/// Origin schemes used by native app shells.
const NATIVE_APP_SCHEMES: &[&str] = &["capacitor://"];

/// Access policy loaded from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessPolicy {
    /// Domain substring that grants access (e.g. "example.com").
    pub allowed_domain: Option<String>,
    /// Whether local-like origins are accepted.
    pub allow_local: bool,
}

/// Per-request view of the caller's origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginDescriptor {
    pub origin: String,
    pub is_local_like: bool,
}

impl OriginDescriptor {
    /// Build a descriptor from an optional `Origin` header value.
    pub fn from_header(origin: Option<&str>) -> Self {
        let origin = origin.unwrap_or_default().to_string();
        let is_local_like = is_local_like_origin(&origin);
        Self {
            origin,
            is_local_like,
        }
    }
}

/// Outcome of evaluating an origin against the policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Access granted; `echo_origin` goes into `Access-Control-Allow-Origin`.
    Allow { echo_origin: String },
    /// Access denied.
    Deny,
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow { .. })
    }
}

/// Whether an origin looks like a loopback address or a native-app origin.
pub fn is_local_like_origin(origin: &str) -> bool {
    LOCAL_HOST_MARKERS.iter().any(|m| origin.contains(m))
        || NATIVE_APP_SCHEMES.iter().any(|s| origin.starts_with(s))
}

impl AccessPolicy {
    pub fn new(allowed_domain: Option<String>, allow_local: bool) -> Self {
        let allowed_domain = allowed_domain
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        Self {
            allowed_domain,
            allow_local,
        }
    }

    /// True when no origin can ever be allowed.
    pub fn is_lockdown(&self) -> bool {
        self.allowed_domain.is_none() && !self.allow_local
    }

    /// Evaluate a raw `Origin` header value.
    pub fn evaluate(&self, origin: Option<&str>) -> AccessDecision {
        self.evaluate_descriptor(&OriginDescriptor::from_header(origin))
    }

    /// Evaluate a prepared origin descriptor.
    pub fn evaluate_descriptor(&self, descriptor: &OriginDescriptor) -> AccessDecision {
        let local_ok = self.allow_local && descriptor.is_local_like;
        let domain_ok = self
            .allowed_domain
            .as_deref()
            .is_some_and(|domain| descriptor.origin.contains(domain));

        if local_ok || domain_ok {
            AccessDecision::Allow {
                echo_origin: descriptor.origin.clone(),
            }
        } else {
            AccessDecision::Deny
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(domain: &str, local: bool) -> AccessPolicy {
        AccessPolicy::new(Some(domain.to_string()), local)
    }

    #[test]
    fn test_local_like_detection() {
        assert!(is_local_like_origin("http://localhost:5173"));
        assert!(is_local_like_origin("http://127.0.0.1:8080"));
        assert!(is_local_like_origin("capacitor://localhost"));
        assert!(is_local_like_origin("capacitor://app"));
        assert!(!is_local_like_origin("https://example.com"));
        assert!(!is_local_like_origin(""));
    }

    #[test]
    fn test_local_allowed_when_flag_on() {
        let p = AccessPolicy::new(None, true);
        assert_eq!(
            p.evaluate(Some("http://localhost:3000")),
            AccessDecision::Allow {
                echo_origin: "http://localhost:3000".to_string()
            }
        );
    }

    #[test]
    fn test_local_denied_when_flag_off() {
        let p = policy("example.com", false);
        assert_eq!(p.evaluate(Some("http://localhost:3000")), AccessDecision::Deny);
    }

    #[test]
    fn test_domain_substring_allows() {
        let p = policy("example.com", false);
        assert!(p.evaluate(Some("https://example.com")).is_allowed());
        assert!(p.evaluate(Some("https://app.example.com")).is_allowed());
    }

    #[test]
    fn test_unrelated_domain_denied() {
        let p = policy("example.com", true);
        assert_eq!(p.evaluate(Some("https://evil.org")), AccessDecision::Deny);
    }

    #[test]
    fn test_echo_is_caller_origin_not_wildcard() {
        let p = policy("example.com", false);
        match p.evaluate(Some("https://shop.example.com")) {
            AccessDecision::Allow { echo_origin } => {
                assert_eq!(echo_origin, "https://shop.example.com");
                assert_ne!(echo_origin, "*");
            }
            AccessDecision::Deny => panic!("expected allow"),
        }
    }

    #[test]
    fn test_lockdown_denies_everything() {
        let p = AccessPolicy::new(None, false);
        assert!(p.is_lockdown());
        assert_eq!(p.evaluate(Some("http://localhost")), AccessDecision::Deny);
        assert_eq!(p.evaluate(Some("https://example.com")), AccessDecision::Deny);
        assert_eq!(p.evaluate(None), AccessDecision::Deny);
    }

    #[test]
    fn test_blank_domain_is_treated_as_unset() {
        let p = AccessPolicy::new(Some("   ".to_string()), false);
        assert!(p.allowed_domain.is_none());
        assert!(p.is_lockdown());
        // An empty domain must not match every origin via `contains("")`.
        assert_eq!(p.evaluate(Some("https://anything.net")), AccessDecision::Deny);
    }

    #[test]
    fn test_missing_origin_never_local() {
        let p = AccessPolicy::new(None, true);
        assert_eq!(p.evaluate(None), AccessDecision::Deny);
    }

    #[test]
    fn test_descriptor_from_header() {
        let d = OriginDescriptor::from_header(Some("capacitor://localhost"));
        assert!(d.is_local_like);
        assert_eq!(d.origin, "capacitor://localhost");

        let d = OriginDescriptor::from_header(None);
        assert!(!d.is_local_like);
        assert!(d.origin.is_empty());
    }
}
