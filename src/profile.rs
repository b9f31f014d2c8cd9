//! Addressing profiles for host environments
//!
//! A profile turns a host URL into the set of per-instance endpoints that
//! make up its fleet. Which profile applies is decided once from the host's
//! environment classification; callers never branch on domain strings
//! themselves. Adding support for a new environment means adding a variant
//! here, nothing else.

use reqwest::Url;

/// Domain suffixes that select the managed-cloud profile
const MANAGED_CLOUD_DOMAINS: &[&str] = &["gitpod.io"];

/// Fixed access token for managed-cloud workspaces
const MANAGED_CLOUD_TOKEN: &str = "^^LOCAL-testing-123^^";

/// Instance count for a managed-cloud workspace
const MANAGED_CLOUD_INSTANCES: usize = 5;

/// Base URLs for one addressable instance of a host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceEndpoints {
    /// Authenticated REST API base
    pub http: String,
    /// WebSocket stream base
    pub ws: String,
    /// Unauthenticated health-check base
    pub health: String,
}

/// Fully resolved addressing for a host: one endpoint set per instance
/// plus the access token every instance shares.
#[derive(Debug, Clone)]
pub struct FleetPlan {
    pub access_token: String,
    pub instances: Vec<InstanceEndpoints>,
}

/// Addressing scheme for a host environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingProfile {
    /// Cloud workspaces expose each instance on a port-derived subdomain
    /// and ship with a fixed development token.
    ManagedCloud,
    /// Anything else: a single instance on fixed local ports, authenticated
    /// with the user-supplied token.
    LocalCustom,
}

impl AddressingProfile {
    /// Select the profile for an environment classifier
    /// (the last two DNS labels of the host's hostname).
    pub fn classify(environment: &str) -> Self {
        if MANAGED_CLOUD_DOMAINS.contains(&environment) {
            Self::ManagedCloud
        } else {
            Self::LocalCustom
        }
    }

    /// Number of instances this profile addresses per host
    pub fn instance_count(&self) -> usize {
        match self {
            Self::ManagedCloud => MANAGED_CLOUD_INSTANCES,
            Self::LocalCustom => 1,
        }
    }

    /// Resolve the full addressing plan for a host URL.
    ///
    /// Instance numbering in derived endpoints is 1-based to match the
    /// workspace subdomain scheme (`13301-`, `13302-`, ...).
    pub fn resolve(&self, url: &Url, user_token: &str) -> FleetPlan {
        let host = url.host_str().unwrap_or_default();

        let access_token = match self {
            Self::ManagedCloud => MANAGED_CLOUD_TOKEN.to_string(),
            Self::LocalCustom => user_token.to_string(),
        };

        let instances = (1..=self.instance_count())
            .map(|i| self.instance_endpoints(host, i))
            .collect();

        FleetPlan {
            access_token,
            instances,
        }
    }

    fn instance_endpoints(&self, host: &str, index: usize) -> InstanceEndpoints {
        match self {
            Self::ManagedCloud => InstanceEndpoints {
                http: format!("https://1330{}-{}", index, host),
                ws: format!("wss://1950{}-{}", index, host),
                health: format!("https://1808{}-{}", index, host),
            },
            Self::LocalCustom => InstanceEndpoints {
                http: format!("http://{}:3001", host),
                ws: format!("ws://{}:3000", host),
                health: format!("http://{}:8080", host),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_managed_cloud() {
        assert_eq!(
            AddressingProfile::classify("gitpod.io"),
            AddressingProfile::ManagedCloud
        );
    }

    #[test]
    fn test_classify_fallback() {
        assert_eq!(
            AddressingProfile::classify("localhost"),
            AddressingProfile::LocalCustom
        );
        assert_eq!(
            AddressingProfile::classify("example.com"),
            AddressingProfile::LocalCustom
        );
    }

    #[test]
    fn test_managed_cloud_plan() {
        let url = Url::parse("https://foo-bar-baz.ws-eu31.gitpod.io/").unwrap();
        let plan = AddressingProfile::ManagedCloud.resolve(&url, "ignored");

        assert_eq!(plan.access_token, "^^LOCAL-testing-123^^");
        assert_eq!(plan.instances.len(), 5);
        assert_eq!(
            plan.instances[0].http,
            "https://13301-foo-bar-baz.ws-eu31.gitpod.io"
        );
        assert_eq!(
            plan.instances[4].ws,
            "wss://19505-foo-bar-baz.ws-eu31.gitpod.io"
        );
        assert_eq!(
            plan.instances[2].health,
            "https://18083-foo-bar-baz.ws-eu31.gitpod.io"
        );
    }

    #[test]
    fn test_local_custom_plan() {
        let url = Url::parse("http://localhost").unwrap();
        let plan = AddressingProfile::LocalCustom.resolve(&url, "my-token");

        assert_eq!(plan.access_token, "my-token");
        assert_eq!(plan.instances.len(), 1);
        assert_eq!(plan.instances[0].http, "http://localhost:3001");
        assert_eq!(plan.instances[0].ws, "ws://localhost:3000");
        assert_eq!(plan.instances[0].health, "http://localhost:8080");
    }
}
