use crate::dashboard::{DashboardLinks, DEFAULT_RECENT_PAID_WINDOW_DAYS};
use secrecy::Secret;
use serde::Deserialize;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub gateway: GatewaySettings,
    pub dashboard: DashboardSettings,
    #[serde(default)]
    pub observability: ObservabilitySettings,
}

#[derive(Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Directory served under `/static`.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    /// Mark the session cookie `Secure`; enable behind HTTPS.
    #[serde(default)]
    pub secure_cookies: bool,
    #[serde(default = "default_session_idle_hours")]
    pub session_idle_hours: i64,
}

fn default_static_dir() -> String {
    "client-portal/static".to_string()
}

fn default_session_idle_hours() -> i64 {
    24
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GatewayKind {
    /// Hosted auth + REST data API.
    #[default]
    Rest,
    /// Local JSON fixture, for demos.
    Fixture,
}

#[derive(Deserialize, Clone)]
pub struct GatewaySettings {
    #[serde(default)]
    pub kind: GatewayKind,
    /// Base URL of the backend project, e.g. https://project.example.co
    #[serde(default)]
    pub url: String,
    /// Public (anon) API key sent as `apikey` on every request.
    #[serde(default)]
    pub anon_key: Option<Secret<String>>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub fixture_path: Option<String>,
}

fn default_request_timeout_secs() -> u64 {
    10
}

#[derive(Deserialize, Clone, Debug)]
pub struct DashboardSettings {
    #[serde(default = "default_recent_paid_window_days")]
    pub recent_paid_window_days: u32,
    #[serde(default = "default_invoice_limit")]
    pub invoice_limit: usize,
    pub support_email: String,
    pub billing_email: String,
    #[serde(default = "default_avatar_base_url")]
    pub avatar_base_url: String,
}

fn default_recent_paid_window_days() -> u32 {
    DEFAULT_RECENT_PAID_WINDOW_DAYS
}

fn default_invoice_limit() -> usize {
    10
}

fn default_avatar_base_url() -> String {
    "https://api.dicebear.com/7.x/initials/svg".to_string()
}

impl DashboardSettings {
    pub fn links(&self) -> DashboardLinks {
        DashboardLinks {
            support_email: self.support_email.clone(),
            billing_email: self.billing_email.clone(),
            avatar_base_url: self.avatar_base_url.clone(),
        }
    }

    /// Origin (scheme + host) of the avatar service, for the page CSP.
    pub fn avatar_origin(&self) -> Option<String> {
        let url = reqwest::Url::parse(&self.avatar_base_url).ok()?;
        let origin = url.origin();
        origin.is_tuple().then(|| origin.ascii_serialization())
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct ObservabilitySettings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// OTLP/gRPC collector; spans are exported only when set.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

impl Default for ObservabilitySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path =
        std::env::current_dir().map_err(|e| config::ConfigError::Foreign(Box::new(e)))?;

    // Run either from the workspace root or from inside client-portal.
    let configuration_directory = if base_path.ends_with("client-portal") {
        base_path.join("config")
    } else {
        base_path.join("client-portal").join("config")
    };

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn parse(yaml: &str) -> Settings {
        config::Config::builder()
            .add_source(config::File::from_str(yaml, config::FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn applies_defaults() {
        let settings = parse(
            r#"
server:
  host: 127.0.0.1
  port: 3000
gateway:
  url: https://backend.example
  anon_key: anon
dashboard:
  support_email: support@example.com
  billing_email: billing@example.com
"#,
        );

        assert_eq!(settings.gateway.kind, GatewayKind::Rest);
        assert_eq!(
            settings.gateway.anon_key.as_ref().map(|k| k.expose_secret().as_str()),
            Some("anon")
        );
        assert_eq!(settings.dashboard.recent_paid_window_days, 30);
        assert_eq!(settings.dashboard.invoice_limit, 10);
        assert_eq!(settings.server.session_idle_hours, 24);
        assert_eq!(settings.observability.log_level, "info");
        assert!(settings.observability.otlp_endpoint.is_none());
    }

    #[test]
    fn overrides_window_and_limit() {
        let settings = parse(
            r#"
server: { host: 0.0.0.0, port: 8080 }
gateway: { kind: fixture, fixture_path: fixtures/demo.json }
dashboard:
  recent_paid_window_days: 14
  invoice_limit: 25
  support_email: s@example.com
  billing_email: b@example.com
"#,
        );

        assert_eq!(settings.gateway.kind, GatewayKind::Fixture);
        assert_eq!(settings.dashboard.recent_paid_window_days, 14);
        assert_eq!(settings.dashboard.invoice_limit, 25);
    }

    #[test]
    fn avatar_origin_strips_path() {
        let settings = parse(
            r#"
server: { host: 0.0.0.0, port: 8080 }
gateway: { kind: fixture }
dashboard:
  support_email: s@example.com
  billing_email: b@example.com
"#,
        );

        assert_eq!(
            settings.dashboard.avatar_origin().as_deref(),
            Some("https://api.dicebear.com")
        );
    }
}
