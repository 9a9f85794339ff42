//! # Ingress Configuration
//!
//! Typed configuration for the webhook ingress layer, loaded through the
//! `config` crate from an optional TOML file plus `ATTACHE`-prefixed
//! environment variables. Environment values override file values; serde
//! defaults cover everything else, so an empty environment yields a valid
//! (but disabled) configuration.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use attache_ingress::config::IngressConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // ATTACHE__WEBHOOK__SECRET=s3cret ATTACHE__WEBHOOK__PORT=8443 ...
//! let config = IngressConfig::load()?;
//! if config.webhook.is_enabled() {
//!     println!("listening on port {}", config.webhook.port);
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;

pub use error::ConfigurationError;

use config::{Config, Environment, File};
use serde::Deserialize;

const ENV_PREFIX: &str = "ATTACHE";
const CONFIG_FILE: &str = "config/ingress";

/// Top-level configuration for the ingress process.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngressConfig {
    #[serde(default)]
    pub webhook: WebhookConfig,
    #[serde(default)]
    pub sms: SmsConfig,
}

/// Webhook server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    /// Shared secret expected in the `X-Webhook-Secret` header. Empty means
    /// the listener is disabled entirely, not open-access.
    #[serde(default)]
    pub secret: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl WebhookConfig {
    /// Whether the ingress server should bind a socket at all.
    pub fn is_enabled(&self) -> bool {
        !self.secret.is_empty()
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            port: default_port(),
            bind_address: default_bind_address(),
        }
    }
}

/// SMS gateway (Telnyx) configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SmsConfig {
    #[serde(default)]
    pub telnyx_api_key: String,
    /// The one phone number whose inbound messages are processed.
    #[serde(default)]
    pub owner_phone: String,
}

impl SmsConfig {
    /// The SMS source is registered only when both the provider credential
    /// and the owner number are present.
    pub fn is_configured(&self) -> bool {
        !self.telnyx_api_key.is_empty() && !self.owner_phone.is_empty()
    }
}

fn default_port() -> u16 {
    8443
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

impl IngressConfig {
    /// Load configuration from `config/ingress.toml` (if present) overlaid
    /// with `ATTACHE`-prefixed environment variables (`__` separator).
    pub fn load() -> Result<Self, ConfigurationError> {
        let settings = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_disable_everything() {
        let config = IngressConfig::default();
        assert!(!config.webhook.is_enabled());
        assert!(!config.sms.is_configured());
        assert_eq!(config.webhook.port, 8443);
        assert_eq!(config.webhook.bind_address, "0.0.0.0");
    }

    #[test]
    fn test_sms_requires_both_credential_and_owner() {
        let mut sms = SmsConfig::default();
        assert!(!sms.is_configured());

        sms.telnyx_api_key = "KEY".to_string();
        assert!(!sms.is_configured());

        sms.owner_phone = "+15551230000".to_string();
        assert!(sms.is_configured());
    }

    #[test]
    fn test_deserialize_from_toml_fragment() {
        let config: IngressConfig = toml_fragment(
            r#"
            [webhook]
            secret = "s3cret"
            port = 9000

            [sms]
            telnyx_api_key = "KEY"
            owner_phone = "+15551230000"
            "#,
        );

        assert!(config.webhook.is_enabled());
        assert_eq!(config.webhook.port, 9000);
        assert_eq!(config.webhook.bind_address, "0.0.0.0");
        assert!(config.sms.is_configured());
    }

    fn toml_fragment(raw: &str) -> IngressConfig {
        Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }
}
