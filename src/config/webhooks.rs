//! Webhook routing configuration

use serde::Deserialize;

/// Webhook routing configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct WebhooksConfig {
    /// Refuse to build a webhook handler whose strategies lack a catch-all
    #[serde(default)]
    pub strict_routing: bool,
}
