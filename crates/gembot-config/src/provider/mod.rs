//! The configuration provider and its resolution chain.

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::secrets::{AwsSecretsClient, SecretSource};

/// Placeholder default, not a validated model identifier.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

const DEFAULT_SECRET_NAME: &str = "gemini_api_key";
const DEFAULT_REGION: &str = "ap-south-1";

/// Configuration provider.
///
/// Lookup priority: secret bundle (when a source is wired) → process
/// environment → caller default. The bundle is fetched at most once per
/// instance; fetch failures degrade to an empty bundle and are only
/// logged.
pub struct Config {
    source: Option<Box<dyn SecretSource>>,
    secrets: OnceCell<HashMap<String, String>>,
}

impl Config {
    /// Build a provider from the process environment. Cloud mode is
    /// controlled by `USE_AWS_SECRETS`; the secret name and region come
    /// from `AWS_SECRET_NAME` / `AWS_REGION`.
    pub fn from_env() -> Self {
        let use_aws = std::env::var("USE_AWS_SECRETS")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        if use_aws {
            let secret_name = env_or("AWS_SECRET_NAME", DEFAULT_SECRET_NAME);
            let region = env_or("AWS_REGION", DEFAULT_REGION);
            Self::with_source(Box::new(AwsSecretsClient::new(secret_name, region)))
        } else {
            Self::disabled()
        }
    }

    /// Provider with cloud lookups disabled; resolves env → default only.
    pub fn disabled() -> Self {
        Self {
            source: None,
            secrets: OnceCell::new(),
        }
    }

    /// Provider backed by the given secret source.
    pub fn with_source(source: Box<dyn SecretSource>) -> Self {
        Self {
            source: Some(source),
            secrets: OnceCell::new(),
        }
    }

    /// Resolve a configuration value, or `None` when no source has it.
    pub async fn get(&self, key: &str) -> Option<String> {
        if let Some(value) = self.secrets().await.get(key) {
            return Some(value.clone());
        }
        std::env::var(key).ok()
    }

    /// Resolve a configuration value with a fallback default.
    pub async fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).await.unwrap_or_else(|| default.to_string())
    }

    /// The Gemini API key, checking both accepted env names in order.
    /// Empty values count as unset.
    pub async fn gemini_api_key(&self) -> Option<String> {
        for key in ["GEMINI_API_KEY", "TF_VAR_gemini_api_key"] {
            if let Some(value) = self.get(key).await.filter(|v| !v.is_empty()) {
                return Some(value);
            }
        }
        None
    }

    /// The Gemini model name.
    pub async fn gemini_model(&self) -> String {
        self.get_or("GEMINI_MODEL", DEFAULT_MODEL).await
    }

    /// The cached secret bundle, fetched on first use. A failed fetch is
    /// cached as an empty bundle so the store is not retried per lookup.
    async fn secrets(&self) -> &HashMap<String, String> {
        self.secrets
            .get_or_init(|| async {
                let Some(source) = &self.source else {
                    return HashMap::new();
                };
                info!("fetching secrets from cloud store");
                match source.fetch().await {
                    Ok(bundle) => {
                        info!(keys = bundle.len(), "loaded secret bundle");
                        bundle
                    }
                    Err(e) => {
                        warn!(error = %e, "secret store unavailable, falling back to environment");
                        HashMap::new()
                    }
                }
            })
            .await
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
