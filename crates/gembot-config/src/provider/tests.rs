//! Tests for the resolution chain: bundle priority, env fallback,
//! derived accessors, and non-propagating secret-store failures.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serial_test::serial;

use gembot_common::SecretError;

use super::*;
use crate::secrets::SecretSource;

struct StaticSource(HashMap<String, String>);

#[async_trait]
impl SecretSource for StaticSource {
    async fn fetch(&self) -> Result<HashMap<String, String>, SecretError> {
        Ok(self.0.clone())
    }
}

struct FailingSource(fn() -> SecretError);

#[async_trait]
impl SecretSource for FailingSource {
    async fn fetch(&self) -> Result<HashMap<String, String>, SecretError> {
        Err((self.0)())
    }
}

struct CountingSource {
    bundle: HashMap<String, String>,
    fetches: Arc<AtomicUsize>,
}

#[async_trait]
impl SecretSource for CountingSource {
    async fn fetch(&self) -> Result<HashMap<String, String>, SecretError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.bundle.clone())
    }
}

fn bundle(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
#[serial]
async fn bundled_key_shadows_environment() {
    std::env::set_var("RESOLVER_TEST_SHADOWED", "from_env");
    let config = Config::with_source(Box::new(StaticSource(bundle(&[(
        "RESOLVER_TEST_SHADOWED",
        "from_bundle",
    )]))));

    assert_eq!(
        config.get("RESOLVER_TEST_SHADOWED").await.unwrap(),
        "from_bundle"
    );
    std::env::remove_var("RESOLVER_TEST_SHADOWED");
}

#[tokio::test]
#[serial]
async fn missing_bundle_key_falls_back_to_env() {
    std::env::set_var("RESOLVER_TEST_ENV_ONLY", "from_env");
    let config = Config::with_source(Box::new(StaticSource(bundle(&[("OTHER", "x")]))));

    assert_eq!(
        config.get("RESOLVER_TEST_ENV_ONLY").await.unwrap(),
        "from_env"
    );
    std::env::remove_var("RESOLVER_TEST_ENV_ONLY");
}

#[tokio::test]
#[serial]
async fn unset_key_returns_default() {
    std::env::remove_var("RESOLVER_TEST_UNSET");
    let config = Config::disabled();

    assert_eq!(config.get("RESOLVER_TEST_UNSET").await, None);
    assert_eq!(
        config.get_or("RESOLVER_TEST_UNSET", "fallback").await,
        "fallback"
    );
}

#[tokio::test]
#[serial]
async fn disabled_provider_reads_env() {
    std::env::set_var("RESOLVER_TEST_DISABLED", "from_env");
    let config = Config::disabled();

    assert_eq!(
        config.get("RESOLVER_TEST_DISABLED").await.unwrap(),
        "from_env"
    );
    std::env::remove_var("RESOLVER_TEST_DISABLED");
}

#[tokio::test]
#[serial]
async fn api_key_uses_tf_var_fallback() {
    std::env::remove_var("GEMINI_API_KEY");
    std::env::set_var("TF_VAR_gemini_api_key", "tf-key");
    let config = Config::disabled();

    assert_eq!(config.gemini_api_key().await.unwrap(), "tf-key");
    std::env::remove_var("TF_VAR_gemini_api_key");
}

#[tokio::test]
#[serial]
async fn api_key_prefers_primary_name() {
    std::env::set_var("GEMINI_API_KEY", "primary-key");
    std::env::set_var("TF_VAR_gemini_api_key", "tf-key");
    let config = Config::disabled();

    assert_eq!(config.gemini_api_key().await.unwrap(), "primary-key");
    std::env::remove_var("GEMINI_API_KEY");
    std::env::remove_var("TF_VAR_gemini_api_key");
}

#[tokio::test]
#[serial]
async fn empty_api_key_counts_as_unset() {
    std::env::set_var("GEMINI_API_KEY", "");
    std::env::set_var("TF_VAR_gemini_api_key", "tf-key");
    let config = Config::disabled();

    assert_eq!(config.gemini_api_key().await.unwrap(), "tf-key");
    std::env::remove_var("GEMINI_API_KEY");
    std::env::remove_var("TF_VAR_gemini_api_key");
}

#[tokio::test]
#[serial]
async fn model_default_applies() {
    std::env::remove_var("GEMINI_MODEL");
    let config = Config::disabled();

    assert_eq!(config.gemini_model().await, DEFAULT_MODEL);

    std::env::set_var("GEMINI_MODEL", "gemini-pro");
    assert_eq!(Config::disabled().gemini_model().await, "gemini-pro");
    std::env::remove_var("GEMINI_MODEL");
}

#[tokio::test]
#[serial]
async fn store_failures_never_propagate() {
    std::env::set_var("RESOLVER_TEST_RECOVER", "from_env");

    let failures: [fn() -> SecretError; 3] = [
        || SecretError::NoCredentials,
        || SecretError::SecretNotFound("gemini_api_key".into()),
        || SecretError::AccessDenied("gemini_api_key".into()),
    ];
    for failure in failures {
        let config = Config::with_source(Box::new(FailingSource(failure)));
        assert_eq!(
            config.get("RESOLVER_TEST_RECOVER").await.unwrap(),
            "from_env"
        );
    }

    std::env::remove_var("RESOLVER_TEST_RECOVER");
}

#[tokio::test]
async fn bundle_is_fetched_at_most_once() {
    let fetches = Arc::new(AtomicUsize::new(0));
    let config = Config::with_source(Box::new(CountingSource {
        bundle: bundle(&[("CACHED_KEY", "value")]),
        fetches: fetches.clone(),
    }));

    assert_eq!(config.get("CACHED_KEY").await.unwrap(), "value");
    assert_eq!(config.get("CACHED_KEY").await.unwrap(), "value");
    assert_eq!(config.get_or("CACHED_KEY", "d").await, "value");
    assert_eq!(fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
#[serial]
async fn from_env_respects_use_aws_secrets_flag() {
    std::env::remove_var("USE_AWS_SECRETS");
    std::env::set_var("RESOLVER_TEST_FROM_ENV", "plain");

    let config = Config::from_env();
    assert_eq!(
        config.get("RESOLVER_TEST_FROM_ENV").await.unwrap(),
        "plain"
    );

    std::env::remove_var("RESOLVER_TEST_FROM_ENV");
}
