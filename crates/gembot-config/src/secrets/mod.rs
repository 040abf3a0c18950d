//! AWS Secrets Manager secret source.
//!
//! Fetches a secret bundle (a flat JSON object of key/value pairs) with a
//! SigV4-signed `GetSecretValue` call. There is no AWS SDK dependency;
//! the request is a single JSON-RPC POST built with `reqwest` and signed
//! with `hmac`/`sha2`.

mod sigv4;

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::debug;

use gembot_common::SecretError;

use sigv4::{Credentials, SigningRequest};

const SERVICE: &str = "secretsmanager";
const TARGET_GET_SECRET_VALUE: &str = "secretsmanager.GetSecretValue";

/// A source of secret key/value bundles. The resolver only ever sees this
/// trait, so tests can substitute an in-memory or failing source.
#[async_trait]
pub trait SecretSource: Send + Sync {
    async fn fetch(&self) -> Result<HashMap<String, String>, SecretError>;
}

/// AWS Secrets Manager client for a single named secret.
pub struct AwsSecretsClient {
    secret_name: String,
    region: String,
    http: reqwest::Client,
}

impl AwsSecretsClient {
    pub fn new(secret_name: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            secret_name: secret_name.into(),
            region: region.into(),
            http: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("https://{}/", self.host())
    }

    fn host(&self) -> String {
        format!("{}.{}.amazonaws.com", SERVICE, self.region)
    }
}

#[async_trait]
impl SecretSource for AwsSecretsClient {
    async fn fetch(&self) -> Result<HashMap<String, String>, SecretError> {
        let creds = Credentials::from_env().ok_or(SecretError::NoCredentials)?;

        let payload = serde_json::json!({ "SecretId": self.secret_name }).to_string();
        let signing = SigningRequest {
            host: self.host(),
            region: self.region.clone(),
            service: SERVICE.to_string(),
            target: TARGET_GET_SECRET_VALUE.to_string(),
            payload: payload.clone(),
            timestamp: chrono::Utc::now(),
        };
        let headers = sigv4::sign(&signing, &creds);

        debug!(secret = %self.secret_name, region = %self.region, "fetching secret bundle");

        let mut request = self.http.post(self.endpoint()).body(payload);
        for (name, value) in headers {
            request = request.header(name, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SecretError::Network(e.to_string()))?;

        let status = response.status();
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SecretError::Parse(e.to_string()))?;

        if !status.is_success() {
            let error_type = body["__type"].as_str().unwrap_or("Unknown");
            return Err(map_service_error(error_type, &self.secret_name));
        }

        let secret_string = body["SecretString"]
            .as_str()
            .ok_or_else(|| SecretError::Parse("response has no SecretString".to_string()))?;

        parse_bundle(secret_string)
    }
}

/// Map a Secrets Manager `__type` error code onto the closed error set.
/// Types arrive either bare or namespaced (`com.amazon...#Code`).
fn map_service_error(error_type: &str, secret_name: &str) -> SecretError {
    let code = error_type.rsplit('#').next().unwrap_or(error_type);
    match code {
        "ResourceNotFoundException" => SecretError::SecretNotFound(secret_name.to_string()),
        "AccessDeniedException" => SecretError::AccessDenied(secret_name.to_string()),
        other => SecretError::Service(other.to_string()),
    }
}

/// Parse a `SecretString` into a flat key/value map. Non-string JSON
/// values are kept with their JSON rendering.
fn parse_bundle(secret_string: &str) -> Result<HashMap<String, String>, SecretError> {
    let json: serde_json::Value = serde_json::from_str(secret_string)
        .map_err(|e| SecretError::Parse(e.to_string()))?;

    let object = json
        .as_object()
        .ok_or_else(|| SecretError::Parse("secret is not a JSON object".to_string()))?;

    let mut bundle = HashMap::new();
    for (key, value) in object {
        let value = match value.as_str() {
            Some(s) => s.to_string(),
            None => value.to_string(),
        };
        bundle.insert(key.clone(), value);
    }
    Ok(bundle)
}
