/// Failures talking to the cloud secret store. Every variant is recoverable:
/// the resolver logs it and falls through to the environment.
#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("no cloud credentials configured")]
    NoCredentials,

    #[error("secret not found: {0}")]
    SecretNotFound(String),

    #[error("access denied to secret: {0}")]
    AccessDenied(String),

    #[error("secret store error: {0}")]
    Service(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("secret parse error: {0}")]
    Parse(String),
}
