//! Gembot configuration system.
//!
//! Resolves configuration values through a fixed-priority chain:
//!
//! 1. AWS Secrets Manager (when `USE_AWS_SECRETS=true`)
//! 2. Process environment (including values loaded from `.env`)
//! 3. Caller-supplied default
//!
//! The secret bundle is fetched lazily, at most once per [`Config`]
//! instance. Secret-store failures never propagate out of a lookup; they
//! are logged and resolution falls through to the environment.

pub mod dotenv;
pub mod provider;
pub mod secrets;

pub use dotenv::load_dotenv;
pub use provider::Config;
pub use secrets::{AwsSecretsClient, SecretSource};

pub use gembot_common::SecretError;
