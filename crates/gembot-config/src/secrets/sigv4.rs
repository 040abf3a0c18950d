//! AWS Signature Version 4 request signing.
//!
//! Covers exactly what the Secrets Manager JSON-RPC call needs: a POST to
//! `/` with a fixed header set. Key derivation is the standard HMAC-SHA256
//! chain over date, region, service, and `aws4_request`.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const CONTENT_TYPE: &str = "application/x-amz-json-1.1";

/// Static credentials read from the process environment.
pub(crate) struct Credentials {
    pub access_key: String,
    pub secret_key: String,
    pub session_token: Option<String>,
}

impl Credentials {
    pub(crate) fn from_env() -> Option<Self> {
        let access_key = std::env::var("AWS_ACCESS_KEY_ID").ok()?;
        let secret_key = std::env::var("AWS_SECRET_ACCESS_KEY").ok()?;
        Some(Self {
            access_key,
            secret_key,
            session_token: std::env::var("AWS_SESSION_TOKEN").ok(),
        })
    }
}

/// Everything that goes into the signature for one request.
pub(crate) struct SigningRequest {
    pub host: String,
    pub region: String,
    pub service: String,
    pub target: String,
    pub payload: String,
    pub timestamp: DateTime<Utc>,
}

/// Sign a request, returning the headers to attach to it. The `host`
/// header is part of the signature but is left for the HTTP client to set.
pub(crate) fn sign(request: &SigningRequest, creds: &Credentials) -> Vec<(String, String)> {
    let amz_date = request.timestamp.format("%Y%m%dT%H%M%SZ").to_string();
    let date_stamp = request.timestamp.format("%Y%m%d").to_string();

    // Headers in the signature, already sorted by name.
    let mut signed: Vec<(&str, &str)> = vec![
        ("content-type", CONTENT_TYPE),
        ("host", &request.host),
        ("x-amz-date", &amz_date),
    ];
    if let Some(token) = &creds.session_token {
        signed.push(("x-amz-security-token", token));
    }
    signed.push(("x-amz-target", &request.target));

    let canonical_headers: String = signed
        .iter()
        .map(|(name, value)| format!("{name}:{value}\n"))
        .collect();
    let signed_header_names = signed
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(";");

    let payload_hash = hex(&Sha256::digest(request.payload.as_bytes()));
    let canonical_request = format!(
        "POST\n/\n\n{canonical_headers}\n{signed_header_names}\n{payload_hash}"
    );

    let scope = format!(
        "{date_stamp}/{}/{}/aws4_request",
        request.region, request.service
    );
    let string_to_sign = format!(
        "{ALGORITHM}\n{amz_date}\n{scope}\n{}",
        hex(&Sha256::digest(canonical_request.as_bytes()))
    );

    let signing_key = derive_signing_key(
        &creds.secret_key,
        &date_stamp,
        &request.region,
        &request.service,
    );
    let signature = hex(&hmac_sha256(&signing_key, string_to_sign.as_bytes()));

    let authorization = format!(
        "{ALGORITHM} Credential={}/{scope}, SignedHeaders={signed_header_names}, Signature={signature}",
        creds.access_key
    );

    let mut headers = vec![
        ("content-type".to_string(), CONTENT_TYPE.to_string()),
        ("x-amz-date".to_string(), amz_date),
        ("x-amz-target".to_string(), request.target.clone()),
        ("authorization".to_string(), authorization),
    ];
    if let Some(token) = &creds.session_token {
        headers.push(("x-amz-security-token".to_string(), token.clone()));
    }
    headers
}

/// HMAC chain: kSecret -> kDate -> kRegion -> kService -> kSigning.
fn derive_signing_key(secret_key: &str, date_stamp: &str, region: &str, service: &str) -> [u8; 32] {
    let k_date = hmac_sha256(format!("AWS4{secret_key}").as_bytes(), date_stamp.as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    hmac_sha256(&k_service, b"aws4_request")
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> [u8; 32] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}
