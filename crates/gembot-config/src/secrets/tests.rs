//! Tests for service-error mapping and secret bundle parsing.

use super::*;

#[test]
fn maps_resource_not_found() {
    let err = map_service_error("ResourceNotFoundException", "gemini_api_key");
    assert!(matches!(err, SecretError::SecretNotFound(_)));
    assert!(err.to_string().contains("gemini_api_key"));
}

#[test]
fn maps_access_denied() {
    let err = map_service_error("AccessDeniedException", "gemini_api_key");
    assert!(matches!(err, SecretError::AccessDenied(_)));
}

#[test]
fn maps_namespaced_error_type() {
    let err = map_service_error(
        "com.amazonaws.secretsmanager#ResourceNotFoundException",
        "gemini_api_key",
    );
    assert!(matches!(err, SecretError::SecretNotFound(_)));
}

#[test]
fn unknown_error_type_becomes_service_error() {
    let err = map_service_error("ThrottlingException", "gemini_api_key");
    assert!(matches!(err, SecretError::Service(_)));
    assert!(err.to_string().contains("ThrottlingException"));
}

#[test]
fn parses_flat_bundle() {
    let bundle = parse_bundle(r#"{"GEMINI_API_KEY":"abc123","GEMINI_MODEL":"gemini-pro"}"#).unwrap();
    assert_eq!(bundle.get("GEMINI_API_KEY").unwrap(), "abc123");
    assert_eq!(bundle.get("GEMINI_MODEL").unwrap(), "gemini-pro");
}

#[test]
fn keeps_non_string_values_as_json() {
    let bundle = parse_bundle(r#"{"MAX_TOKENS":4096}"#).unwrap();
    assert_eq!(bundle.get("MAX_TOKENS").unwrap(), "4096");
}

#[test]
fn rejects_non_object_secret() {
    let err = parse_bundle(r#"["not","an","object"]"#).unwrap_err();
    assert!(matches!(err, SecretError::Parse(_)));
}

#[test]
fn rejects_invalid_json() {
    let err = parse_bundle("not json at all").unwrap_err();
    assert!(matches!(err, SecretError::Parse(_)));
}
