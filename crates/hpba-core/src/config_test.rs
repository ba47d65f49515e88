use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated with valid defaults.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("HPBA_IDP_URL", "https://idp.example.com");
    m.insert("HPBA_IDP_ANON_KEY", "anon-key");
    m
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "HPBA_ENV"));
}

#[test]
fn build_app_config_fails_without_idp_url() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "HPBA_IDP_URL"),
        "expected MissingEnvVar(HPBA_IDP_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_treats_blank_anon_key_as_missing() {
    let mut map = full_env();
    map.insert("HPBA_IDP_ANON_KEY", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "HPBA_IDP_ANON_KEY"),
        "expected MissingEnvVar(HPBA_IDP_ANON_KEY), got: {result:?}"
    );
}

#[test]
fn build_app_config_succeeds_with_defaults() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).expect("config should build");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.public_url, "http://localhost:3000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.api_url, "http://localhost:8000");
    assert_eq!(cfg.api_timeout_secs, 300);
    assert_eq!(cfg.idp_url, "https://idp.example.com");
    assert_eq!(cfg.idp_oauth_provider, "google");
    assert_eq!(cfg.allowed_domain, "edge-i.jp");
    assert!(cfg.max_pages.is_none());
    assert!(!cfg.secure_cookies());
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = full_env();
    map.insert("HPBA_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "HPBA_BIND_ADDR"),
        "expected InvalidEnvVar(HPBA_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn api_url_trailing_slash_is_stripped() {
    let mut map = full_env();
    map.insert("HPBA_API_URL", "https://api.example.com/");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.api_url, "https://api.example.com");
}

#[test]
fn api_url_without_scheme_is_rejected() {
    let mut map = full_env();
    map.insert("HPBA_API_URL", "api.example.com");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "HPBA_API_URL"),
        "expected InvalidEnvVar(HPBA_API_URL), got: {result:?}"
    );
}

#[test]
fn api_timeout_secs_invalid() {
    let mut map = full_env();
    map.insert("HPBA_API_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "HPBA_API_TIMEOUT_SECS"),
        "expected InvalidEnvVar(HPBA_API_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn allowed_domain_leading_at_is_stripped() {
    let mut map = full_env();
    map.insert("HPBA_ALLOWED_DOMAIN", "@Example.co.jp");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.allowed_domain, "example.co.jp");
}

#[test]
fn allowed_domain_with_local_part_is_rejected() {
    let mut map = full_env();
    map.insert("HPBA_ALLOWED_DOMAIN", "user@example.com");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "HPBA_ALLOWED_DOMAIN"),
        "expected InvalidEnvVar(HPBA_ALLOWED_DOMAIN), got: {result:?}"
    );
}

#[test]
fn max_pages_override() {
    let mut map = full_env();
    map.insert("HPBA_MAX_PAGES", "5");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.max_pages, Some(5));
}

#[test]
fn max_pages_zero_is_rejected() {
    let mut map = full_env();
    map.insert("HPBA_MAX_PAGES", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "HPBA_MAX_PAGES"),
        "expected InvalidEnvVar(HPBA_MAX_PAGES), got: {result:?}"
    );
}

#[test]
fn production_uses_secure_cookies() {
    let mut map = full_env();
    map.insert("HPBA_ENV", "production");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.secure_cookies());
}

#[test]
fn debug_redacts_anon_key() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("anon-key"));
    assert!(rendered.contains("[redacted]"));
}
