use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let env = parse_environment(&or_default("HPBA_ENV", "development"))?;

    let bind_addr = or_default("HPBA_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("HPBA_BIND_ADDR", e.to_string()))?;

    let public_url = parse_base_url(
        "HPBA_PUBLIC_URL",
        &or_default("HPBA_PUBLIC_URL", "http://localhost:3000"),
    )?;
    let log_level = or_default("HPBA_LOG_LEVEL", "info");
    let api_url = parse_base_url(
        "HPBA_API_URL",
        &or_default("HPBA_API_URL", "http://localhost:8000"),
    )?;

    let api_timeout_secs = or_default("HPBA_API_TIMEOUT_SECS", "300")
        .parse::<u64>()
        .map_err(|e| invalid("HPBA_API_TIMEOUT_SECS", e.to_string()))?;

    let idp_url = parse_base_url("HPBA_IDP_URL", &require("HPBA_IDP_URL")?)?;
    let idp_anon_key = require("HPBA_IDP_ANON_KEY")?;
    let idp_oauth_provider = or_default("HPBA_IDP_OAUTH_PROVIDER", "google");

    let allowed_domain =
        parse_allowed_domain(&or_default("HPBA_ALLOWED_DOMAIN", "edge-i.jp"))?;

    let max_pages = match lookup("HPBA_MAX_PAGES") {
        Ok(raw) => Some(raw.parse::<u32>().ok().filter(|n| *n > 0).ok_or_else(|| {
            invalid(
                "HPBA_MAX_PAGES",
                format!("expected a positive integer, got '{raw}'"),
            )
        })?),
        Err(_) => None,
    };

    Ok(AppConfig {
        env,
        bind_addr,
        public_url,
        log_level,
        api_url,
        api_timeout_secs,
        idp_url,
        idp_anon_key,
        idp_oauth_provider,
        allowed_domain,
        max_pages,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "HPBA_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

/// Require an absolute `http(s)` URL and strip any trailing slash.
fn parse_base_url(var: &str, raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_string())
    } else {
        Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected an http(s) URL, got '{raw}'"),
        })
    }
}

/// Accepts `edge-i.jp` or `@edge-i.jp`; stores the bare domain.
fn parse_allowed_domain(raw: &str) -> Result<String, ConfigError> {
    let domain = raw.trim().trim_start_matches('@').to_ascii_lowercase();
    if domain.is_empty() || domain.contains('@') || domain.contains(char::is_whitespace) {
        return Err(ConfigError::InvalidEnvVar {
            var: "HPBA_ALLOWED_DOMAIN".to_string(),
            reason: format!("not a bare email domain: '{raw}'"),
        });
    }
    Ok(domain)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
