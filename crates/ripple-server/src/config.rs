//! Configuration loading: optional TOML file, then `RIPPLE_*` environment
//! overrides. The result is immutable for the life of the process.

use std::path::Path;

use anyhow::Context;

use ripple_core::RippleConfig;

/// Load configuration from `$RIPPLE_CONFIG` (or `ripple.toml` if present)
/// and apply environment overrides.
pub fn load() -> anyhow::Result<RippleConfig> {
    let explicit = std::env::var("RIPPLE_CONFIG").ok();
    let path = explicit.as_deref().unwrap_or("ripple.toml");

    let mut config = if Path::new(path).exists() {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {path}"))?;
        toml::from_str(&raw).with_context(|| format!("failed to parse config file {path}"))?
    } else if explicit.is_some() {
        anyhow::bail!("config file {path} does not exist");
    } else {
        RippleConfig::default()
    };

    apply_env_overrides(&mut config);

    if config.upstream_base_url.is_empty() {
        anyhow::bail!("upstream_base_url is required (set it in the config file or RIPPLE_UPSTREAM_BASE_URL)");
    }
    Ok(config)
}

fn apply_env_overrides(config: &mut RippleConfig) {
    if let Ok(url) = std::env::var("RIPPLE_UPSTREAM_BASE_URL") {
        config.upstream_base_url = url;
    }
    if let Some(addr) = env_string("RIPPLE_LISTEN_ADDR") {
        config.listen_addr = Some(addr);
    }
    if let Some(path) = env_string("RIPPLE_DECISION_LOG_PATH") {
        config.decision_log_path = Some(path);
    }
    if let Some(ms) = env_parse("RIPPLE_REQUEST_TIMEOUT_MS") {
        config.request_timeout_ms = Some(ms);
    }
    if let Some(ms) = env_parse("RIPPLE_UPSTREAM_TIMEOUT_MS") {
        config.upstream_timeout_ms = Some(ms);
    }
    if let Some(depth) = env_parse("RIPPLE_MAX_TRAVERSAL_DEPTH") {
        config.max_traversal_depth = Some(depth);
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    match std::env::var(key) {
        Ok(raw) => match raw.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(key, raw, "ignoring unparseable environment override");
                None
            }
        },
        Err(_) => None,
    }
}
