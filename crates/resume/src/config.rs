//! Renderer configuration loaded from environment variables and `.env`

use crate::{ResumeError, Result};
use std::time::Duration;

pub const FETCH_TIMEOUT_VAR: &str = "RESUME_FETCH_TIMEOUT_SECS";
pub const USER_AGENT_VAR: &str = "RESUME_USER_AGENT";
pub const COMPRESS_VAR: &str = "RESUME_COMPRESS";

/// Settings shared by every render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeConfig {
    /// Upper bound on a remote profile image fetch
    pub fetch_timeout: Duration,
    pub user_agent: String,
    /// Flate-compress page content
    pub compress: bool,
}

impl Default for ResumeConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(10),
            user_agent: default_user_agent().to_string(),
            compress: true,
        }
    }
}

pub fn default_user_agent() -> &'static str {
    concat!("resume-pdf/", env!("CARGO_PKG_VERSION"))
}

impl ResumeConfig {
    /// Load from the process environment; unset variables keep their defaults
    ///
    /// A `.env` file in the working directory or one of its parents fills in
    /// variables the environment leaves unset.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = get(FETCH_TIMEOUT_VAR) {
            let secs = value.trim().parse::<u64>().map_err(|_| {
                ResumeError::Config(format!(
                    "{FETCH_TIMEOUT_VAR} must be a whole number of seconds, got '{value}'"
                ))
            })?;
            if secs == 0 {
                return Err(ResumeError::Config(format!(
                    "{FETCH_TIMEOUT_VAR} must be greater than zero"
                )));
            }
            config.fetch_timeout = Duration::from_secs(secs);
        }

        if let Some(value) = get(USER_AGENT_VAR) {
            config.user_agent = value.trim().to_string();
        }

        if let Some(value) = get(COMPRESS_VAR) {
            config.compress = parse_bool(&value).ok_or_else(|| {
                ResumeError::Config(format!("{COMPRESS_VAR} must be true or false, got '{value}'"))
            })?;
        }

        Ok(config)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ResumeConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ResumeConfig::default());
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
        assert!(config.user_agent.starts_with("resume-pdf/"));
        assert!(config.compress);
    }

    #[test]
    fn test_overrides() {
        let config = ResumeConfig::from_lookup(lookup(&[
            (FETCH_TIMEOUT_VAR, "3"),
            (USER_AGENT_VAR, "acme-resumes/2"),
            (COMPRESS_VAR, "off"),
        ]))
        .unwrap();

        assert_eq!(
            config,
            ResumeConfig {
                fetch_timeout: Duration::from_secs(3),
                user_agent: "acme-resumes/2".to_string(),
                compress: false,
            }
        );
    }

    #[test]
    fn test_blank_values_keep_defaults() {
        let config = ResumeConfig::from_lookup(lookup(&[(USER_AGENT_VAR, "  ")])).unwrap();
        assert_eq!(config.user_agent, default_user_agent());
    }

    #[test]
    fn test_invalid_values() {
        for pairs in [
            [(FETCH_TIMEOUT_VAR, "soon")],
            [(FETCH_TIMEOUT_VAR, "0")],
            [(COMPRESS_VAR, "maybe")],
        ] {
            let err = ResumeConfig::from_lookup(lookup(&pairs)).unwrap_err();
            assert!(matches!(err, ResumeError::Config(_)));
        }
    }
}
