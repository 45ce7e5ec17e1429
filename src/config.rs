use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),
    #[error("{var} has an invalid value: {value}")]
    Invalid { var: &'static str, value: String },
}

/// Longest accepted token lifetime (30 days).
pub const MAX_TTL_MINUTES: i64 = 60 * 24 * 30;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_minutes: i64,
}

/// Argon2 cost parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct HashConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            memory_kib: 64 * 1024,
            iterations: 3,
            parallelism: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
    pub hash: HashConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` plugs in the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let secret = lookup("JWT_SECRET")
            .or_else(|| lookup("JWT_KEY"))
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let defaults = HashConfig::default();
        let jwt = JwtConfig {
            secret,
            ttl_minutes: parse_or(&lookup, "JWT_TTL_MINUTES", 120)?,
        };
        let hash = HashConfig {
            memory_kib: parse_or(&lookup, "HASH_MEMORY_KIB", defaults.memory_kib)?,
            iterations: parse_or(&lookup, "HASH_ITERATIONS", defaults.iterations)?,
            parallelism: parse_or(&lookup, "HASH_PARALLELISM", defaults.parallelism)?,
        };

        validate_ttl(jwt.ttl_minutes)?;

        Ok(Self {
            database_url,
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&lookup, "APP_PORT", 8080)?,
            jwt,
            hash,
        })
    }
}

/// Token lifetime must be positive and at most [`MAX_TTL_MINUTES`].
pub(crate) fn validate_ttl(ttl_minutes: i64) -> Result<i64, ConfigError> {
    if !(1..=MAX_TTL_MINUTES).contains(&ttl_minutes) {
        return Err(ConfigError::Invalid {
            var: "JWT_TTL_MINUTES",
            value: ttl_minutes.to_string(),
        });
    }
    Ok(ttl_minutes)
}

fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_optional_vars_absent() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/events"),
            ("JWT_SECRET", "s3cret"),
        ]))
        .expect("config should load");
        assert_eq!(cfg.jwt.ttl_minutes, 120);
        assert_eq!(cfg.hash.memory_kib, 64 * 1024);
        assert_eq!(cfg.hash.iterations, 3);
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 8080);
    }

    #[test]
    fn missing_secret_is_config_error() {
        let err = AppConfig::from_lookup(lookup_from(&[(
            "DATABASE_URL",
            "postgres://localhost/events",
        )]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));
    }

    #[test]
    fn blank_secret_counts_as_missing() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/events"),
            ("JWT_SECRET", "   "),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));
    }

    #[test]
    fn legacy_key_name_is_accepted() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/events"),
            ("JWT_KEY", "legacy"),
        ]))
        .expect("config should load");
        assert_eq!(cfg.jwt.secret, "legacy");
    }

    #[test]
    fn non_numeric_ttl_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/events"),
            ("JWT_SECRET", "s3cret"),
            ("JWT_TTL_MINUTES", "two hours"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "JWT_TTL_MINUTES", .. }));
    }

    #[test]
    fn ttl_bounds_are_enforced() {
        for bad in ["0", "-5", "43201", "10000000000000"] {
            let err = AppConfig::from_lookup(lookup_from(&[
                ("DATABASE_URL", "postgres://localhost/events"),
                ("JWT_SECRET", "s3cret"),
                ("JWT_TTL_MINUTES", bad),
            ]))
            .unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid { var: "JWT_TTL_MINUTES", .. }),
                "{bad} should be rejected"
            );
        }

        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/events"),
            ("JWT_SECRET", "s3cret"),
            ("JWT_TTL_MINUTES", "43200"),
        ]))
        .expect("30 days is the upper bound");
        assert_eq!(cfg.jwt.ttl_minutes, MAX_TTL_MINUTES);
    }
}
