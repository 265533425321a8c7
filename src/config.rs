use crate::error::{RegistryError, Result};
use crate::schema::{CoercionMode, UnknownFieldPolicy, ValidationOptions};
use std::env;
use std::str::FromStr;

/// Log output format for the binary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("expected text or json, got '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub validation: ValidationOptions,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup; unset keys take defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let unknown_fields: UnknownFieldPolicy = parse_var(&lookup, "SCHEMA_UNKNOWN_FIELDS")?;
        let coercion: CoercionMode = parse_var(&lookup, "SCHEMA_COERCION")?;
        let log_format: LogFormat = parse_var(&lookup, "LOG_FORMAT")?;

        Ok(Config {
            validation: ValidationOptions {
                unknown_fields,
                coercion,
            },
            log_format,
        })
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<T>
where
    T: FromStr<Err = String> + Default,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => {
            raw.parse().map_err(|message| RegistryError::InvalidConfig {
                key: key.to_string(),
                message,
            })
        }
        _ => Ok(T::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.validation.unknown_fields, UnknownFieldPolicy::Allow);
        assert_eq!(config.validation.coercion, CoercionMode::Lax);
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_explicit_values() {
        let config = Config::from_lookup(lookup(&[
            ("SCHEMA_UNKNOWN_FIELDS", "forbid"),
            ("SCHEMA_COERCION", "strict"),
            ("LOG_FORMAT", "JSON"),
        ]))
        .unwrap();

        assert_eq!(config.validation.unknown_fields, UnknownFieldPolicy::Forbid);
        assert_eq!(config.validation.coercion, CoercionMode::Strict);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_blank_value_uses_default() {
        let config = Config::from_lookup(lookup(&[("SCHEMA_COERCION", "  ")])).unwrap();
        assert_eq!(config.validation.coercion, CoercionMode::Lax);
    }

    #[test]
    fn test_invalid_value_is_rejected() {
        let err = Config::from_lookup(lookup(&[("SCHEMA_UNKNOWN_FIELDS", "reject")])).unwrap_err();

        match err {
            RegistryError::InvalidConfig { key, message } => {
                assert_eq!(key, "SCHEMA_UNKNOWN_FIELDS");
                assert!(message.contains("reject"));
            }
            other => panic!("expected config error, got {:?}", other),
        }
    }
}
