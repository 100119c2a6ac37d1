use std::env;
use std::str::FromStr;

use crate::error::ParameterStoreError;

pub fn optional_env(env_name: &str) -> Option<String> {
    env::var(env_name).ok().filter(|value| !value.trim().is_empty())
}

pub fn env_or(env_name: &str, default: &str) -> String {
    optional_env(env_name).unwrap_or_else(|| default.to_string())
}

pub fn parse_env_or<T: FromStr>(env_name: &str, default: T) -> Result<T, ParameterStoreError> {
    match optional_env(env_name) {
        Some(value) => value.trim().parse::<T>().map_err(|_| {
            ParameterStoreError::Configuration(format!(
                "Environment variable '{env_name}' has an invalid value: '{value}'"
            ))
        }),
        None => Ok(default),
    }
}
