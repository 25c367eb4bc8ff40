use anyhow::{Context, Result, anyhow};
use std::str::FromStr;

pub fn required(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Missing environment variable: {key}"))
}

pub fn parsed_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Unable to parse {key}={raw}")),
        Err(_) => Ok(default),
    }
}

pub fn required_parsed<T>(key: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = required(key)?;
    raw.parse::<T>()
        .with_context(|| format!("Unable to parse {key}={raw}"))
}

pub fn flag(key: &str) -> Result<bool> {
    match required(key)?.as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(anyhow!("{key} must be 'true' or 'false', got '{other}'")),
    }
}

pub fn optional_flag(key: &str) -> bool {
    std::env::var(key)
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false)
}
