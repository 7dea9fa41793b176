//! Storage location and environment overrides.

use std::path::PathBuf;

/// Data directory: `PRICEWATCH_DIR`, else `~/.pricewatch`.
pub fn data_dir() -> PathBuf {
    if let Some(custom) = read_env_string("PRICEWATCH_DIR") {
        if !custom.is_empty() {
            return PathBuf::from(custom);
        }
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".pricewatch")
}

pub fn read_env_u64(name: &str, default_value: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default_value)
}

pub fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().map(|v| v.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_env_u64_default() {
        assert_eq!(read_env_u64("PRICEWATCH_TEST_UNSET_VAR", 42), 42);
    }
}
