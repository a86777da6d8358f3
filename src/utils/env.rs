//! Environment variable helpers

/// Get environment variable or return default value
pub fn env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get environment variable as Option; empty values count as unset
pub fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Returns `true` if the value is "true", "1", "yes" or "on" (case-insensitive)
pub fn env_bool(key: &str) -> bool {
    std::env::var(key)
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes" | "on"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_env_helpers() {
        let key = "BLLVM_CHAINPARAMS_ENV_TEST";
        std::env::remove_var(key);
        assert_eq!(env_opt(key), None);
        assert_eq!(env_or_default(key, "main"), "main");
        assert!(!env_bool(key));

        std::env::set_var(key, "");
        assert_eq!(env_opt(key), None);

        std::env::set_var(key, "Yes");
        assert_eq!(env_opt(key).as_deref(), Some("Yes"));
        assert!(env_bool(key));
        std::env::remove_var(key);
    }
}
