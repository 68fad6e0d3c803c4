// Where the two record files live. Defaults are relative to the working
// directory; environment variables can point them elsewhere.

use std::path::PathBuf;

pub const DEFAULT_ACCOUNTS_FILE: &str = "users.txt";
pub const DEFAULT_CREDENTIALS_FILE: &str = "credentials.txt";

pub const ACCOUNTS_ENV: &str = "PASSKEEP_USERS_FILE";
pub const CREDENTIALS_ENV: &str = "PASSKEEP_CREDENTIALS_FILE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub accounts_path: PathBuf,
    pub credentials_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            accounts_path: PathBuf::from(DEFAULT_ACCOUNTS_FILE),
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_FILE),
        }
    }
}

impl StoreConfig {
    /// Read `PASSKEEP_USERS_FILE` and `PASSKEEP_CREDENTIALS_FILE`, falling
    /// back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`StoreConfig::from_env`] with a caller-supplied lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let resolve = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .map(|value| expand_home(value.trim()))
                .unwrap_or_else(|| PathBuf::from(default))
        };
        Self {
            accounts_path: resolve(ACCOUNTS_ENV, DEFAULT_ACCOUNTS_FILE),
            credentials_path: resolve(CREDENTIALS_ENV, DEFAULT_CREDENTIALS_FILE),
        }
    }
}

/// Expand a leading `~/` to the home directory. Left as-is when the home
/// directory is unknown.
pub fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn defaults_without_overrides() {
        let config = StoreConfig::from_lookup(|_| None);
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.accounts_path, PathBuf::from("users.txt"));
        assert_eq!(config.credentials_path, PathBuf::from("credentials.txt"));
    }

    #[test]
    fn overrides_and_blank_values() {
        let vars: HashMap<&str, &str> = [(ACCOUNTS_ENV, "/tmp/a.txt"), (CREDENTIALS_ENV, "   ")]
            .into_iter()
            .collect();
        let config = StoreConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.accounts_path, PathBuf::from("/tmp/a.txt"));
        assert_eq!(config.credentials_path, PathBuf::from(DEFAULT_CREDENTIALS_FILE));
    }

    #[test]
    fn tilde_expands_to_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/vault/users.txt"), home.join("vault/users.txt"));
        }
        assert_eq!(expand_home("plain.txt"), PathBuf::from("plain.txt"));
        assert_eq!(expand_home("a/~/b"), PathBuf::from("a/~/b"));
    }
}
