//! The environment a bulk run executes in.
//!
//! Loading configuration is the host application's business; this only reads
//! the environment name so the runner can refuse to touch production data.

use std::fmt;

/// Variables consulted by [`Environment::from_env`], in order.
pub const ENVIRONMENT_VARIABLES: [&str; 2] = ["MASKING_ENV", "APP_ENV"];

const DEFAULT_ENVIRONMENT: &str = "development";

/// Name of the running environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Environment {
    name: String,
}

impl Environment {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Reads the first non-empty variable of [`ENVIRONMENT_VARIABLES`],
    /// falling back to `development`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`Environment::from_env`], with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        ENVIRONMENT_VARIABLES
            .iter()
            .filter_map(|key| lookup(key))
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
            .map_or_else(Self::default, Self::new)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_production(&self) -> bool {
        self.name.eq_ignore_ascii_case("production") || self.name.eq_ignore_ascii_case("prod")
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(DEFAULT_ENVIRONMENT)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::Environment;

    fn lookup(vars: &[(&str, &str)]) -> Environment {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Environment::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_to_development() {
        let env = lookup(&[]);
        assert_eq!(env.name(), "development");
        assert!(!env.is_production());
    }

    #[test]
    fn masking_env_wins_over_app_env() {
        let env = lookup(&[("MASKING_ENV", "staging"), ("APP_ENV", "production")]);
        assert_eq!(env.name(), "staging");
    }

    #[test]
    fn blank_values_are_skipped() {
        let env = lookup(&[("MASKING_ENV", "  "), ("APP_ENV", "Production")]);
        assert!(env.is_production());
    }

    #[test]
    fn production_aliases() {
        assert!(Environment::new("production").is_production());
        assert!(Environment::new("PROD").is_production());
        assert!(!Environment::new("test").is_production());
        assert!(!Environment::new("preproduction").is_production());
    }
}
