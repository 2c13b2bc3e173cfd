use serde::Deserialize;

use techteam_core::config::Config;

/// API service configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3000). Env var: `API_PORT`.
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    /// Mark the session cookie `Secure` (default true). Env var: `COOKIE_SECURE`.
    #[serde(default = "default_true")]
    pub cookie_secure: bool,
    /// bcrypt work factor (default 12). Env var: `BCRYPT_COST`.
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
    /// Rows returned by the rankings endpoint when no limit is given (default 10).
    #[serde(default = "default_rankings_limit")]
    pub rankings_limit: u64,
}

impl Config for ApiConfig {}

fn default_api_port() -> u16 {
    3000
}

fn default_true() -> bool {
    true
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

fn default_rankings_limit() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_apply_defaults() {
        let config = ApiConfig::from_vars(vec![(
            "DATABASE_URL".to_string(),
            "postgres://localhost/techteam".to_string(),
        )])
        .unwrap();
        assert_eq!(config.api_port, 3000);
        assert!(config.cookie_secure);
        assert_eq!(config.bcrypt_cost, 12);
        assert_eq!(config.rankings_limit, 10);
    }

    #[test]
    fn should_read_overrides() {
        let config = ApiConfig::from_vars(vec![
            ("DATABASE_URL".to_string(), "postgres://db/app".to_string()),
            ("API_PORT".to_string(), "8081".to_string()),
            ("COOKIE_SECURE".to_string(), "false".to_string()),
            ("BCRYPT_COST".to_string(), "10".to_string()),
        ])
        .unwrap();
        assert_eq!(config.api_port, 8081);
        assert!(!config.cookie_secure);
        assert_eq!(config.bcrypt_cost, 10);
    }

    #[test]
    fn should_require_database_url() {
        assert!(ApiConfig::from_vars(Vec::<(String, String)>::new()).is_err());
    }
}
