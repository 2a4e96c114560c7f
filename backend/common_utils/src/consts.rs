/// Prefix used for environment variable overrides, e.g. `WALLETONE__SERVER__PORT`
pub const ENV_PREFIX: &str = "WALLETONE";

/// Environment variable that selects the runtime environment
pub const RUN_ENV: &str = "RUN_ENV";

/// Header used to correlate requests across logs
pub const X_REQUEST_ID: &str = "x-request-id";

/// Service name reported by the health endpoint and used as log target
pub const SERVICE_NAME: &str = "walletone-connector";

/// Environment the service is running in
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Env {
    Development,
    Sandbox,
    Production,
}

impl Env {
    /// Reads the environment from `RUN_ENV`, defaulting to development in
    /// debug builds and production otherwise.
    pub fn current_env() -> Self {
        std::env::var(RUN_ENV)
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(Self::default_env())
    }

    /// Name of the config file backing this environment
    pub const fn config_path(self) -> &'static str {
        match self {
            Self::Development => "development.toml",
            Self::Sandbox => "sandbox.toml",
            Self::Production => "production.toml",
        }
    }

    #[cfg(debug_assertions)]
    const fn default_env() -> Self {
        Self::Development
    }

    #[cfg(not(debug_assertions))]
    const fn default_env() -> Self {
        Self::Production
    }
}
