use std::path::PathBuf;

use crate::authz::GatePolicy;
use crate::errors::AppError;
use crate::jwt::JwtConfig;

const DEFAULT_PORT: u16 = 8000;

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub jwt: JwtConfig,
    pub policy: GatePolicy,
}

impl AppConfig {
    pub fn new(jwt: JwtConfig, policy: GatePolicy) -> Self {
        Self {
            port: DEFAULT_PORT,
            jwt,
            policy,
        }
    }

    pub fn from_env() -> Result<Self, AppError> {
        let port = match std::env::var("APP_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .map_err(|_| AppError::configuration("APP_PORT must be a valid port number"))?,
            Err(_) => DEFAULT_PORT,
        };

        let jwt = JwtConfig::from_env()?;

        let policy = match policy_path_from_env() {
            Some(path) => GatePolicy::from_path(&path)?,
            None => {
                tracing::info!("GATE_POLICY_PATH not set, using embedded gate policy");
                GatePolicy::default()
            }
        };

        Ok(Self { port, jwt, policy })
    }
}

pub fn policy_path_from_env() -> Option<PathBuf> {
    std::env::var_os("GATE_POLICY_PATH")
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Load `.env` from the working directory, falling back to the crate root.
pub fn load_env() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    let crate_env = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    let _ = dotenvy::from_path(crate_env);
}
