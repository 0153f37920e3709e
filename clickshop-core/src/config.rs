use std::env;
use std::path::PathBuf;

/// Shared secrets gating staff registration.
///
/// Customers register without one; Employee and Administrator
/// registrations must present the matching value.
#[derive(Debug, Clone)]
pub struct RoleSecrets {
    pub employee: String,
    pub admin: String,
}

/// Server configuration, read from the environment with code defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Interface the server binds to
    pub host: String,

    /// Port the server binds to
    pub port: u16,

    /// Directory the file store lives in
    pub data_dir: PathBuf,

    /// HS256 signing secret for session tokens
    pub jwt_secret: String,

    /// Registration secrets for staff roles
    pub secrets: RoleSecrets,
}

impl Config {
    /// Gather configuration from the environment.
    pub fn from_env() -> anyhow::Result<Self> {
        let host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| anyhow::anyhow!("Invalid SERVER_PORT"))?;
        let data_dir = PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()));
        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| "secret".to_string());
        let secrets = RoleSecrets {
            employee: env::var("EMPLOYEE_SECRET")
                .unwrap_or_else(|_| "empleadovip2024".to_string()),
            admin: env::var("ADMIN_SECRET").unwrap_or_else(|_| "superadmin2024".to_string()),
        };

        Ok(Config {
            host,
            port,
            data_dir,
            jwt_secret,
            secrets,
        })
    }
}
