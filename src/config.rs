use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub run_migrations: bool,
}

impl AppConfig {
    /// Reads the configuration from the process environment. Call
    /// `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    ///
    /// `DATABASE_URL` is required. `DB_USERNAME` and `DB_PASSWORD`, when set,
    /// replace the credentials in the URL. `RUN_MIGRATIONS` defaults to true.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let database_url = match lookup("DB_USERNAME") {
            Some(user) => with_credentials(&url, &user, lookup("DB_PASSWORD").as_deref())?,
            None => url,
        };

        let run_migrations = match lookup("RUN_MIGRATIONS") {
            None => true,
            Some(value) => parse_flag(&value).ok_or(ConfigError::Invalid {
                key: "RUN_MIGRATIONS",
                value,
            })?,
        };

        Ok(Self {
            database_url,
            run_migrations,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// Credentials are spliced in verbatim; they must already be URL-safe.
fn with_credentials(url: &str, user: &str, password: Option<&str>) -> Result<String, ConfigError> {
    let (scheme, rest) = url.split_once("://").ok_or_else(|| ConfigError::Invalid {
        key: "DATABASE_URL",
        value: url.to_string(),
    })?;
    let host_and_path = rest.split_once('@').map_or(rest, |(_, host)| host);
    let credentials = match password {
        Some(password) => format!("{user}:{password}"),
        None => user.to_string(),
    };
    Ok(format!("{scheme}://{credentials}@{host_and_path}"))
}
