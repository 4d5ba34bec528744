use chrono::Duration;

/// Which database the room store talks to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    /// Hosted database REST API (PostgREST), authenticated with an API key
    Rest { url: String, api_key: String },
    /// Direct Postgres connection
    Postgres { database_url: String },
}

/// Thresholds used by the cleanup job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecyclePolicy {
    /// Active rooms with no activity for this long are marked inactive
    pub idle_after: Duration,
    /// Inactive or ended rooms older than this are deleted
    pub retain_for: Duration,
}

impl Default for LifecyclePolicy {
    fn default() -> Self {
        Self {
            idle_after: Duration::hours(24),
            retain_for: Duration::days(7),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub backend: BackendConfig,
    pub policy: LifecyclePolicy,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

impl Config {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup.
    /// Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let backend = match get("ROOMS_BACKEND").as_deref().unwrap_or("rest") {
            "rest" => BackendConfig::Rest {
                url: require("SUPABASE_URL")?,
                api_key: require("SUPABASE_KEY")?,
            },
            "postgres" => BackendConfig::Postgres {
                database_url: require("DATABASE_URL")?,
            },
            other => {
                return Err(ConfigError::Invalid {
                    name: "ROOMS_BACKEND",
                    value: other.to_string(),
                })
            }
        };

        let defaults = LifecyclePolicy::default();
        let idle_hours = parse_or(
            "ROOM_IDLE_HOURS",
            get("ROOM_IDLE_HOURS"),
            defaults.idle_after.num_hours(),
        )?;
        let retention_days = parse_or(
            "ROOM_RETENTION_DAYS",
            get("ROOM_RETENTION_DAYS"),
            defaults.retain_for.num_days(),
        )?;
        let policy = LifecyclePolicy {
            idle_after: Duration::try_hours(idle_hours).ok_or(ConfigError::Invalid {
                name: "ROOM_IDLE_HOURS",
                value: idle_hours.to_string(),
            })?,
            retain_for: Duration::try_days(retention_days).ok_or(ConfigError::Invalid {
                name: "ROOM_RETENTION_DAYS",
                value: retention_days.to_string(),
            })?,
        };

        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or("PORT", get("PORT"), 3000u16)?;

        Ok(Self {
            backend,
            policy,
            host,
            port,
        })
    }
}

/// Parse an optional value, falling back to a default when unset.
/// Negative and zero thresholds are rejected along with garbage.
fn parse_or<T>(name: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let Some(value) = value else {
        return Ok(default);
    };
    match value.trim().parse::<T>() {
        Ok(parsed) if parsed > T::default() => Ok(parsed),
        _ => Err(ConfigError::Invalid { name, value }),
    }
}
