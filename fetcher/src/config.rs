use std::env::VarError;

/// Settings shared by the GitLab and Spotify views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Page size for searches and listings.
    pub search_limit: u32,
    /// Branch left out of the source branch choices.
    pub protected_branch: String,
    /// How often the now playing view asks the player again.
    pub poll_interval_ms: u32,
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_limit: 50,
            protected_branch: "main".into(),
            poll_interval_ms: 1000,
            log_filter: "info".into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a positive integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("{name} is not valid unicode")]
    NotUnicode { name: &'static str },
}

impl Config {
    /// Read settings from the environment, loading a `.env` file first if
    /// one exists. Unset variables keep their defaults.
    ///
    /// - FETCHER_SEARCH_LIMIT
    /// - FETCHER_PROTECTED_BRANCH
    /// - FETCHER_POLL_INTERVAL_MS
    /// - FETCHER_LOG
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name))
    }

    /// Same as [`Self::from_env`] with an explicit variable source.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Result<String, VarError>,
    ) -> Result<Self, ConfigError> {
        let var = |name: &'static str| match lookup(name) {
            Ok(value) => Ok(Some(value)),
            Err(VarError::NotPresent) => Ok(None),
            Err(VarError::NotUnicode(_)) => {
                Err(ConfigError::NotUnicode { name })
            }
        };
        let number = |name: &'static str| -> Result<Option<u32>, ConfigError> {
            let Some(value) = var(name)? else {
                return Ok(None);
            };
            match value.trim().parse::<u32>() {
                Ok(n) if n > 0 => Ok(Some(n)),
                _ => Err(ConfigError::InvalidNumber { name, value }),
            }
        };

        let defaults = Self::default();
        Ok(Self {
            search_limit: number("FETCHER_SEARCH_LIMIT")?
                .unwrap_or(defaults.search_limit),
            protected_branch: var("FETCHER_PROTECTED_BRANCH")?
                .filter(|branch| !branch.is_empty())
                .unwrap_or(defaults.protected_branch),
            poll_interval_ms: number("FETCHER_POLL_INTERVAL_MS")?
                .unwrap_or(defaults.poll_interval_ms),
            log_filter: var("FETCHER_LOG")?.unwrap_or(defaults.log_filter),
        })
    }
}
