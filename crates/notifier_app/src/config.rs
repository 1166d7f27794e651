//! Environment-backed configuration, read once at startup.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use log::LevelFilter;
use notifier_core::DEFAULT_STORE_BASE_URL;
use url::Url;

const CATALOG_BASE_URL: &str =
    "https://store-site-backend-static.ak.epicgames.com/freeGamesPromotions";
const DEFAULT_LOCALE: &str = "en-US";
const DEFAULT_COUNTRY: &str = "US";
const DEFAULT_STATE_FILE: &str = "last_free_games.json";
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("{var} is not a valid URL ({value:?}): {message}")]
    InvalidUrl {
        var: &'static str,
        value: String,
        message: String,
    },
    #[error("{var} has an invalid value {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_password: String,
    pub from: String,
    pub recipient: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifierConfig {
    pub catalog_endpoint: String,
    pub store_base_url: String,
    pub state_file: PathBuf,
    pub webhook_url: Option<String>,
    /// Present iff email dispatch is enabled.
    pub email: Option<EmailConfig>,
    pub fetch_timeout: Duration,
    pub log_level: LevelFilter,
    pub log_file: Option<PathBuf>,
}

struct Vars<F> {
    lookup: F,
}

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    /// Blank values count as unset.
    fn get(&self, var: &str) -> Option<String> {
        (self.lookup)(var)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn require(&self, var: &'static str) -> Result<String, ConfigError> {
        self.get(var).ok_or(ConfigError::Missing(var))
    }

    fn url(&self, var: &'static str) -> Result<Option<String>, ConfigError> {
        self.get(var).map(|value| validate_url(var, value)).transpose()
    }

    fn parsed<T: std::str::FromStr>(&self, var: &'static str, default: T) -> Result<T, ConfigError> {
        match self.get(var) {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidValue { var, value }),
            None => Ok(default),
        }
    }

    fn flag(&self, var: &'static str) -> Result<bool, ConfigError> {
        match self.get(var) {
            None => Ok(false),
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(ConfigError::InvalidValue { var, value }),
            },
        }
    }
}

fn validate_url(var: &'static str, value: String) -> Result<String, ConfigError> {
    match Url::parse(&value) {
        Ok(_) => Ok(value),
        Err(err) => Err(ConfigError::InvalidUrl {
            var,
            value,
            message: err.to_string(),
        }),
    }
}

fn default_endpoint(locale: &str, country: &str) -> Result<String, ConfigError> {
    Url::parse_with_params(
        CATALOG_BASE_URL,
        &[
            ("locale", locale),
            ("country", country),
            ("allowCountries", country),
        ],
    )
    .map(String::from)
    .map_err(|err| ConfigError::InvalidUrl {
        var: "FREEGAMES_LOCALE",
        value: locale.to_string(),
        message: err.to_string(),
    })
}

impl NotifierConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars { lookup };

        let catalog_endpoint = match vars.url("FREEGAMES_CATALOG_ENDPOINT")? {
            Some(endpoint) => endpoint,
            None => {
                let locale = vars
                    .get("FREEGAMES_LOCALE")
                    .unwrap_or_else(|| DEFAULT_LOCALE.to_string());
                let country = vars
                    .get("FREEGAMES_COUNTRY")
                    .unwrap_or_else(|| DEFAULT_COUNTRY.to_string());
                default_endpoint(&locale, &country)?
            }
        };

        let store_base_url = vars
            .url("FREEGAMES_STORE_BASE_URL")?
            .unwrap_or_else(|| DEFAULT_STORE_BASE_URL.to_string());

        let email = if vars.flag("FREEGAMES_EMAIL_ENABLED")? {
            let smtp_user = vars.require("FREEGAMES_SMTP_USER")?;
            Some(EmailConfig {
                smtp_host: vars.require("FREEGAMES_SMTP_HOST")?,
                smtp_port: vars.parsed("FREEGAMES_SMTP_PORT", DEFAULT_SMTP_PORT)?,
                smtp_password: vars.require("FREEGAMES_SMTP_PASSWORD")?,
                recipient: vars.require("FREEGAMES_EMAIL_TO")?,
                from: vars
                    .get("FREEGAMES_EMAIL_FROM")
                    .unwrap_or_else(|| smtp_user.clone()),
                smtp_user,
            })
        } else {
            None
        };

        Ok(Self {
            catalog_endpoint,
            store_base_url,
            state_file: vars
                .get("FREEGAMES_STATE_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE)),
            webhook_url: vars.url("FREEGAMES_DISCORD_WEBHOOK_URL")?,
            email,
            fetch_timeout: Duration::from_secs(
                vars.parsed("FREEGAMES_FETCH_TIMEOUT_SECS", DEFAULT_FETCH_TIMEOUT_SECS)?,
            ),
            log_level: vars.parsed("FREEGAMES_LOG_LEVEL", LevelFilter::Info)?,
            log_file: vars.get("FREEGAMES_LOG_FILE").map(PathBuf::from),
        })
    }
}
