use thiserror::Error;

#[derive(Debug, Error)]
pub enum NiyyahError {
    #[error("invalid time '{0}': expected HH:MM between 00:00 and 23:59")]
    InvalidTime(String),

    #[error("invalid day type '{0}': expected weekday, weekend or daily")]
    InvalidDayType(String),

    #[error("invalid category '{0}': expected spiritual, health or growth")]
    InvalidCategory(String),

    #[error("invalid theme '{0}': expected light, dark or system")]
    InvalidTheme(String),

    #[error("not logged in: run 'niyyah login'")]
    NotLoggedIn,

    #[error("session expired: run 'niyyah login' again")]
    SessionExpired,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("API error ({status}): {detail}")]
    Api { status: u16, detail: String },

    #[error("{0} not found")]
    NotFound(String),

    #[error("home directory not found: set HOME or NIYYAH_HOME")]
    HomeNotFound,

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NiyyahError>;
