use pillminder_core::{ConfigError, LoggingError, RepoError, ServiceError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;

/// Top-level failure reported by the `pillminder` binary.
#[derive(Debug)]
pub enum CliError {
    /// Config file could not be read or parsed.
    ConfigFile(String),
    /// Reminder settings are inconsistent.
    Config(ConfigError),
    Logging(LoggingError),
    Service(ServiceError),
    Repo(RepoError),
    Io(io::Error),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConfigFile(reason) => write!(f, "config error: {reason}"),
            Self::Config(err) => write!(f, "invalid reminder settings: {err}"),
            Self::Logging(err) => write!(f, "{err}"),
            Self::Service(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ConfigFile(_) => None,
            Self::Config(err) => Some(err),
            Self::Logging(err) => Some(err),
            Self::Service(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<LoggingError> for CliError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<ServiceError> for CliError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<RepoError> for CliError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<io::Error> for CliError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

pub type CliResult<T> = Result<T, CliError>;
