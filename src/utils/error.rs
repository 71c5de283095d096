use crate::domain::model::{Round, TeamId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DrawError {
    #[error("Draw session is closed, submission was not processed")]
    SessionClosed,

    #[error("Submission queue closed: no submitter is attached to this session")]
    InboxClosed,

    #[error("No subject can be drawn for team {team} in round {round}")]
    NoSubjectAvailable { team: TeamId, round: Round },

    #[error("Invalid config value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing config field: {field}")]
    MissingConfigError { field: String },

    #[error("Config validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("No draw session registered under '{key}'")]
    UnknownSession { key: String },

    #[error("A draw session is already running under '{key}'")]
    SessionExists { key: String },

    #[error("Draw session '{key}' was aborted")]
    SessionAborted { key: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Session,
    Draw,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DrawError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DrawError::SessionClosed
            | DrawError::InboxClosed
            | DrawError::UnknownSession { .. }
            | DrawError::SessionExists { .. }
            | DrawError::SessionAborted { .. } => ErrorCategory::Session,
            DrawError::NoSubjectAvailable { .. } => ErrorCategory::Draw,
            DrawError::InvalidConfigValueError { .. }
            | DrawError::MissingConfigError { .. }
            | DrawError::ConfigValidationError { .. }
            | DrawError::TomlError(_) => ErrorCategory::Configuration,
            DrawError::IoError(_) | DrawError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            DrawError::SessionClosed | DrawError::UnknownSession { .. } => ErrorSeverity::Low,
            DrawError::SessionExists { .. } | DrawError::SessionAborted { .. } => {
                ErrorSeverity::Medium
            }
            DrawError::InboxClosed
            | DrawError::NoSubjectAvailable { .. }
            | DrawError::InvalidConfigValueError { .. }
            | DrawError::MissingConfigError { .. }
            | DrawError::ConfigValidationError { .. }
            | DrawError::TomlError(_) => ErrorSeverity::High,
            DrawError::IoError(_) | DrawError::SerializationError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DrawError::SessionClosed => "The draw is no longer running.".to_string(),
            DrawError::InboxClosed => "Every participant left the draw before it ended.".to_string(),
            DrawError::NoSubjectAvailable { team, round } => {
                format!("Team {} has no subject left to draw in round {}.", team, round)
            }
            DrawError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value '{}' is invalid: {}", field, reason)
            }
            DrawError::MissingConfigError { field } => {
                format!("Configuration is missing '{}'.", field)
            }
            DrawError::ConfigValidationError { field, message } => {
                format!("Configuration '{}' is not valid: {}", field, message)
            }
            DrawError::UnknownSession { key } => format!("There is no draw running in '{}'.", key),
            DrawError::SessionExists { key } => {
                format!("A draw is already running in '{}'.", key)
            }
            DrawError::SessionAborted { key } => format!("The draw in '{}' was cancelled.", key),
            DrawError::IoError(e) => format!("Could not access a file: {}", e),
            DrawError::SerializationError(e) => format!("Could not serialize the report: {}", e),
            DrawError::TomlError(e) => format!("The configuration file is not valid TOML: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Session => "Start a new draw session and resubmit.",
            ErrorCategory::Draw => "Add subjects to the catalog or reduce the pool sizes.",
            ErrorCategory::Configuration => "Check the [draw] and [teams] sections of the config file.",
            ErrorCategory::System => "Check file permissions and available disk space.",
        }
    }
}

pub type Result<T> = std::result::Result<T, DrawError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = DrawError::MissingConfigError {
            field: "draw.format".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().contains("draw.format"));
    }

    #[test]
    fn test_closed_session_is_low_severity() {
        let err = DrawError::SessionClosed;
        assert_eq!(err.category(), ErrorCategory::Session);
        assert_eq!(err.severity(), ErrorSeverity::Low);
    }
}
