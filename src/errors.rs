use std::fmt;

use derive_more::Display;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use validator::ValidationErrors;

#[derive(Debug, Display)]
pub enum AppError {
    #[display("validation error: {}", join_field_errors(_0))]
    Validation(Vec<FieldError>),

    #[display("{_0}")]
    Api(ErrorRes),

    #[display("Transport error: {_0}")]
    Transport(String),

    #[display("Failed to decode response: {_0}")]
    Decode(String),

    #[display("Invalid file: {_0}")]
    InvalidFile(String),

    #[display("Configuration error: {_0}")]
    Config(String),

    #[display("Request cancelled")]
    Cancelled,

    #[display("A request for this action is already in flight")]
    AlreadyInFlight,

    #[display("Not found: {_0}")]
    NotFound(String),

    #[display("IO error: {_0}")]
    Io(String),
}

impl std::error::Error for AppError {}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}:{}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl AppError {
    /// The structured server error, when the failure came from the backend.
    pub fn as_error_res(&self) -> Option<&ErrorRes> {
        match self {
            AppError::Api(res) => Some(res),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut field_errors: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(|e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "Invalid value".to_string()),
                })
            })
            .collect();
        field_errors.sort_by(|a, b| a.field.cmp(&b.field));

        AppError::Validation(field_errors)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Decode(err.to_string())
        } else {
            AppError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decode(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Config(format!("invalid url: {}", err))
    }
}

/// Error kinds signaled by the backend in the `errorCode` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    /// A file exceeded the allowed upload size.
    UploadSizeError,
    /// Server-side validation rejected the submission.
    NotValidError,
    /// Anything else; kept verbatim so it can be logged.
    Unknown(String),
}

impl ErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            ErrorCode::UploadSizeError => "UPLOAD_SIZE_ERROR",
            ErrorCode::NotValidError => "NOT_VALID_ERROR",
            ErrorCode::Unknown(code) => code,
        }
    }

    /// Whether the client shows the server message for this kind.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, ErrorCode::UploadSizeError | ErrorCode::NotValidError)
    }
}

impl From<&str> for ErrorCode {
    fn from(code: &str) -> Self {
        match code {
            "UPLOAD_SIZE_ERROR" => ErrorCode::UploadSizeError,
            "NOT_VALID_ERROR" => ErrorCode::NotValidError,
            other => ErrorCode::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ErrorCode::from(raw.as_str()))
    }
}

/// Error payload returned by the backend on a failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "camelCase")]
#[display("{error_code}: {message}")]
pub struct ErrorRes {
    pub error_code: ErrorCode,
    #[serde(default)]
    pub message: String,
}

impl ErrorRes {
    pub fn new(error_code: impl Into<ErrorCode>, message: impl Into<String>) -> Self {
        ErrorRes {
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}
