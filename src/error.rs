//! Application error type shared by every layer.
//!
//! Each variant carries a developer-facing `message` and structured `details`.
//! The JSON API returns both; HTML pages show [`AppError::user_message`] instead.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use validator::ValidationErrors;

use crate::domain::reorder::ReorderError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Serialize)]
struct ErrorInfo {
    code: &'static str,
    message: String,
    details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("validation failed: {message}")]
    Validation { message: String, details: Value },

    #[error("not found: {message}")]
    NotFound { message: String, details: Value },

    #[error("conflict: {message}")]
    Conflict { message: String, details: Value },

    #[error("unauthorized: {message}")]
    Unauthorized { message: String, details: Value },

    #[error("session expired: {message}")]
    SessionExpired { message: String, details: Value },

    #[error("forbidden: {message}")]
    Forbidden { message: String, details: Value },

    #[error("data access failed: {message}")]
    DataAccess { message: String, details: Value },

    /// Some writes of a batch succeeded, others did not.
    #[error("partially saved: {message}")]
    PartialSave { message: String, details: Value },

    #[error("render failed: {message}")]
    Render { message: String, details: Value },

    #[error("internal error: {message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }

    pub fn session_expired(message: impl Into<String>, details: Value) -> Self {
        Self::SessionExpired {
            message: message.into(),
            details,
        }
    }

    pub fn forbidden(message: impl Into<String>, details: Value) -> Self {
        Self::Forbidden {
            message: message.into(),
            details,
        }
    }

    pub fn data_access(message: impl Into<String>, details: Value) -> Self {
        Self::DataAccess {
            message: message.into(),
            details,
        }
    }

    pub fn partial_save(message: impl Into<String>, details: Value) -> Self {
        Self::PartialSave {
            message: message.into(),
            details,
        }
    }

    pub fn render(message: impl Into<String>, details: Value) -> Self {
        Self::Render {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Stable machine-readable code, used in JSON bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::NotFound { .. } => "not_found",
            Self::Conflict { .. } => "conflict",
            Self::Unauthorized { .. } => "unauthorized",
            Self::SessionExpired { .. } => "session_expired",
            Self::Forbidden { .. } => "forbidden",
            Self::DataAccess { .. } => "data_access_error",
            Self::PartialSave { .. } => "partial_save",
            Self::Render { .. } => "render_error",
            Self::Internal { .. } => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Unauthorized { .. } | Self::SessionExpired { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::DataAccess { .. } | Self::PartialSave { .. } => StatusCode::BAD_GATEWAY,
            Self::Render { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Validation { message, .. }
            | Self::NotFound { message, .. }
            | Self::Conflict { message, .. }
            | Self::Unauthorized { message, .. }
            | Self::SessionExpired { message, .. }
            | Self::Forbidden { message, .. }
            | Self::DataAccess { message, .. }
            | Self::PartialSave { message, .. }
            | Self::Render { message, .. }
            | Self::Internal { message, .. } => message,
        }
    }

    pub fn details(&self) -> &Value {
        match self {
            Self::Validation { details, .. }
            | Self::NotFound { details, .. }
            | Self::Conflict { details, .. }
            | Self::Unauthorized { details, .. }
            | Self::SessionExpired { details, .. }
            | Self::Forbidden { details, .. }
            | Self::DataAccess { details, .. }
            | Self::PartialSave { details, .. }
            | Self::Render { details, .. }
            | Self::Internal { details, .. } => details,
        }
    }

    /// Message shown to administrators in the web front end.
    ///
    /// Validation and conflict messages are already written for people and are
    /// passed through; everything else maps to a fixed Icelandic text.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message, .. } | Self::Conflict { message, .. } => message.clone(),
            Self::NotFound { .. } => "Færslan fannst ekki.".to_string(),
            Self::Unauthorized { .. } => "Rangt netfang eða lykilorð.".to_string(),
            Self::SessionExpired { .. } => {
                "Innskráningin þín er útrunnin. Vinsamlegast skráðu þig inn aftur.".to_string()
            }
            Self::Forbidden { .. } => "Þessi gagnagjafi er aðeins til lestrar.".to_string(),
            Self::DataAccess { .. } => {
                "Villa kom upp við að sækja íbúa. Vinsamlegast reyndu aftur.".to_string()
            }
            Self::PartialSave { .. } => {
                "Aðeins hluti breytinganna vistaðist. Vinsamlegast reyndu aftur.".to_string()
            }
            Self::Render { .. } => {
                "Villa kom upp við að búa til skjal. Vinsamlegast reyndu aftur.".to_string()
            }
            Self::Internal { .. } => "Óvænt villa kom upp.".to_string(),
        }
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired { .. })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        if status.is_server_error() {
            tracing::error!(code, error = %self, "Request failed");
        }

        let (message, details) = match self {
            Self::Validation { message, details }
            | Self::NotFound { message, details }
            | Self::Conflict { message, details }
            | Self::Unauthorized { message, details }
            | Self::SessionExpired { message, details }
            | Self::Forbidden { message, details }
            | Self::DataAccess { message, details }
            | Self::PartialSave { message, details }
            | Self::Render { message, details }
            | Self::Internal { message, details } => (message, details),
        };

        let body = ErrorBody {
            error: ErrorInfo {
                code,
                message,
                details,
            },
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                axum::http::header::WWW_AUTHENTICATE,
                axum::http::HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if matches!(e, sqlx::Error::RowNotFound) {
            return AppError::not_found("Record not found", json!({}));
        }

        if let Some(db) = e.as_database_error() {
            if db.is_unique_violation() {
                return AppError::conflict(
                    "Unique constraint violation",
                    json!({ "constraint": db.constraint() }),
                );
            }
            // SQLSTATE class 28: credentials rejected by the server
            if db.code().is_some_and(|code| code.starts_with("28")) {
                return AppError::session_expired(
                    "Database rejected credentials",
                    json!({ "code": db.code() }),
                );
            }
        }

        tracing::warn!(error = %e, "Database error");
        AppError::data_access("Database error", json!({ "reason": e.to_string() }))
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let fields: serde_json::Map<String, Value> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let messages: Vec<String> = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                (field.to_string(), json!(messages))
            })
            .collect();

        AppError::bad_request("Ógild gildi í innsendum gögnum.", json!({ "fields": fields }))
    }
}

impl From<ReorderError> for AppError {
    fn from(e: ReorderError) -> Self {
        match e {
            ReorderError::InvalidTransition { .. } => {
                AppError::conflict(e.to_string(), json!({ "reason": "invalid_transition" }))
            }
            ReorderError::IndexOutOfRange { index, len } => AppError::bad_request(
                e.to_string(),
                json!({ "index": index, "len": len }),
            ),
            ReorderError::UnsavedResident { .. } => {
                AppError::bad_request(e.to_string(), json!({ "reason": "unsaved_resident" }))
            }
        }
    }
}
