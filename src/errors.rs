use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error; // Use thiserror for cleaner error definitions

// --- Domain/Infrastructure Errors ---

#[derive(Error, Debug)]
pub enum RepoError {
    #[error("{entity} not found with ID: {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflicting record: {0}")]
    Conflict(String),

    #[error("Database backend error: {0}")]
    BackendError(#[from] anyhow::Error), // Wrap Anyhow errors from DB layer
}

impl RepoError {
    pub fn category_not_found(id: i64) -> Self {
        RepoError::NotFound { entity: "Photo category", id }
    }

    pub fn photo_not_found(id: i64) -> Self {
        RepoError::NotFound { entity: "Photo", id }
    }

    /// Classifies a sqlx error, keeping constraint violations apart from backend failures.
    pub fn from_sqlx(err: sqlx::Error, context: impl Into<String>) -> Self {
        use sqlx::error::ErrorKind;

        if let sqlx::Error::Database(db_err) = &err {
            match db_err.kind() {
                ErrorKind::UniqueViolation => {
                    return RepoError::Conflict(db_err.message().to_string());
                }
                ErrorKind::CheckViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::ForeignKeyViolation => {
                    return RepoError::Validation(db_err.message().to_string());
                }
                _ => {}
            }
        }

        RepoError::BackendError(anyhow::Error::new(err).context(context.into()))
    }
}

// --- Web Layer Error ---

#[derive(Error, Debug)]
pub enum AppError {
    // Input validation / request parsing errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid JSON body: {0}")]
    JsonBody(#[from] JsonRejection),
    #[error("Invalid path parameter: {0}")]
    PathParam(#[from] PathRejection),
    #[error("Invalid query parameters: {0}")]
    QueryParams(#[from] QueryRejection),

    // Domain/Service level errors (mapped from RepoError)
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Could not complete database operation")]
    RepositoryError(#[source] RepoError), // Source allows seeing underlying RepoError
}

// --- Conversions from Domain Errors to AppError ---

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            e @ RepoError::NotFound { .. } => AppError::NotFound(e.to_string()),
            RepoError::Validation(msg) => AppError::InvalidInput(msg),
            e @ (RepoError::Conflict(_) | RepoError::InvalidState(_)) => {
                AppError::Conflict(e.to_string())
            }
            e @ RepoError::BackendError(_) => AppError::RepositoryError(e),
        }
    }
}

// --- Axum Response Implementation ---

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            // 4xx Client Errors
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::JsonBody(e) => (StatusCode::BAD_REQUEST, e.body_text()),
            AppError::PathParam(e) => (StatusCode::BAD_REQUEST, e.body_text()),
            AppError::QueryParams(e) => (StatusCode::BAD_REQUEST, e.body_text()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),

            // 5xx Server Errors
            AppError::RepositoryError(e) => {
                tracing::error!(error.source = ?e, "Repository error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "Database operation failed".to_string())
            }
        };

        if status.is_server_error() {
            tracing::error!(
                error.message = %error_message,
                error.detail = %self,
                "Responding with error"
            );
        } else {
            tracing::debug!(
                error.message = %error_message,
                error.status = %status,
                "Responding with client error"
            );
        }

        let body = Json(serde_json::json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_errors_map_to_expected_status_codes() {
        let cases = [
            (RepoError::photo_not_found(7), StatusCode::NOT_FOUND),
            (RepoError::Validation("title is required".into()), StatusCode::BAD_REQUEST),
            (RepoError::Conflict("name taken".into()), StatusCode::CONFLICT),
            (RepoError::InvalidState("no likes".into()), StatusCode::CONFLICT),
            (
                RepoError::BackendError(anyhow::anyhow!("disk on fire")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let response = AppError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn not_found_message_names_the_entity() {
        let err = RepoError::category_not_found(42);
        assert_eq!(err.to_string(), "Photo category not found with ID: 42");
    }
}
