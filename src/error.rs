use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use snafu::Snafu;

pub type AcademicaResult<T> = Result<T, AcademicaError>;
pub type StoreResult<T> = Result<T, StoreError>;
pub type ClientResult<T> = Result<T, ClientError>;

/// Failures raised by a storage backend. Handlers wrap these in [`AcademicaError::Store`]
/// to say which operation was running.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum StoreError {
    #[snafu(display("Error making SQL query"))]
    MakeQuery { source: sqlx::Error },
    #[snafu(display("Email {email:?} is already in use"))]
    DuplicateEmail { email: String },
    #[snafu(display("Storage backend is unavailable"))]
    Unavailable,
}

impl StoreError {
    /// Sorts a failed write into a uniqueness conflict or a plain query error.
    pub fn from_write(source: sqlx::Error, email: &str) -> Self {
        let is_unique_violation = source
            .as_database_error()
            .is_some_and(|db_error| db_error.is_unique_violation());

        if is_unique_violation {
            Self::DuplicateEmail {
                email: email.to_owned(),
            }
        } else {
            Self::MakeQuery { source }
        }
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum AcademicaError {
    #[snafu(display("Error parsing database URL"))]
    ParseDatabaseUrl { source: sqlx::Error },
    #[snafu(display("Error opening database"))]
    OpenDatabase { source: sqlx::Error },
    #[snafu(display("Error migrating DB schema"))]
    MigrateError { source: sqlx::migrate::MigrateError },
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Env var `{}` is set but empty", name))]
    EmptyEnvVar { name: &'static str },
    #[snafu(display("Failed to {} {}", action, noun))]
    Store {
        source: StoreError,
        action: &'static str,
        noun: &'static str,
    },
    #[snafu(display("Missing required fields: {}", fields.join(", ")))]
    MissingRequiredFields { fields: Vec<&'static str> },
    #[snafu(display("Invalid date {:?} for `{}`, expected YYYY-MM-DD", original, field))]
    InvalidDate {
        source: chrono::ParseError,
        field: &'static str,
        original: String,
    },
    #[snafu(display("Invalid request body: {}", source.body_text()))]
    InvalidBody { source: JsonRejection },
    #[snafu(display("Invalid id: {}", source.body_text()))]
    InvalidId { source: PathRejection },
    #[snafu(display("Not found"))]
    MissingRecord { noun: &'static str, id: i64 },
}

impl From<JsonRejection> for AcademicaError {
    fn from(source: JsonRejection) -> Self {
        Self::InvalidBody { source }
    }
}

impl From<PathRejection> for AcademicaError {
    fn from(source: PathRejection) -> Self {
        Self::InvalidId { source }
    }
}

impl AcademicaError {
    #[allow(clippy::match_same_arms)]
    pub fn status_code(&self) -> StatusCode {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error
        const NF: StatusCode = StatusCode::NOT_FOUND; //not found
        const BI: StatusCode = StatusCode::BAD_REQUEST; //bad input

        match self {
            Self::ParseDatabaseUrl { .. } | Self::OpenDatabase { .. } => ISE,
            Self::MigrateError { .. } => ISE,
            Self::BadEnvVar { .. } | Self::EmptyEnvVar { .. } => ISE,
            Self::Store { source, .. } => match source {
                StoreError::DuplicateEmail { .. } => StatusCode::CONFLICT,
                StoreError::MakeQuery { .. } | StoreError::Unavailable => ISE,
            },
            Self::MissingRequiredFields { .. } => BI,
            Self::InvalidDate { .. } => BI,
            Self::InvalidBody { source } => source.status(),
            Self::InvalidId { .. } => BI,
            Self::MissingRecord { .. } => NF,
        }
    }

    /// The short message clients see. Full details only go to the logs.
    pub fn client_message(&self) -> String {
        match self {
            Self::Store {
                source: StoreError::DuplicateEmail { .. },
                ..
            } => "Email already exists".to_owned(),
            _ => self.to_string(),
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for AcademicaError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        if status_code.is_server_error() {
            error!(?self, "Error!");
        } else {
            warn!(?self, "Rejected request");
        }

        let body = ErrorBody {
            error: self.client_message(),
        };
        (status_code, Json(body)).into_response()
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ClientError {
    #[snafu(display("Unable to {} {}", action, noun))]
    Request {
        source: reqwest::Error,
        action: &'static str,
        noun: &'static str,
    },
    #[snafu(display("Server refused to {} {} ({}): {}", action, noun, status, message))]
    Rejected {
        status: reqwest::StatusCode,
        message: String,
        action: &'static str,
        noun: &'static str,
    },
}
