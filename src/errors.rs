use std::fmt;

use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse
};
use derive_more::Display;
use mongodb::error::{ErrorKind, WriteFailure};
use serde::Serialize;
use validator::ValidationErrors;

use crate::constants::messages;

/// MongoDB server code for a unique index violation.
const DUPLICATE_KEY: i32 = 11000;
/// MongoDB server code for a `$jsonSchema` collection validator rejection.
const DOCUMENT_VALIDATION_FAILURE: i32 = 121;

/// Where a malformed identifier was detected.
///
/// Identifiers rejected at the request boundary are a client mistake (400),
/// while a cast failure raised by the storage layer is reported as a missing
/// resource (404).
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceOrigin {
    #[display("request")]
    Request,

    #[display("storage")]
    Storage,
}

/// Every failure a request can end in. `ResponseError` below is the single
/// place that turns these into client-facing bodies.
#[derive(Debug)]
pub enum AppError {
    ValidationError(Vec<FieldError>),
    SchemaViolation(Vec<String>),
    MalformedReference { field: String, origin: ReferenceOrigin },
    NotFound(String),
    Conflict(String),
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(errors) => {
                let messages = errors.iter()
                    .map(|e| format!("{}:{}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "validation error: {}", messages)
            }
            AppError::SchemaViolation(messages) => {
                write!(f, "Invalid input data. {}", messages.join(". "))
            }
            AppError::MalformedReference { field, origin: ReferenceOrigin::Request } => {
                write!(f, "{} ({})", messages::INVALID_ID, field)
            }
            AppError::MalformedReference { field, origin: ReferenceOrigin::Storage } => {
                write!(f, "Resource not found. Invalid field: {}", field)
            }
            AppError::NotFound(resource) => write!(f, "{}", messages::not_found(resource)),
            AppError::Conflict(field) => write!(f, "Duplicate field value entered for: {}", field),
            AppError::InternalError(msg) => write!(f, "Internal server error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a [FieldError]>,
}

impl AppError {
    /// The message a client is allowed to see. Internal details never leave the server.
    pub fn public_message(&self) -> String {
        match self {
            AppError::ValidationError(_) => messages::VALIDATION_FAILED.to_string(),
            AppError::MalformedReference { origin: ReferenceOrigin::Request, .. } => {
                messages::INVALID_ID.to_string()
            }
            AppError::InternalError(_) => messages::INTERNAL_SERVER_ERROR.to_string(),
            _ => self.to_string(),
        }
    }

    pub fn invalid_id(field: &str) -> Self {
        AppError::MalformedReference {
            field: field.to_string(),
            origin: ReferenceOrigin::Request,
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "request rejected");
        }

        let errors = match self {
            AppError::ValidationError(errors) => Some(errors.as_slice()),
            _ => None,
        };

        HttpResponse::build(status)
            .insert_header(ContentType::json())
            .json(ErrorBody {
                success: false,
                error: self.public_message(),
                errors,
            })
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::SchemaViolation(_) => StatusCode::BAD_REQUEST,
            AppError::MalformedReference { origin: ReferenceOrigin::Request, .. } => StatusCode::BAD_REQUEST,
            AppError::MalformedReference { origin: ReferenceOrigin::Storage, .. } => StatusCode::NOT_FOUND,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Storage-level schema failures. All sub-field messages collapse into one
/// `SchemaViolation`, ordered by field name.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = errors.field_errors().into_iter().collect::<Vec<_>>();
        fields.sort_by(|(a, _), (b, _)| a.cmp(b));

        let messages = fields
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field))
                })
            })
            .collect();

        AppError::SchemaViolation(messages)
    }
}

/// Cast failure on an identifier coming back from storage. The repositories
/// only read typed `ObjectId`s today, so nothing in the request path raises it;
/// it completes the malformed-reference kind for storage-origin ids.
impl From<bson::oid::Error> for AppError {
    fn from(_: bson::oid::Error) -> Self {
        AppError::MalformedReference {
            field: "_id".to_string(),
            origin: ReferenceOrigin::Storage,
        }
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        let server_error = match err.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(e)) => Some((e.code, e.message.as_str())),
            ErrorKind::Command(e) => Some((e.code, e.message.as_str())),
            _ => None,
        };

        match server_error {
            Some((DUPLICATE_KEY, message)) => {
                let field = duplicate_key_field(message).unwrap_or("unknown");
                AppError::Conflict(field.to_string())
            }
            Some((DOCUMENT_VALIDATION_FAILURE, message)) => {
                AppError::SchemaViolation(vec![message.to_string()])
            }
            _ => AppError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Infrastructure helpers report through `anyhow`; inside a request any such
/// failure is internal.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}

/// Pulls the first key name out of a server message such as
/// `E11000 duplicate key error collection: db.projects index: title_1 dup key: { title: "x" }`.
fn duplicate_key_field(message: &str) -> Option<&str> {
    let (_, keys) = message.split_once("dup key: {")?;
    let (field, _) = keys.split_once(':')?;
    let field = field.trim();
    (!field.is_empty()).then_some(field)
}

/// Rejections from the optional admin-token guard.
#[derive(Debug, Display)]
pub enum AccessError {
    #[display("{}", messages::MISSING_CREDENTIALS)]
    MissingCredentials,
}

impl ResponseError for AccessError {
    fn error_response(&self) -> HttpResponse {
        tracing::warn!(error = %self, "admin access denied");
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({"success": false, "error": self.to_string()}))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AccessError::MissingCredentials => StatusCode::UNAUTHORIZED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            message: message.into(),
        }
    }
}
