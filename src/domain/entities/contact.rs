use bson::{oid::ObjectId, serde_helpers::serialize_object_id_as_hex_string};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::{domain::validation::is_email, entities::timestamps::now_millis, errors::AppError};

#[derive(Debug, Clone, Deserialize)]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// A submitted contact-form message. Never updated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    #[serde(serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,

    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(custom(function = "validate_email", message = "Please provide a valid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContactMessage {
    pub fn new(form: NewContactMessage) -> Self {
        let now = now_millis();
        ContactMessage {
            id: ObjectId::new(),
            name: form.name,
            email: form.email,
            message: form.message,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn check_schema(&self) -> Result<(), AppError> {
        self.validate().map_err(AppError::from)
    }
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    if is_email(email) {
        Ok(())
    } else {
        Err(ValidationError::new("email"))
    }
}
