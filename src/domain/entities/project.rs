use std::borrow::Cow;

use bson::{oid::ObjectId, serde_helpers::serialize_object_id_as_hex_string};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    domain::validation::is_http_url,
    entities::{
        option_fields::OptionField,
        timestamps::{next_update, now_millis},
    },
    errors::AppError,
    settings::ImageUrlPolicy,
};

// ───── Stored entity ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,

    #[validate(length(min = 1, message = "Project title is required"))]
    pub title: String,

    #[validate(length(min = 1, message = "Project description is required"))]
    pub description: String,

    pub image_url: Option<String>,

    #[validate(custom(function = "validate_http_url", message = "Demo URL must be a valid http(s) URL"))]
    pub demo_url: Option<String>,

    #[validate(custom(function = "validate_http_url", message = "Code URL must be a valid http(s) URL"))]
    pub code_url: Option<String>,

    pub categories: Vec<String>,
    pub tech_stack: Vec<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ───── Requests (already gated by the project rule set) ─────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub demo_url: Option<String>,
    #[serde(default)]
    pub code_url: Option<String>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde(default)]
    pub tech_stack: Option<Vec<String>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectPatch {
    pub title: OptionField<String>,
    pub description: OptionField<String>,
    pub image_url: OptionField<String>,
    pub demo_url: OptionField<String>,
    pub code_url: OptionField<String>,
    pub categories: OptionField<Vec<String>>,
    pub tech_stack: OptionField<Vec<String>>,
    pub tags: OptionField<Vec<String>>,
}

// ───── Behaviour ────────────────────────────────────────────────────

impl Project {
    /// Materializes a new project with a fresh id and matching timestamps.
    pub fn new(request: NewProject) -> Self {
        let now = now_millis();
        Project {
            id: ObjectId::new(),
            title: request.title,
            description: request.description,
            image_url: request.image_url,
            demo_url: request.demo_url,
            code_url: request.code_url,
            categories: request.categories.unwrap_or_default(),
            tech_stack: request.tech_stack.unwrap_or_default(),
            tags: request.tags.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies only the supplied fields, then refreshes `updated_at`.
    /// `id` and `created_at` are never touched.
    pub fn apply(&mut self, patch: ProjectPatch) {
        patch.title.assign_or_default(&mut self.title);
        patch.description.assign_or_default(&mut self.description);
        patch.image_url.assign_to(&mut self.image_url);
        patch.demo_url.assign_to(&mut self.demo_url);
        patch.code_url.assign_to(&mut self.code_url);
        patch.categories.assign_or_default(&mut self.categories);
        patch.tech_stack.assign_or_default(&mut self.tech_stack);
        patch.tags.assign_or_default(&mut self.tags);
        self.updated_at = next_update(self.updated_at);
    }

    /// Storage-level schema check run on every document before it is written.
    pub fn check_schema(&self, image_url_policy: ImageUrlPolicy) -> Result<(), AppError> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if image_url_policy == ImageUrlPolicy::Required
            && !self.image_url.as_deref().is_some_and(is_http_url)
        {
            errors.add("image_url", new_validation_error("image_url_required", "Project image URL is required"));
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors.into())
        }
    }
}

fn validate_http_url(url: &str) -> Result<(), ValidationError> {
    if is_http_url(url) {
        Ok(())
    } else {
        Err(new_validation_error("invalid_url", "URL must start with http:// or https://"))
    }
}

fn new_validation_error(code: &'static str, msg: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(msg));
    err
}
