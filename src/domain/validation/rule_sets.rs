use crate::settings::ImageUrlPolicy;

use super::{Check, FieldRule, RuleSet};

/// The rule sets every mutating endpoint is gated by, built once from settings.
#[derive(Debug, Clone)]
pub struct ValidationRules {
    pub project: RuleSet,
    pub contact: RuleSet,
}

impl ValidationRules {
    pub fn new(image_url_policy: ImageUrlPolicy) -> Self {
        ValidationRules {
            project: project_rules(image_url_policy),
            contact: contact_rules(),
        }
    }
}

pub fn project_rules(image_url_policy: ImageUrlPolicy) -> RuleSet {
    let image_url = match image_url_policy {
        ImageUrlPolicy::Required => FieldRule::required("imageUrl")
            .check(Check::NotBlank, "Project image URL is required")
            .check(Check::HttpUrl, "Image URL must be a valid URL starting with http:// or https://")
            .trim(),
        // relative asset paths are allowed here
        ImageUrlPolicy::Optional => FieldRule::optional("imageUrl")
            .check(Check::NotBlank, "Image URL cannot be empty if provided")
            .trim(),
    };

    RuleSet::new()
        .field(
            FieldRule::required("title")
                .check(Check::NotBlank, "Project title is required")
                .check(Check::Text, "Project title must be text")
                .trim()
                .escape(),
        )
        .field(
            FieldRule::required("description")
                .check(Check::NotBlank, "Project description is required")
                .check(Check::Text, "Project description must be text")
                .trim()
                .escape(),
        )
        .field(image_url)
        .field(
            FieldRule::optional_falsy("demoUrl")
                .check(Check::HttpUrl, "Demo URL must be a valid URL starting with http:// or https://")
                .trim(),
        )
        .field(
            FieldRule::optional_falsy("codeUrl")
                .check(Check::HttpUrl, "Code URL must be a valid URL starting with http:// or https://")
                .trim(),
        )
        .field(
            FieldRule::optional("categories")
                .check(Check::TextList, "Categories must be an array of strings")
                .trim()
                .escape(),
        )
        .field(
            FieldRule::optional("techStack")
                .check(Check::TextList, "Tech stack must be an array of strings")
                .trim()
                .escape(),
        )
        .field(
            FieldRule::optional("tags")
                .check(Check::TextList, "Tags must be an array of strings")
                .trim()
                .escape(),
        )
}

pub fn contact_rules() -> RuleSet {
    RuleSet::new()
        .field(
            FieldRule::required("name")
                .check(Check::NotBlank, "Name is required")
                .check(Check::Text, "Name must be text")
                .trim()
                .escape(),
        )
        .field(
            FieldRule::required("email")
                .check(Check::NotBlank, "Email is required")
                .check(Check::Email, "Please provide a valid email address")
                .normalize_email(),
        )
        .field(
            FieldRule::required("message")
                .check(Check::NotBlank, "Message is required")
                .check(Check::Text, "Message must be text")
                .trim()
                .escape(),
        )
}
