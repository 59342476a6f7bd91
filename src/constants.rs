use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

pub const PROJECTS_COLLECTION: &str = "projects";
pub const CONTACTS_COLLECTION: &str = "contacts";

/// Client-facing message catalogue.
pub mod messages {
    pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";
    pub const INVALID_ID: &str = "Invalid ID format";
    pub const VALIDATION_FAILED: &str = "Input validation failed";
    pub const MISSING_CREDENTIALS: &str = "Missing or invalid credentials";
    pub const ROUTE_NOT_FOUND: &str = "Route not found";
    pub const CONTACT_RECEIVED: &str = "Message received successfully!";

    pub fn not_found(resource: &str) -> String {
        format!("{} not found", resource)
    }
}
