use bson::oid::ObjectId;

use crate::errors::AppError;

/// Parses a client-supplied identifier. Anything that is not a 24-digit hex
/// ObjectId is rejected before storage is touched.
pub fn valid_object_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id.trim()).map_err(|_| AppError::invalid_id("id"))
}
