use core::result::Result;
use validator::ValidationError;

use crate::utils::valid_id;

/// Validates a record id in the shape produced by `generate_id`
pub fn uuid(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new("uuid").with_message("id is required".into()));
    }
    match valid_id(value) {
        true => Ok(()),
        false => Err(ValidationError::new("uuid").with_message("invalid id".into())),
    }
}
