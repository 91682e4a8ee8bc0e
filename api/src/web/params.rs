use serde::Deserialize;
use validator::Validate;

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct PasswordParams {
    #[validate(custom(function = "vault::validators::uuid"))]
    pub id: String,
}
