use axum::{
    body::Body,
    extract::{Path, Request, State},
    middleware::Next,
    response::Response,
};
use validator::Validate;

use crate::{Result, error::BadRequestSnafu, password::get_password, state::AppState};

use super::params::PasswordParams;

pub async fn password_middleware(
    State(state): State<AppState>,
    Path(params): Path<PasswordParams>,
    mut request: Request,
    next: Next,
) -> Result<Response<Body>> {
    if params.validate().is_err() {
        return BadRequestSnafu {
            msg: "Invalid password id",
        }
        .fail();
    }

    let password = get_password(&state, &params.id).await?;

    // Forward to the next middleware/handler passing the password information
    request.extensions_mut().insert(password);
    let response = next.run(request).await;
    Ok(response)
}
