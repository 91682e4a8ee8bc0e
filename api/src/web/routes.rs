use axum::{
    Router, middleware,
    routing::{any, get},
};

use super::{
    handler::{
        create_password_handler, delete_password_handler, get_password_handler,
        health_live_handler, health_ready_handler, home_handler, list_passwords_handler,
        not_found_handler, openapi_handler, update_password_handler,
    },
    middleware::password_middleware,
};
use crate::state::AppState;

pub fn all_routes(state: AppState) -> Router {
    Router::new()
        .merge(public_routes(state.clone()))
        .nest("/password", password_routes(state.clone()))
        .fallback(any(not_found_handler))
        .with_state(state)
}

fn public_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(home_handler))
        .route("/health/liveness", get(health_live_handler))
        .route("/health/readiness", get(health_ready_handler))
        .route("/openapi.json", get(openapi_handler))
        .with_state(state)
}

fn password_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_passwords_handler).post(create_password_handler),
        )
        .nest("/{id}", inner_password_routes(state.clone()))
        .with_state(state)
}

fn inner_password_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(get_password_handler)
                .put(update_password_handler)
                .delete(delete_password_handler),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            password_middleware,
        ))
        .with_state(state)
}
