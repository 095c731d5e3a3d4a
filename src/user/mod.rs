use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod password;
pub mod repo;
pub mod token;
pub mod validate;
pub(crate) mod extractors;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/user/create", post(handlers::create_user))
        .route("/user/token", post(handlers::create_token))
        .route(
            "/user/me",
            get(handlers::get_me)
                .patch(handlers::update_me)
                .post(handlers::reject_post),
        )
}
