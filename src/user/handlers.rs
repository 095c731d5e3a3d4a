use axum::{extract::State, http::StatusCode, Json};
use tracing::{info, instrument, warn};

use crate::error::ApiError;
use crate::state::AppState;
use crate::user::{
    dto::{CreateUserRequest, TokenRequest, TokenResponse, UpdateUserRequest, UserView},
    extractors::AuthUser,
    password,
    repo::{self, AuthToken, User},
    validate,
};

/// POST /user/create — register a new account.
#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserView>), ApiError> {
    let email = validate::validate_email(&payload.email)?;
    validate::validate_password(&payload.password)?;

    let hash = password::hash_password(&payload.password)?;

    let user = User::create(&state.db, &email, &payload.name, &hash)
        .await
        .map_err(|e| {
            if repo::is_unique_violation(&e) {
                warn!(email = %email, "email already registered");
                ApiError::DuplicateEmail
            } else {
                ApiError::Database(e)
            }
        })?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((StatusCode::CREATED, Json(UserView::from(user))))
}

/// POST /user/token — verify credentials and return the account's token.
/// Repeat logins return the same token; nothing rotates it.
#[instrument(skip(state, payload))]
pub async fn create_token(
    State(state): State<AppState>,
    Json(payload): Json<TokenRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    // A blank password can never match a hash; fail before touching the store.
    if payload.password.is_empty() {
        warn!("login with blank password");
        return Err(ApiError::InvalidCredentials);
    }

    let email = validate::normalize_email(&payload.email);

    // Absent account and wrong password collapse to the same outcome.
    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| {
            warn!(email = %email, "login unknown email");
            ApiError::InvalidCredentials
        })?;

    if !password::verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let token = AuthToken::get_or_create(&state.db, user.id).await?;

    info!(user_id = %user.id, "token issued");
    Ok(Json(TokenResponse { token }))
}

/// GET /user/me — profile of the authenticated account, nobody else's.
#[instrument(skip_all)]
pub async fn get_me(AuthUser(user): AuthUser) -> Json<UserView> {
    Json(UserView::from(user))
}

/// PATCH /user/me — update the authenticated account's name and/or password.
#[instrument(skip_all)]
pub async fn update_me(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserView>, ApiError> {
    let password_hash = match payload.password.as_deref() {
        Some(plain) => {
            validate::validate_password(plain)?;
            Some(password::hash_password(plain)?)
        }
        None => None,
    };

    let updated = User::update(
        &state.db,
        user.id,
        payload.name.as_deref(),
        password_hash.as_deref(),
    )
    .await?;

    info!(user_id = %updated.id, "profile updated");
    Ok(Json(UserView::from(updated)))
}

/// POST /user/me — the profile resource is read/update only.
pub async fn reject_post(AuthUser(_user): AuthUser) -> ApiError {
    ApiError::MethodNotAllowed
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt; // for `oneshot`

    use crate::app::build_app;
    use crate::state::AppState;

    // The fake state holds a lazily-connecting pool, so any request that
    // reaches the database fails; every test below must be rejected before
    // the store is consulted.
    fn app() -> axum::Router {
        build_app(AppState::fake())
    }

    fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_is_public() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn create_rejects_short_password() {
        let body = serde_json::json!({
            "email": "test2@example.com",
            "password": "pw",
            "name": "Test name"
        });
        let response = app().oneshot(json_post("/user/create", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["error"], "password too short");
    }

    #[tokio::test]
    async fn create_rejects_four_char_password_boundary() {
        let body = serde_json::json!({
            "email": "test@example.com",
            "password": "pwd1",
            "name": "Test User"
        });
        let response = app().oneshot(json_post("/user/create", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_rejects_invalid_email() {
        let body = serde_json::json!({
            "email": "not-an-email",
            "password": "password123",
            "name": "Test User"
        });
        let response = app().oneshot(json_post("/user/create", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["error"], "invalid email");
    }

    #[tokio::test]
    async fn token_rejects_blank_password_before_store_lookup() {
        let body = serde_json::json!({
            "email": "test@example.com",
            "password": ""
        });
        let response = app().oneshot(json_post("/user/token", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(value["token"].is_null());
        assert_eq!(
            value["error"],
            "unable to authenticate with provided credentials"
        );
    }

    #[tokio::test]
    async fn me_requires_authentication() {
        let response = app()
            .oneshot(Request::builder().uri("/user/me").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn me_rejects_non_bearer_scheme() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/user/me")
                    .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn patch_me_requires_authentication() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri("/user/me")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name": "New Name"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn post_me_without_token_fails_authentication_first() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/user/me")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
