use serde::{Deserialize, Serialize};

use crate::user::repo::User;

/// Request body for registration.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Request body for token issuance.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub email: String,
    pub password: String,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Request body for profile updates. Both fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub password: Option<String>,
}

/// Public view of an account. This is the only user shape that ever leaves
/// the API; the credential hash stays behind.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub name: String,
    pub email: String,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            name: user.name,
            email: user.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_view_exposes_only_name_and_email() {
        let view = UserView {
            name: "Test User".into(),
            email: "test@example.com".into(),
        };
        let value = serde_json::to_value(&view).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj["name"], "Test User");
        assert_eq!(obj["email"], "test@example.com");
        assert!(!value.to_string().contains("password"));
    }

    #[test]
    fn token_response_serializes_token_field() {
        let response = TokenResponse {
            token: "abc123".into(),
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["token"], "abc123");
    }

    #[test]
    fn update_request_fields_are_optional() {
        let patch: UpdateUserRequest = serde_json::from_str(r#"{"name": "New Name"}"#).unwrap();
        assert_eq!(patch.name.as_deref(), Some("New Name"));
        assert!(patch.password.is_none());

        let empty: UpdateUserRequest = serde_json::from_str("{}").unwrap();
        assert!(empty.name.is_none());
        assert!(empty.password.is_none());
    }
}
