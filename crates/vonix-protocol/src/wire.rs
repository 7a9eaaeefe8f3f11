//! Exact JSON bodies for each registration endpoint.
//!
//! Field names match the server verbatim (`minecraft_uuid`, not `uuid`),
//! so these structs can be serialized and deserialized without renames.
//!
//! ```text
//! POST /registration/check-registration  { minecraft_uuid }
//! POST /registration/generate-code       { minecraft_username, minecraft_uuid }
//! POST /registration/minecraft-login     { minecraft_username, minecraft_uuid, password }
//! ```
//!
//! Every non-200 response carries an [`ErrorBody`].

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::UserInfo;

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRegistrationRequest {
    pub minecraft_uuid: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateCodeRequest {
    pub minecraft_username: String,
    pub minecraft_uuid: Uuid,
}

/// Login request. The password is sent to the API but must never show up
/// in logs, hence the hand-written `Debug`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub minecraft_username: String,
    pub minecraft_uuid: Uuid,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("minecraft_username", &self.minecraft_username)
            .field("minecraft_uuid", &self.minecraft_uuid)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// `200` body of `check-registration`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckRegistrationResponse {
    pub registered: bool,
    #[serde(default)]
    pub user: Option<UserInfo>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `200` body of `generate-code`.
///
/// `expires_in` is in seconds. Older servers leave it out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateCodeResponse {
    pub code: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub minecraft_username: Option<String>,
}

/// `200` body of `minecraft-login`.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<UserInfo>,
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("success", &self.success)
            .field("message", &self.message)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user", &self.user)
            .finish()
    }
}

/// Body of every non-200 response.
///
/// The API-key middleware adds a longer `message` next to `error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! The server is the source of truth for these shapes; these tests pin
    //! the exact field names we send and accept.

    use super::*;

    fn uuid() -> Uuid {
        "069a79f4-44e9-4726-a5be-fca90e38aaf5".parse().unwrap()
    }

    #[test]
    fn test_check_registration_request_json_format() {
        let req = CheckRegistrationRequest {
            minecraft_uuid: uuid(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "minecraft_uuid": "069a79f4-44e9-4726-a5be-fca90e38aaf5"
            })
        );
    }

    #[test]
    fn test_login_request_json_format() {
        let req = LoginRequest {
            minecraft_username: "Notch".into(),
            minecraft_uuid: uuid(),
            password: "hunter22 with spaces".into(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["minecraft_username"], "Notch");
        assert_eq!(json["password"], "hunter22 with spaces");
        assert_eq!(json.as_object().unwrap().len(), 3);
    }

    #[test]
    fn test_login_request_debug_redacts_password() {
        let req = LoginRequest {
            minecraft_username: "Notch".into(),
            minecraft_uuid: uuid(),
            password: "hunter22".into(),
        };
        let printed = format!("{req:?}");
        assert!(!printed.contains("hunter22"));
    }

    #[test]
    fn test_check_registration_response_unregistered_has_no_user() {
        let json = r#"{"registered": false, "message": "User not registered"}"#;
        let resp: CheckRegistrationResponse = serde_json::from_str(json).unwrap();
        assert!(!resp.registered);
        assert_eq!(resp.user, None);
    }

    #[test]
    fn test_generate_code_response_without_expiry() {
        let resp: GenerateCodeResponse =
            serde_json::from_str(r#"{"code": "ABC123"}"#).unwrap();
        assert_eq!(resp.code, "ABC123");
        assert_eq!(resp.expires_in, None);
    }

    #[test]
    fn test_login_response_missing_success_returns_error() {
        let json = r#"{"message": "Welcome back"}"#;
        assert!(serde_json::from_str::<LoginResponse>(json).is_err());
    }

    #[test]
    fn test_error_body_ignores_extra_fields() {
        // generate-code adds the existing username next to the error.
        let json = r#"{"error": "This Minecraft account is already registered", "username": "steve"}"#;
        let body: ErrorBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.error, "This Minecraft account is already registered");
        assert_eq!(body.message, None);
    }
}
