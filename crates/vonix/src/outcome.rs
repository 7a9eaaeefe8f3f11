//! Folding API results into the handful of cases a player can see.
//!
//! The API client reports failure two ways: `Err(ApiError)` for transport
//! problems and non-200 responses, and `Ok(LoginResult { success: false })`
//! when the server answered but said no. Players don't care which, so each
//! command collapses both into one outcome enum here, on the worker task,
//! before anything goes back to the main context.
//!
//! Server messages are matched by case-insensitive substring. Transport,
//! decode and timeout errors are never matched; they're shown as is.

use vonix_api::ApiError;
use vonix_protocol::{LoginResult, RegistrationCode, UserInfo};
use vonix_session::SessionToken;

const ALREADY_REGISTERED: &str = "already registered";
const ACCOUNT_NOT_FOUND: &str = "account not found";
const INVALID_PASSWORD: &str = "invalid password";

fn mentions(message: &str, needle: &str) -> bool {
    message.to_lowercase().contains(needle)
}

// ---------------------------------------------------------------------------
// Register
// ---------------------------------------------------------------------------

/// What `/vonix register` ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// The server issued a code.
    Code(RegistrationCode),
    /// The player's UUID is already linked to an account.
    AlreadyRegistered,
    /// Anything else, with the text to show.
    Failed(String),
}

impl RegisterOutcome {
    pub fn from_result(result: Result<RegistrationCode, ApiError>) -> Self {
        match result {
            Ok(code) => Self::Code(code),
            Err(ApiError::Api { message, .. }) if mentions(&message, ALREADY_REGISTERED) => {
                Self::AlreadyRegistered
            }
            Err(err) => Self::Failed(err.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// What `/vonix login` ended up doing.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    /// Credentials accepted. The only outcome that touches the session store.
    LoggedIn {
        message: String,
        token: SessionToken,
        user: UserInfo,
    },
    /// No website account is linked to this player.
    AccountNotFound,
    /// The account exists but the password was wrong.
    InvalidPassword,
    /// Anything else, with the text to show.
    Failed(String),
}

impl LoginOutcome {
    pub fn from_result(result: Result<LoginResult, ApiError>) -> Self {
        match result {
            Ok(LoginResult {
                success: true,
                message,
                token: Some(token),
                user: Some(user),
            }) => Self::LoggedIn {
                message,
                token: SessionToken::new(token),
                user,
            },
            Ok(LoginResult { success: true, .. }) => Self::Failed(
                ApiError::Decode("successful login without token or user".into()).to_string(),
            ),
            Ok(LoginResult { message, .. }) => Self::classify(message),
            Err(ApiError::Api { message, .. }) => Self::classify(message),
            Err(err) => Self::Failed(err.to_string()),
        }
    }

    fn classify(message: String) -> Self {
        if mentions(&message, ACCOUNT_NOT_FOUND) {
            Self::AccountNotFound
        } else if mentions(&message, INVALID_PASSWORD) {
            Self::InvalidPassword
        } else {
            Self::Failed(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use vonix_protocol::Uuid;

    fn api(status: u16, message: &str) -> ApiError {
        ApiError::Api {
            status,
            message: message.into(),
        }
    }

    fn user() -> UserInfo {
        UserInfo {
            id: 3,
            username: "alex".into(),
            minecraft_username: "Alex".into(),
            minecraft_uuid: Uuid::nil(),
            role: "user".into(),
            total_donated: 0.0,
            donation_rank_id: None,
            donation_rank_expires_at: None,
        }
    }

    #[test]
    fn test_register_from_result_code() {
        let code = RegistrationCode {
            code: "A1B2C3".into(),
            expires_in: Duration::from_secs(600),
        };
        assert_eq!(
            RegisterOutcome::from_result(Ok(code.clone())),
            RegisterOutcome::Code(code)
        );
    }

    #[test]
    fn test_register_from_result_409_already_registered() {
        let outcome = RegisterOutcome::from_result(Err(api(409, "already registered")));
        assert_eq!(outcome, RegisterOutcome::AlreadyRegistered);
    }

    #[test]
    fn test_register_from_result_matches_case_insensitively() {
        let outcome = RegisterOutcome::from_result(Err(api(
            400,
            "This Minecraft account is Already Registered",
        )));
        assert_eq!(outcome, RegisterOutcome::AlreadyRegistered);
    }

    #[test]
    fn test_register_from_result_other_api_error_is_raw() {
        let outcome = RegisterOutcome::from_result(Err(api(500, "Internal server error")));
        assert_eq!(outcome, RegisterOutcome::Failed("Internal server error".into()));
    }

    #[test]
    fn test_register_from_result_transport_never_classified() {
        let outcome = RegisterOutcome::from_result(Err(ApiError::Transport(
            "peer says already registered".into(),
        )));
        assert_eq!(
            outcome,
            RegisterOutcome::Failed("transport: peer says already registered".into())
        );
    }

    #[test]
    fn test_login_from_result_success() {
        let outcome = LoginOutcome::from_result(Ok(LoginResult::success("Welcome", "jwt", user())));
        match outcome {
            LoginOutcome::LoggedIn { message, token, user } => {
                assert_eq!(message, "Welcome");
                assert_eq!(token.as_str(), "jwt");
                assert_eq!(user.id, 3);
            }
            other => panic!("expected LoggedIn, got {other:?}"),
        }
    }

    #[test]
    fn test_login_from_result_success_without_token_fails() {
        let result = LoginResult {
            success: true,
            message: "ok".into(),
            token: None,
            user: Some(user()),
        };
        let outcome = LoginOutcome::from_result(Ok(result));
        assert!(matches!(outcome, LoginOutcome::Failed(ref m) if m.starts_with("decode: ")));
    }

    #[test]
    fn test_login_from_result_503_account_not_found() {
        let outcome = LoginOutcome::from_result(Err(api(503, "Account not found")));
        assert_eq!(outcome, LoginOutcome::AccountNotFound);
    }

    #[test]
    fn test_login_from_result_domain_failure_account_not_found() {
        let outcome = LoginOutcome::from_result(Ok(LoginResult::failure(
            "Account not found. Please register first using /vonixregister",
        )));
        assert_eq!(outcome, LoginOutcome::AccountNotFound);
    }

    #[test]
    fn test_login_from_result_invalid_password() {
        assert_eq!(
            LoginOutcome::from_result(Err(api(401, "Invalid password"))),
            LoginOutcome::InvalidPassword
        );
        assert_eq!(
            LoginOutcome::from_result(Ok(LoginResult::failure("INVALID PASSWORD"))),
            LoginOutcome::InvalidPassword
        );
    }

    #[test]
    fn test_login_from_result_unmatched_is_raw() {
        let outcome = LoginOutcome::from_result(Ok(LoginResult::failure("Account locked")));
        assert_eq!(outcome, LoginOutcome::Failed("Account locked".into()));
    }

    #[test]
    fn test_login_from_result_timeout_is_verbatim() {
        let outcome =
            LoginOutcome::from_result(Err(ApiError::Timeout(Duration::from_secs(15))));
        assert_eq!(outcome, LoginOutcome::Failed("timed out after 15s".into()));
    }
}
