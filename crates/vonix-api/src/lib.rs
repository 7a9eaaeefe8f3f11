//! HTTP client for the Vonix registration API.
//!
//! Provides the [`AuthBackend`] trait (the three operations the bridge
//! needs from the website) and [`AuthClient`], its reqwest-backed
//! implementation.
//!
//! | Operation | Endpoint |
//! |---|---|
//! | [`check_registration`](AuthBackend::check_registration) | `POST /registration/check-registration` |
//! | [`generate_registration_code`](AuthBackend::generate_registration_code) | `POST /registration/generate-code` |
//! | [`login`](AuthBackend::login) | `POST /registration/minecraft-login` |

mod client;
mod config;
mod error;

pub use client::{paths, AuthClient, API_KEY_HEADER};
pub use config::ApiConfig;
pub use error::ApiError;

use std::future::Future;

use vonix_protocol::{LoginResult, RegistrationCode, RegistrationStatus, Uuid};

/// The registration operations, independent of how they reach the server.
///
/// The bridge is generic over this trait, so tests can swap in a scripted
/// backend and never open a socket.
///
/// Every operation returns `Result<_, ApiError>`: non-200 responses are
/// `Err(ApiError::Api)` for all three, including `login`. A `200` login
/// whose body says `success: false` is `Ok` with `success == false`.
///
/// # Example
///
/// ```rust
/// use vonix_api::{ApiError, AuthBackend};
/// use vonix_protocol::{LoginResult, RegistrationCode, RegistrationStatus, Uuid};
///
/// /// Nobody is registered and nobody can log in.
/// struct ClosedBackend;
///
/// impl AuthBackend for ClosedBackend {
///     async fn check_registration(&self, _uuid: Uuid) -> Result<RegistrationStatus, ApiError> {
///         Ok(RegistrationStatus { registered: false, user: None })
///     }
///
///     async fn generate_registration_code(
///         &self,
///         _username: &str,
///         _uuid: Uuid,
///     ) -> Result<RegistrationCode, ApiError> {
///         Err(ApiError::Api { status: 503, message: "registration closed".into() })
///     }
///
///     async fn login(
///         &self,
///         _username: &str,
///         _uuid: Uuid,
///         _password: &str,
///     ) -> Result<LoginResult, ApiError> {
///         Ok(LoginResult::failure("Account not found"))
///     }
/// }
/// ```
pub trait AuthBackend: Send + Sync + 'static {
    /// Is this UUID linked to a website account?
    fn check_registration(
        &self,
        uuid: Uuid,
    ) -> impl Future<Output = Result<RegistrationStatus, ApiError>> + Send;

    /// Issues a one-time code the player enters on the website to link
    /// their account. The server enforces the code's validity window.
    fn generate_registration_code(
        &self,
        username: &str,
        uuid: Uuid,
    ) -> impl Future<Output = Result<RegistrationCode, ApiError>> + Send;

    /// Verifies the player's website password and issues a session token.
    fn login(
        &self,
        username: &str,
        uuid: Uuid,
        password: &str,
    ) -> impl Future<Output = Result<LoginResult, ApiError>> + Send;
}
