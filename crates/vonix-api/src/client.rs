//! `AuthClient`: the reqwest-backed implementation of [`AuthBackend`].

use std::error::Error as _;
use std::time::Duration;

use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Serialize};
use vonix_protocol::{
    CheckRegistrationRequest, CheckRegistrationResponse, Codec, ErrorBody,
    GenerateCodeRequest, GenerateCodeResponse, JsonCodec, LoginRequest,
    LoginResponse, LoginResult, ProtocolError, RegistrationCode, RegistrationStatus, Uuid,
};

use crate::{ApiConfig, ApiError, AuthBackend};

/// Header carrying the shared registration secret.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Endpoint paths, relative to [`ApiConfig::base_url`].
pub mod paths {
    pub const CHECK_REGISTRATION: &str = "/registration/check-registration";
    pub const GENERATE_CODE: &str = "/registration/generate-code";
    pub const MINECRAFT_LOGIN: &str = "/registration/minecraft-login";
}

/// HTTP client for the registration API.
///
/// Cheap to share: wrap it in an `Arc` and hand clones to worker tasks.
/// `reqwest::Client` pools connections internally.
///
/// Every operation is a JSON `POST` with `X-API-Key`. A `200` body is
/// decoded into the operation's response type; anything else is decoded as
/// an [`ErrorBody`] and returned as [`ApiError::Api`].
pub struct AuthClient<C: Codec = JsonCodec> {
    http: reqwest::Client,
    config: ApiConfig,
    codec: C,
}

impl AuthClient {
    /// Builds a JSON client from `config` (validated first).
    ///
    /// # Errors
    /// [`ApiError::InvalidConfig`] if the base URL doesn't parse or the
    /// HTTP client can't be built.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        Self::with_codec(config, JsonCodec)
    }
}

impl<C: Codec> AuthClient<C> {
    /// Builds a client that encodes bodies with `codec`.
    pub fn with_codec(config: ApiConfig, codec: C) -> Result<Self, ApiError> {
        let config = config.validated();

        reqwest::Url::parse(&config.base_url).map_err(|e| {
            ApiError::InvalidConfig(format!("base_url {:?}: {e}", config.base_url))
        })?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(concat!("vonix-bridge/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::InvalidConfig(describe(&e)))?;

        if config.api_key.is_empty() {
            tracing::warn!("registration API key is empty; requests will likely be rejected");
        }
        tracing::debug!(base_url = %config.base_url, "registration API client ready");

        Ok(Self { http, config, codec })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Sends one request and decodes the answer.
    ///
    /// The body is read in full before decoding so a bad body is reported
    /// as [`ApiError::Decode`], not as a transport failure.
    async fn post<Req, Resp>(&self, path: &str, request: &Req) -> Result<Resp, ApiError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let body = self.codec.encode(request)?;

        tracing::debug!(path, bytes = body.len(), "registration API request");

        let response = self
            .http
            .post(self.endpoint(path))
            .header(reqwest::header::CONTENT_TYPE, self.codec.content_type())
            .header(API_KEY_HEADER, &self.config.api_key)
            .body(body)
            .send()
            .await
            .map_err(|e| self.map_reqwest(e))?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| self.map_reqwest(e))?;

        tracing::debug!(path, status = status.as_u16(), bytes = bytes.len(), "registration API response");

        if status == StatusCode::OK {
            return Ok(self.codec.decode(&bytes)?);
        }

        let error: ErrorBody = self.codec.decode(&bytes).map_err(|e| {
            ApiError::Decode(format!("HTTP {} with unreadable error body ({e})", status.as_u16()))
        })?;

        tracing::debug!(path, status = status.as_u16(), error = %error.error, "registration API rejected request");

        Err(ApiError::Api {
            status: status.as_u16(),
            message: error.error,
        })
    }

    fn map_reqwest(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout(self.timeout_limit(err.is_connect()))
        } else if err.is_decode() {
            ApiError::Decode(describe(&err))
        } else {
            ApiError::Transport(describe(&err))
        }
    }

    /// The limit that fired: the connect timeout while the connection was
    /// still being set up, the whole-request timeout after that.
    fn timeout_limit(&self, connecting: bool) -> Duration {
        if connecting {
            self.config.connect_timeout()
        } else {
            self.config.request_timeout()
        }
    }
}

impl<C: Codec> AuthBackend for AuthClient<C> {
    async fn check_registration(&self, uuid: Uuid) -> Result<RegistrationStatus, ApiError> {
        let response: CheckRegistrationResponse = self
            .post(
                paths::CHECK_REGISTRATION,
                &CheckRegistrationRequest {
                    minecraft_uuid: uuid,
                },
            )
            .await?;

        tracing::debug!(%uuid, registered = response.registered, "registration checked");

        // An unregistered player can't have a linked account, whatever the
        // body says.
        let user = if response.registered {
            response.user
        } else {
            None
        };

        Ok(RegistrationStatus {
            registered: response.registered,
            user,
        })
    }

    async fn generate_registration_code(
        &self,
        username: &str,
        uuid: Uuid,
    ) -> Result<RegistrationCode, ApiError> {
        let response: GenerateCodeResponse = self
            .post(
                paths::GENERATE_CODE,
                &GenerateCodeRequest {
                    minecraft_username: username.to_string(),
                    minecraft_uuid: uuid,
                },
            )
            .await?;

        if response.code.trim().is_empty() {
            return Err(ProtocolError::InvalidMessage("empty registration code".into()).into());
        }

        let expires_in = response
            .expires_in
            .map(Duration::from_secs)
            .unwrap_or(RegistrationCode::DEFAULT_VALIDITY);

        tracing::info!(%uuid, username, expires_secs = expires_in.as_secs(), "registration code issued");

        Ok(RegistrationCode {
            code: response.code,
            expires_in,
        })
    }

    async fn login(
        &self,
        username: &str,
        uuid: Uuid,
        password: &str,
    ) -> Result<LoginResult, ApiError> {
        let response: LoginResponse = self
            .post(
                paths::MINECRAFT_LOGIN,
                &LoginRequest {
                    minecraft_username: username.to_string(),
                    minecraft_uuid: uuid,
                    password: password.to_string(),
                },
            )
            .await?;

        Ok(login_result(response)?)
    }
}

/// Enforces "token and user present iff success" on a `200` login body.
fn login_result(response: LoginResponse) -> Result<LoginResult, ProtocolError> {
    if !response.success {
        return Ok(LoginResult::failure(response.message));
    }

    let token = response
        .token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ProtocolError::InvalidMessage("successful login without `token`".into()))?;
    let user = response
        .user
        .ok_or_else(|| ProtocolError::InvalidMessage("successful login without `user`".into()))?;

    Ok(LoginResult::success(response.message, token, user))
}

/// Flattens an error and its sources into one line.
///
/// reqwest's own message is just "error sending request for url (...)";
/// the useful part ("Connection refused") is further down the chain.
fn describe(err: &reqwest::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}
