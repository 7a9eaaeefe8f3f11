//! An in-process stand-in for the Vonix registration API.
//!
//! Implements the three endpoints the bridge calls, with the same status
//! codes and error strings as the real service, plus the website's side
//! of registration (redeeming a code with a password) as a plain method.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use tokio::sync::Mutex;
use vonix::prelude::*;
use vonix_protocol::{
    CheckRegistrationRequest, CheckRegistrationResponse, ErrorBody, GenerateCodeRequest,
    GenerateCodeResponse, LoginRequest, LoginResponse,
};

const CODE_VALIDITY: Duration = Duration::from_secs(10 * 60);
const MIN_PASSWORD_LENGTH: usize = 6;

struct Account {
    user: UserInfo,
    password: String,
}

struct IssuedCode {
    player: PlayerIdentity,
    issued_at: Instant,
}

#[derive(Default)]
struct Registry {
    accounts: HashMap<Uuid, Account>,
    codes: HashMap<String, IssuedCode>,
    next_id: i64,
}

struct MockState {
    /// Empty means the endpoints are unprotected.
    api_key: String,
    registry: Mutex<Registry>,
}

/// Handle to a running mock API.
#[derive(Clone)]
pub struct MockApi {
    state: Arc<MockState>,
    addr: SocketAddr,
}

impl MockApi {
    /// Binds `127.0.0.1` on a free port and starts serving.
    pub async fn start(api_key: impl Into<String>) -> std::io::Result<Self> {
        let state = Arc::new(MockState {
            api_key: api_key.into(),
            registry: Mutex::new(Registry::default()),
        });

        let app = Router::new()
            .route("/api/registration/check-registration", post(check_registration))
            .route("/api/registration/generate-code", post(generate_code))
            .route("/api/registration/minecraft-login", post(minecraft_login))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "mock registration API stopped");
            }
        });

        tracing::info!(%addr, "mock registration API listening");
        Ok(Self { state, addr })
    }

    /// Base URL to put in [`ApiConfig::base_url`].
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// What the website does when a player submits their code and a
    /// password: creates the account and burns the code.
    pub async fn redeem_code(&self, code: &str, password: &str) -> Result<UserInfo, String> {
        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            ));
        }

        let mut registry = self.state.registry.lock().await;
        let issued = registry
            .codes
            .remove(&code.to_ascii_uppercase())
            .filter(|issued| issued.issued_at.elapsed() < CODE_VALIDITY)
            .ok_or_else(|| "Invalid or expired registration code".to_string())?;

        if registry.accounts.contains_key(&issued.player.uuid) {
            return Err("This Minecraft account is already registered".into());
        }

        registry.next_id += 1;
        let user = UserInfo {
            id: registry.next_id,
            username: issued.player.name.to_lowercase(),
            minecraft_username: issued.player.name.clone(),
            minecraft_uuid: issued.player.uuid,
            role: "user".into(),
            total_donated: 0.0,
            donation_rank_id: None,
            donation_rank_expires_at: None,
        };
        registry.accounts.insert(
            issued.player.uuid,
            Account {
                user: user.clone(),
                password: password.to_string(),
            },
        );

        tracing::info!(player = %issued.player, "mock account created");
        Ok(user)
    }

    /// Records a donation against an existing account.
    pub async fn donate(&self, uuid: Uuid, amount: f64, rank: Option<DonationRank>) -> bool {
        let mut registry = self.state.registry.lock().await;
        let Some(account) = registry.accounts.get_mut(&uuid) else {
            return false;
        };
        account.user.total_donated += amount;
        if let Some(rank) = rank {
            account.user.donation_rank_id = Some(rank.id().to_string());
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

fn reject(status: StatusCode, error: &str) -> Response {
    (status, Json(ErrorBody::new(error))).into_response()
}

/// 401 without a key, 403 with the wrong one.
fn authorize(state: &MockState, headers: &HeaderMap) -> Result<(), Response> {
    if state.api_key.is_empty() {
        return Ok(());
    }
    let key = headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .filter(|key| !key.is_empty());
    match key {
        None => Err(reject(StatusCode::UNAUTHORIZED, "API key required")),
        Some(key) if key != state.api_key => Err(reject(StatusCode::FORBIDDEN, "Invalid API key")),
        Some(_) => Ok(()),
    }
}

fn valid_username(name: &str) -> bool {
    (3..=16).contains(&name.len())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn random_hex<const N: usize>() -> String {
    rand::random::<[u8; N]>()
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect()
}

async fn check_registration(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(req): Json<CheckRegistrationRequest>,
) -> Response {
    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }

    let registry = state.registry.lock().await;
    let response = match registry.accounts.get(&req.minecraft_uuid) {
        Some(account) => CheckRegistrationResponse {
            registered: true,
            user: Some(account.user.clone()),
            message: Some("User is registered".into()),
        },
        None => CheckRegistrationResponse {
            registered: false,
            user: None,
            message: Some("User not registered".into()),
        },
    };
    Json(response).into_response()
}

async fn generate_code(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(req): Json<GenerateCodeRequest>,
) -> Response {
    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }
    if !valid_username(&req.minecraft_username) {
        return reject(StatusCode::BAD_REQUEST, "Invalid Minecraft username format");
    }

    let mut registry = state.registry.lock().await;
    if registry.accounts.contains_key(&req.minecraft_uuid) {
        return reject(
            StatusCode::BAD_REQUEST,
            "This Minecraft account is already registered",
        );
    }

    let code = random_hex::<3>();
    registry.codes.insert(
        code.clone(),
        IssuedCode {
            player: PlayerIdentity::new(req.minecraft_uuid, req.minecraft_username.clone()),
            issued_at: Instant::now(),
        },
    );
    tracing::debug!(code = %code, uuid = %req.minecraft_uuid, "mock code issued");

    Json(GenerateCodeResponse {
        code,
        expires_in: Some(CODE_VALIDITY.as_secs()),
        minecraft_username: Some(req.minecraft_username),
    })
    .into_response()
}

async fn minecraft_login(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> Response {
    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }
    if req.password.len() < MIN_PASSWORD_LENGTH {
        return reject(
            StatusCode::BAD_REQUEST,
            &format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
        );
    }

    let registry = state.registry.lock().await;
    let Some(account) = registry.accounts.get(&req.minecraft_uuid) else {
        return reject(
            StatusCode::UNAUTHORIZED,
            "Account not found. Please register first using /vonixregister",
        );
    };
    if account.password != req.password {
        return reject(StatusCode::UNAUTHORIZED, "Invalid password");
    }

    Json(LoginResponse {
        success: true,
        message: format!("Welcome back, {}!", req.minecraft_username),
        token: Some(random_hex::<16>().to_ascii_lowercase()),
        user: Some(account.user.clone()),
    })
    .into_response()
}
