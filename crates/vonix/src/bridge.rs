//! `VonixBridge`: command orchestration between the host and the API.
//!
//! Every command follows the same path:
//!
//! 1. The host calls [`VonixBridge::execute`] on the main context with the
//!    bridge state and the raw arguments.
//! 2. The bridge parses, sends the "working on it" line, and `submit`s the
//!    API call to a worker task through the [`Dispatcher`].
//! 3. The worker awaits the call under the configured deadline and folds
//!    the result into an outcome.
//! 4. The worker hands the outcome back with `run_on_main`. Only there is
//!    the session store touched and chat sent.
//!
//! The main context never awaits HTTP.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use vonix_api::{ApiError, AuthBackend, AuthClient};
use vonix_host::{ChatColor, ChatMessage, Dispatcher, HostError, MainHandle, PlayerHost};
use vonix_protocol::{PlayerIdentity, RegistrationStatus, Uuid};
use vonix_session::{Session, SessionStore};

use crate::command::{CommandSender, VonixCommand};
use crate::config::BridgeConfig;
use crate::effects::EffectApplier;
use crate::outcome::{LoginOutcome, RegisterOutcome};
use crate::BridgeError;

// ---------------------------------------------------------------------------
// BridgeState
// ---------------------------------------------------------------------------

/// Everything the bridge mutates. Owned by the main context.
pub struct BridgeState {
    /// Session tokens for players who logged in during this process.
    pub sessions: SessionStore,
    host: Arc<dyn PlayerHost>,
}

impl BridgeState {
    pub fn new(host: Arc<dyn PlayerHost>) -> Self {
        Self {
            sessions: SessionStore::new(),
            host,
        }
    }

    pub fn host(&self) -> &dyn PlayerHost {
        self.host.as_ref()
    }

    fn notify(&self, player: &PlayerIdentity, message: ChatMessage) {
        self.host.send_message(player, message);
    }
}

// ---------------------------------------------------------------------------
// PendingCommand
// ---------------------------------------------------------------------------

/// A command whose API call is still in flight.
///
/// Dropping it does not cancel anything; the result still reaches the
/// player. Await [`wait`](Self::wait) to know when the outcome has been
/// queued onto the main context.
#[derive(Debug)]
pub struct PendingCommand {
    command: &'static str,
    player: Uuid,
    handle: JoinHandle<Result<(), HostError>>,
}

impl PendingCommand {
    pub fn command(&self) -> &'static str {
        self.command
    }

    pub fn player(&self) -> Uuid {
        self.player
    }

    /// Waits until the worker has finished and handed its outcome to the
    /// main context.
    ///
    /// Jobs queued on the main context after this returns run after the
    /// outcome has been applied.
    ///
    /// # Errors
    /// [`BridgeError::Host`] if the main context was gone by the time the
    /// outcome was ready, or the worker task died.
    pub async fn wait(self) -> Result<(), BridgeError> {
        match self.handle.await {
            Ok(result) => Ok(result?),
            Err(e) => {
                tracing::error!(
                    command = self.command,
                    uuid = %self.player,
                    error = %e,
                    "command worker failed"
                );
                Err(HostError::ReplyDropped.into())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// VonixBridge
// ---------------------------------------------------------------------------

/// The `/vonix` command handler.
///
/// Generic over the API backend `B` (so tests can script it) and the
/// dispatcher `D` (so it runs on any host runtime). Cheap to clone: every
/// field is shared.
///
/// # Example
///
/// ```rust,ignore
/// let (main, _join) = MainContext::spawn(BridgeState::new(host));
/// let bridge = VonixBridge::connect(config, main.clone())?;
///
/// let sender = CommandSender::Player(player);
/// if let Some(pending) = bridge.dispatch(sender, vec!["login".into(), "hunter2".into()]).await? {
///     pending.wait().await?;
/// }
/// ```
pub struct VonixBridge<B, D> {
    backend: Arc<B>,
    dispatcher: D,
    config: Arc<BridgeConfig>,
    effects: EffectApplier,
}

impl<B, D: Clone> Clone for VonixBridge<B, D> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            dispatcher: self.dispatcher.clone(),
            config: Arc::clone(&self.config),
            effects: self.effects.clone(),
        }
    }
}

impl<D: Dispatcher<BridgeState>> VonixBridge<AuthClient, D> {
    /// Builds a bridge backed by the real registration API.
    ///
    /// # Errors
    /// [`BridgeError::Api`] if the HTTP client can't be built from
    /// `config.api`.
    pub fn connect(config: BridgeConfig, dispatcher: D) -> Result<Self, BridgeError> {
        let config = config.validated();
        let client = AuthClient::new(config.api.clone())?;
        Ok(Self::assemble(client, dispatcher, config))
    }
}

impl<B, D> VonixBridge<B, D>
where
    B: AuthBackend,
    D: Dispatcher<BridgeState>,
{
    pub fn new(backend: B, dispatcher: D, config: BridgeConfig) -> Self {
        Self::assemble(backend, dispatcher, config.validated())
    }

    /// `config` must already be validated.
    fn assemble(backend: B, dispatcher: D, config: BridgeConfig) -> Self {
        let effects = EffectApplier::new(config.tag.clone());
        Self {
            backend: Arc::new(backend),
            dispatcher,
            config: Arc::new(config),
            effects,
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Handles one `/vonix` invocation. Must be called on the main context.
    ///
    /// Returns the in-flight call for commands that reach the API, `None`
    /// for commands that complete immediately (`logout`).
    ///
    /// # Errors
    /// - [`BridgeError::NotAPlayer`] for console senders
    /// - [`BridgeError::Usage`] for malformed arguments, after the usage
    ///   line has been sent to the player
    pub fn execute<S: AsRef<str>>(
        &self,
        state: &mut BridgeState,
        sender: &CommandSender,
        args: &[S],
    ) -> Result<Option<PendingCommand>, BridgeError> {
        let Some(player) = sender.player() else {
            tracing::debug!("rejected /vonix from a non-player sender");
            return Err(BridgeError::NotAPlayer);
        };

        let command = match VonixCommand::parse(args) {
            Ok(command) => command,
            Err(err) => {
                state.notify(player, ChatMessage::new(ChatColor::Red, err.to_string()));
                return Err(err);
            }
        };

        tracing::debug!(uuid = %player.uuid, command = command.name(), "vonix command");

        match command {
            VonixCommand::Register => Ok(Some(self.register(state, player))),
            VonixCommand::Login { password } => Ok(Some(self.login(state, player, password))),
            VonixCommand::Logout => {
                self.logout(state, player);
                Ok(None)
            }
            VonixCommand::Status => Ok(Some(self.status(state, player))),
        }
    }

    /// Clears every session token. Call once when the host shuts down.
    pub fn shutdown(&self) -> Result<(), BridgeError> {
        self.dispatcher.run_on_main(|state| state.sessions.clear())?;
        Ok(())
    }

    // --- Commands ---

    fn register(&self, state: &BridgeState, player: &PlayerIdentity) -> PendingCommand {
        state.notify(player, self.line(ChatColor::Yellow, "Generating registration code..."));

        let backend = Arc::clone(&self.backend);
        let deadline = self.config.call_deadline();
        let who = player.clone();
        let work = async move {
            let result =
                with_deadline(deadline, backend.generate_registration_code(&who.name, who.uuid))
                    .await;
            RegisterOutcome::from_result(result)
        };

        let bridge = self.clone();
        let who = player.clone();
        self.round_trip("register", player, work, move |state, outcome| {
            bridge.announce_registration(state, &who, outcome);
        })
    }

    fn login(&self, state: &BridgeState, player: &PlayerIdentity, password: String) -> PendingCommand {
        state.notify(player, self.line(ChatColor::Yellow, "Logging in..."));

        let backend = Arc::clone(&self.backend);
        let deadline = self.config.call_deadline();
        let who = player.clone();
        let work = async move {
            let result = with_deadline(deadline, backend.login(&who.name, who.uuid, &password)).await;
            LoginOutcome::from_result(result)
        };

        let bridge = self.clone();
        let who = player.clone();
        self.round_trip("login", player, work, move |state, outcome| {
            bridge.announce_login(state, &who, outcome);
        })
    }

    fn logout(&self, state: &mut BridgeState, player: &PlayerIdentity) {
        if state.sessions.remove(&player.uuid).is_some() {
            state.notify(player, self.line(ChatColor::Green, "You have been logged out."));
        } else {
            state.notify(player, self.line(ChatColor::Yellow, "You are not logged in."));
        }
    }

    fn status(&self, state: &BridgeState, player: &PlayerIdentity) -> PendingCommand {
        state.notify(player, self.line(ChatColor::Yellow, "Checking registration..."));

        let backend = Arc::clone(&self.backend);
        let deadline = self.config.call_deadline();
        let uuid = player.uuid;
        let work = async move { with_deadline(deadline, backend.check_registration(uuid)).await };

        let bridge = self.clone();
        let who = player.clone();
        self.round_trip("status", player, work, move |state, result| {
            bridge.announce_status(state, &who, result);
        })
    }

    /// Runs `work` on a worker, then `apply` on the main context with its
    /// output.
    fn round_trip<W, A>(
        &self,
        command: &'static str,
        player: &PlayerIdentity,
        work: W,
        apply: A,
    ) -> PendingCommand
    where
        W: Future + Send + 'static,
        W::Output: Send + 'static,
        A: FnOnce(&mut BridgeState, W::Output) + Send + 'static,
    {
        let dispatcher = self.dispatcher.clone();
        let uuid = player.uuid;

        let handle = self.dispatcher.submit(async move {
            let output = work.await;
            let queued = dispatcher.run_on_main(move |state| apply(state, output));
            if let Err(e) = &queued {
                tracing::warn!(command, %uuid, error = %e, "outcome dropped, main context is gone");
            }
            queued
        });

        PendingCommand {
            command,
            player: uuid,
            handle,
        }
    }

    // --- Outcomes (main context only) ---

    fn announce_registration(&self, state: &BridgeState, player: &PlayerIdentity, outcome: RegisterOutcome) {
        let tag = &self.config.tag;
        match outcome {
            RegisterOutcome::Code(code) => {
                tracing::info!(uuid = %player.uuid, "registration code delivered");
                let minutes = code.expires_in_minutes();
                state.notify(
                    player,
                    ChatMessage::new(ChatColor::Green, format!("{tag} Registration code: "))
                        .then(ChatColor::White, code.code),
                );
                state.notify(
                    player,
                    ChatMessage::new(ChatColor::Green, format!("{tag} Visit "))
                        .then(ChatColor::White, self.config.register_url.clone())
                        .then(ChatColor::Green, " to complete registration"),
                );
                state.notify(
                    player,
                    self.line(
                        ChatColor::Yellow,
                        &format!("Code expires in {minutes} {}", plural(minutes, "minute")),
                    ),
                );
            }
            RegisterOutcome::AlreadyRegistered => {
                state.notify(player, self.line(ChatColor::Red, "You are already registered!"));
                state.notify(
                    player,
                    self.line(ChatColor::Yellow, "Use /vonix login <password> to log in."),
                );
            }
            RegisterOutcome::Failed(reason) => {
                tracing::info!(uuid = %player.uuid, reason = %reason, "registration failed");
                state.notify(
                    player,
                    self.line(ChatColor::Red, &format!("Registration failed: {reason}")),
                );
            }
        }
    }

    fn announce_login(&self, state: &mut BridgeState, player: &PlayerIdentity, outcome: LoginOutcome) {
        match outcome {
            LoginOutcome::LoggedIn { message, token, user } => {
                state
                    .sessions
                    .insert(Session::new(player.clone(), token).with_user(&user));
                tracing::info!(uuid = %player.uuid, user_id = user.id, "player logged in");

                let tag = &self.config.tag;
                state.notify(player, self.line(ChatColor::Green, &message));
                state.notify(
                    player,
                    ChatMessage::new(ChatColor::Green, format!("{tag} Welcome back, "))
                        .then(ChatColor::White, user.minecraft_username.clone())
                        .then(ChatColor::Green, "!"),
                );
                self.effects.apply(state.host(), player, &user);
            }
            LoginOutcome::AccountNotFound => {
                state.notify(player, self.line(ChatColor::Red, "No account found!"));
                state.notify(
                    player,
                    self.line(
                        ChatColor::Yellow,
                        "Use /vonix register to create an account first.",
                    ),
                );
            }
            LoginOutcome::InvalidPassword => {
                state.notify(player, self.line(ChatColor::Red, "Invalid password. Try again."));
            }
            LoginOutcome::Failed(reason) => {
                tracing::info!(uuid = %player.uuid, reason = %reason, "login failed");
                state.notify(player, self.line(ChatColor::Red, &format!("Login failed: {reason}")));
            }
        }
    }

    fn announce_status(
        &self,
        state: &BridgeState,
        player: &PlayerIdentity,
        result: Result<RegistrationStatus, ApiError>,
    ) {
        let tag = &self.config.tag;
        match result {
            Ok(RegistrationStatus {
                registered: true,
                user: Some(user),
            }) => {
                state.notify(
                    player,
                    ChatMessage::new(ChatColor::Green, format!("{tag} Registered as "))
                        .then(ChatColor::White, user.username.clone())
                        .then(ChatColor::Green, format!(" ({})", user.role)),
                );
                if let Some(rank) = user.donation_rank() {
                    let expiry = user
                        .donation_rank_expires_at
                        .as_deref()
                        .map(|at| format!(" (expires {at})"))
                        .unwrap_or_default();
                    state.notify(player, self.line(ChatColor::Gold, &format!("Rank: {rank}{expiry}")));
                }
                if user.has_donated() {
                    state.notify(
                        player,
                        self.line(
                            ChatColor::Gold,
                            &format!("Total donated: ${:.2}", user.total_donated),
                        ),
                    );
                }
            }
            Ok(RegistrationStatus { registered: true, .. }) => {
                state.notify(player, self.line(ChatColor::Green, "This account is registered."));
            }
            Ok(RegistrationStatus { registered: false, .. }) => {
                state.notify(
                    player,
                    self.line(
                        ChatColor::Yellow,
                        "You are not registered. Use /vonix register to get a code.",
                    ),
                );
            }
            Err(e) => {
                state.notify(player, self.line(ChatColor::Red, &format!("Status check failed: {e}")));
            }
        }

        if state.sessions.contains(&player.uuid) {
            state.notify(player, self.line(ChatColor::Green, "Logged in on this server."));
        } else {
            state.notify(
                player,
                self.line(
                    ChatColor::Gray,
                    "Not logged in on this server. Use /vonix login <password>.",
                ),
            );
        }
    }

    /// A single-color line with the configured tag in front.
    fn line(&self, color: ChatColor, text: &str) -> ChatMessage {
        ChatMessage::new(color, format!("{} {text}", self.config.tag))
    }
}

impl<B: AuthBackend> VonixBridge<B, MainHandle<BridgeState>> {
    /// Runs [`execute`](Self::execute) on the main context from anywhere.
    ///
    /// Convenience for hosts that use [`MainHandle`] as their dispatcher.
    pub async fn dispatch(
        &self,
        sender: CommandSender,
        args: Vec<String>,
    ) -> Result<Option<PendingCommand>, BridgeError> {
        let bridge = self.clone();
        self.dispatcher
            .call(move |state| bridge.execute(state, &sender, args.as_slice()))
            .await?
    }
}

/// Bounds `call` by `deadline`, reporting expiry as [`ApiError::Timeout`].
async fn with_deadline<T>(
    deadline: Duration,
    call: impl Future<Output = Result<T, ApiError>>,
) -> Result<T, ApiError> {
    tokio::time::timeout(deadline, call)
        .await
        .unwrap_or(Err(ApiError::Timeout(deadline)))
}

fn plural(n: u64, word: &str) -> String {
    if n == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}
