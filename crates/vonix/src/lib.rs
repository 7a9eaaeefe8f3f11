//! # Vonix
//!
//! Links game-server players to their Vonix website accounts.
//!
//! Players type `/vonix register` to get a one-time code for the website,
//! or `/vonix login <password>` to get a session token for an account they
//! already linked. The bridge calls the registration API off the main
//! thread, brings the answer back onto it, and relays the result as chat.
//!
//! ## Crates
//!
//! | Crate | Provides |
//! |---|---|
//! | `vonix-protocol` | Wire types, `PlayerIdentity`, `UserInfo`, `DonationRank` |
//! | `vonix-api` | `AuthBackend`, the reqwest-backed `AuthClient` |
//! | `vonix-session` | `SessionStore`: player UUID → token |
//! | `vonix-host` | `MainContext`, `Dispatcher`, `PlayerHost`, chat lines |
//! | `vonix` (this crate) | Command parsing, `VonixBridge`, login effects |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use vonix::prelude::*;
//!
//! struct Console;
//!
//! impl PlayerHost for Console {
//!     fn send_message(&self, player: &PlayerIdentity, message: ChatMessage) {
//!         println!("[{}] {message}", player.name);
//!     }
//! }
//!
//! # async fn run() -> Result<(), BridgeError> {
//! let config = BridgeConfig::from_file("vonix.toml")?.with_env()?;
//! let (main, _join) = MainContext::spawn(BridgeState::new(Arc::new(Console)));
//! let bridge = VonixBridge::connect(config, main)?;
//!
//! let steve = PlayerIdentity::new(Uuid::new_v4(), "Steve");
//! let args = vec!["register".to_string()];
//! if let Some(pending) = bridge.dispatch(CommandSender::Player(steve), args).await? {
//!     pending.wait().await?;
//! }
//! # Ok(())
//! # }
//! ```

mod bridge;
mod command;
mod config;
mod effects;
mod error;
mod outcome;

pub use bridge::{BridgeState, PendingCommand, VonixBridge};
pub use command::{CommandSender, VonixCommand, USAGE};
pub use config::{BridgeConfig, ENV_API_KEY, ENV_API_URL, ENV_CALL_DEADLINE_SECS};
pub use effects::{Effect, EffectApplier};
pub use error::BridgeError;
pub use outcome::{LoginOutcome, RegisterOutcome};

/// Everything a host needs to wire the bridge in.
pub mod prelude {
    pub use crate::{
        BridgeConfig, BridgeError, BridgeState, CommandSender, PendingCommand, VonixBridge,
        VonixCommand,
    };
    pub use vonix_api::{ApiConfig, ApiError, AuthBackend, AuthClient};
    pub use vonix_host::{ChatColor, ChatMessage, Dispatcher, MainContext, MainHandle, PlayerHost};
    pub use vonix_protocol::{DonationRank, PlayerIdentity, UserInfo, Uuid};
    pub use vonix_session::{SessionStore, SessionToken};
}
