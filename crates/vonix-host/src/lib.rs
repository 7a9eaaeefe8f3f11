//! Host runtime boundary for the Vonix bridge.
//!
//! Game servers mutate world and player state from a single thread. The
//! bridge must never block that thread on HTTP, and must never touch
//! player state from anywhere else. This crate models that contract
//! without depending on any particular game engine.
//!
//! # Key types
//!
//! - [`MainContext`] / [`MainHandle`]: an actor task that owns the
//!   host's mutable state and runs jobs against it one at a time
//! - [`Dispatcher`]: the seam the bridge talks to: `submit` work onto a
//!   worker task, `run_on_main` to get back onto the main context
//! - [`PlayerHost`]: how the bridge reaches players (chat, rank perks)
//! - [`ChatMessage`] / [`ChatColor`]: colored chat lines
//!
//! ```text
//! command ─▶ main context ─submit─▶ worker (HTTP) ─run_on_main─▶ main context
//! ```

mod chat;
mod context;
mod dispatcher;
mod error;

pub use chat::{ChatColor, ChatMessage, ChatSpan, PlayerHost};
pub use context::{MainContext, MainHandle};
pub use dispatcher::Dispatcher;
pub use error::HostError;
