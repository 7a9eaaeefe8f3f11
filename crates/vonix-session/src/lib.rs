//! Player session tokens for the Vonix bridge.
//!
//! When a player logs in from the game, the registration API hands back a
//! bearer token. This crate keeps those tokens for the lifetime of the
//! process:
//!
//! 1. **Tokens**: [`SessionToken`], an opaque credential that never prints
//! 2. **Sessions**: [`Session`], a token plus who it was issued to
//! 3. **Storage**: [`SessionStore`], at most one session per player
//!
//! # How it fits in the stack
//!
//! ```text
//! Bridge (above)   ← stores a session after a successful login
//!     ↕
//! Session (this crate)  ← player UUID → token
//!     ↕
//! Protocol (below) ← provides PlayerIdentity, UserInfo
//! ```
//!
//! Nothing here is persisted. A restart logs everyone out.

mod session;
mod store;

pub use session::{Session, SessionToken};
pub use store::SessionStore;
