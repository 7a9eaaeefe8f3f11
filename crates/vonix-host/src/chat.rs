//! Chat lines and the host's player-facing surface.

use std::fmt;

use vonix_protocol::{DonationRank, PlayerIdentity};

// ---------------------------------------------------------------------------
// ChatColor
// ---------------------------------------------------------------------------

/// The handful of chat colors the bridge uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChatColor {
    Red,
    Yellow,
    Green,
    White,
    Gold,
    Blue,
    LightPurple,
    Gray,
}

impl ChatColor {
    /// The legacy `§` formatting code for this color.
    pub fn legacy_code(self) -> char {
        match self {
            Self::Red => 'c',
            Self::Yellow => 'e',
            Self::Green => 'a',
            Self::White => 'f',
            Self::Gold => '6',
            Self::Blue => '9',
            Self::LightPurple => 'd',
            Self::Gray => '7',
        }
    }
}

// ---------------------------------------------------------------------------
// ChatMessage
// ---------------------------------------------------------------------------

/// A run of text in one color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSpan {
    pub color: ChatColor,
    pub text: String,
}

/// One line of chat, made of colored spans.
///
/// ```rust
/// use vonix_host::{ChatColor, ChatMessage};
///
/// let line = ChatMessage::new(ChatColor::Green, "[Vonix] Registration code: ")
///     .then(ChatColor::White, "A1B2C3");
/// assert_eq!(line.to_string(), "[Vonix] Registration code: A1B2C3");
/// assert_eq!(line.to_legacy_string(), "§a[Vonix] Registration code: §fA1B2C3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    spans: Vec<ChatSpan>,
}

impl ChatMessage {
    /// Starts a line with a single span.
    pub fn new(color: ChatColor, text: impl Into<String>) -> Self {
        Self {
            spans: vec![ChatSpan {
                color,
                text: text.into(),
            }],
        }
    }

    /// Appends another span.
    pub fn then(mut self, color: ChatColor, text: impl Into<String>) -> Self {
        self.spans.push(ChatSpan {
            color,
            text: text.into(),
        });
        self
    }

    pub fn spans(&self) -> &[ChatSpan] {
        &self.spans
    }

    /// Color of the first span; what the line "is" at a glance.
    pub fn color(&self) -> ChatColor {
        self.spans
            .first()
            .map(|span| span.color)
            .unwrap_or(ChatColor::White)
    }

    /// The text with all formatting stripped.
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    /// Renders with legacy `§` color codes for Minecraft-style hosts.
    pub fn to_legacy_string(&self) -> String {
        let mut out = String::new();
        for span in &self.spans {
            out.push('§');
            out.push(span.color.legacy_code());
            out.push_str(&span.text);
        }
        out
    }
}

/// Display is the plain text, for consoles and logs.
impl fmt::Display for ChatMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for span in &self.spans {
            f.write_str(&span.text)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PlayerHost
// ---------------------------------------------------------------------------

/// What the bridge needs from the game server to reach a player.
///
/// The bridge only calls these from the main context, so implementations
/// may touch player objects directly.
///
/// # Example
///
/// ```rust
/// use vonix_host::{ChatMessage, PlayerHost};
/// use vonix_protocol::PlayerIdentity;
///
/// /// Prints every line to stdout.
/// struct StdoutHost;
///
/// impl PlayerHost for StdoutHost {
///     fn send_message(&self, player: &PlayerIdentity, message: ChatMessage) {
///         println!("[to {}] {message}", player.name);
///     }
/// }
/// ```
pub trait PlayerHost: Send + Sync + 'static {
    /// Shows `message` to `player`.
    fn send_message(&self, player: &PlayerIdentity, message: ChatMessage);

    /// Grants whatever perks the server attaches to `rank`.
    ///
    /// Called after a successful login for recognized ranks only. The
    /// default does nothing.
    fn apply_rank(&self, player: &PlayerIdentity, rank: DonationRank) {
        let _ = (player, rank);
    }
}
