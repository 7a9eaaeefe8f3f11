//! Core domain types for the registration API.
//!
//! These are the values the rest of the bridge works with after a response
//! has been decoded: who the player is, what the website knows about them,
//! and what a login attempt produced.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// PlayerIdentity
// ---------------------------------------------------------------------------

/// A player as the game server sees them: a stable UUID plus the name
/// they're currently using.
///
/// The UUID is the key everywhere (sessions, API lookups). The display name
/// can change between logins, which is why the API is always sent both.
///
/// Supplied by the host per command invocation and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerIdentity {
    /// Stable unique identifier.
    pub uuid: Uuid,
    /// Current display name.
    pub name: String,
}

impl PlayerIdentity {
    /// Creates an identity from a UUID and display name.
    pub fn new(uuid: Uuid, name: impl Into<String>) -> Self {
        Self {
            uuid,
            name: name.into(),
        }
    }
}

/// Display prints `name (uuid)`, which is what we want in logs and chat.
impl fmt::Display for PlayerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.uuid)
    }
}

// ---------------------------------------------------------------------------
// UserInfo
// ---------------------------------------------------------------------------

/// The website account linked to a player, as returned by the API.
///
/// Optional fields use `Option` so an absent or `null` value decodes to
/// `None`, never to an empty-string sentinel. `#[serde(default)]` on those
/// fields lets the server omit them entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    /// Website account id.
    pub id: i64,
    /// Website username.
    pub username: String,
    /// Linked in-game name.
    pub minecraft_username: String,
    /// Linked in-game UUID.
    pub minecraft_uuid: Uuid,
    /// Website role (`user`, `moderator`, `admin`, ...).
    pub role: String,
    /// Lifetime donation total. Missing means nothing donated.
    #[serde(default)]
    pub total_donated: f64,
    /// Donation rank identifier, e.g. `"patron"`.
    #[serde(default)]
    pub donation_rank_id: Option<String>,
    /// When the donation rank lapses, as the server formats it.
    #[serde(default)]
    pub donation_rank_expires_at: Option<String>,
}

impl UserInfo {
    /// The in-game identity this account is linked to.
    pub fn player(&self) -> PlayerIdentity {
        PlayerIdentity::new(self.minecraft_uuid, self.minecraft_username.clone())
    }

    /// The rank identifier, treating an empty string as "no rank".
    pub fn rank_id(&self) -> Option<&str> {
        self.donation_rank_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// The recognized donation rank, if any.
    ///
    /// Unknown identifiers are not an error; they just map to `None`.
    pub fn donation_rank(&self) -> Option<DonationRank> {
        self.rank_id().and_then(|id| id.parse().ok())
    }

    /// `true` if the account has donated anything at all.
    pub fn has_donated(&self) -> bool {
        self.total_donated > 0.0
    }
}

// ---------------------------------------------------------------------------
// DonationRank
// ---------------------------------------------------------------------------

/// The donation tiers the bridge knows how to celebrate.
///
/// Ordered from lowest to highest so hosts can compare tiers
/// (`rank >= DonationRank::Patron`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DonationRank {
    Supporter,
    Patron,
    Champion,
    Legend,
}

impl DonationRank {
    /// Every known rank, lowest first.
    pub const ALL: [DonationRank; 4] = [
        DonationRank::Supporter,
        DonationRank::Patron,
        DonationRank::Champion,
        DonationRank::Legend,
    ];

    /// The canonical lowercase identifier used by the API.
    pub fn id(self) -> &'static str {
        match self {
            Self::Supporter => "supporter",
            Self::Patron => "patron",
            Self::Champion => "champion",
            Self::Legend => "legend",
        }
    }

    /// Human-readable name, e.g. `"Patron"`.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Supporter => "Supporter",
            Self::Patron => "Patron",
            Self::Champion => "Champion",
            Self::Legend => "Legend",
        }
    }
}

/// Error returned when a rank identifier isn't one we recognize.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown donation rank: {0}")]
pub struct UnknownRank(pub String);

/// Case-insensitive: `"Patron"`, `"PATRON"` and `"patron"` all parse.
impl FromStr for DonationRank {
    type Err = UnknownRank;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|rank| rank.id().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownRank(s.to_string()))
    }
}

impl fmt::Display for DonationRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ---------------------------------------------------------------------------
// Operation results
// ---------------------------------------------------------------------------

/// Result of `check-registration`.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationStatus {
    /// Whether the UUID is linked to a website account.
    pub registered: bool,
    /// The linked account, when the server included it.
    pub user: Option<UserInfo>,
}

/// Result of `generate-code`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationCode {
    /// The opaque code the player types on the website.
    pub code: String,
    /// How long the server will honor the code.
    pub expires_in: Duration,
}

impl RegistrationCode {
    /// Validity window the server uses when it doesn't tell us.
    pub const DEFAULT_VALIDITY: Duration = Duration::from_secs(10 * 60);

    /// Validity window rounded up to whole minutes, for chat messages.
    pub fn expires_in_minutes(&self) -> u64 {
        self.expires_in.as_secs().div_ceil(60)
    }
}

/// Result of `minecraft-login`.
///
/// `token` and `user` are present iff `success` is `true`. The API client
/// enforces that when decoding, so consumers can rely on it.
#[derive(Clone, PartialEq)]
pub struct LoginResult {
    pub success: bool,
    pub message: String,
    pub token: Option<String>,
    pub user: Option<UserInfo>,
}

impl LoginResult {
    /// A failed attempt carrying only a message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            token: None,
            user: None,
        }
    }

    /// A successful attempt.
    pub fn success(
        message: impl Into<String>,
        token: impl Into<String>,
        user: UserInfo,
    ) -> Self {
        Self {
            success: true,
            message: message.into(),
            token: Some(token.into()),
            user: Some(user),
        }
    }
}

/// The token is a bearer credential, so `Debug` never prints it.
impl fmt::Debug for LoginResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResult")
            .field("success", &self.success)
            .field("message", &self.message)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user", &self.user)
            .finish()
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> UserInfo {
        UserInfo {
            id: 7,
            username: "steve".into(),
            minecraft_username: "Steve".into(),
            minecraft_uuid: Uuid::nil(),
            role: "user".into(),
            total_donated: 0.0,
            donation_rank_id: None,
            donation_rank_expires_at: None,
        }
    }

    #[test]
    fn test_donation_rank_parse_is_case_insensitive() {
        assert_eq!("Patron".parse(), Ok(DonationRank::Patron));
        assert_eq!("LEGEND".parse(), Ok(DonationRank::Legend));
        assert_eq!("supporter".parse(), Ok(DonationRank::Supporter));
        assert_eq!(" champion ".parse(), Ok(DonationRank::Champion));
    }

    #[test]
    fn test_donation_rank_parse_unknown_returns_error() {
        let err = "benefactor".parse::<DonationRank>().unwrap_err();
        assert_eq!(err, UnknownRank("benefactor".into()));
        assert_eq!(err.to_string(), "unknown donation rank: benefactor");
    }

    #[test]
    fn test_unknown_rank_is_std_error() {
        let err: Box<dyn std::error::Error + Send + Sync> = Box::new(UnknownRank("vip".into()));
        assert_eq!(err.to_string(), "unknown donation rank: vip");
    }

    #[test]
    fn test_donation_rank_ordering_lowest_first() {
        assert!(DonationRank::Supporter < DonationRank::Patron);
        assert!(DonationRank::Champion < DonationRank::Legend);
    }

    #[test]
    fn test_user_rank_id_empty_string_is_none() {
        let mut user = sample_user();
        user.donation_rank_id = Some(String::new());
        assert_eq!(user.rank_id(), None);
        assert_eq!(user.donation_rank(), None);
    }

    #[test]
    fn test_user_donation_rank_unknown_is_none() {
        let mut user = sample_user();
        user.donation_rank_id = Some("vip".into());
        assert_eq!(user.rank_id(), Some("vip"));
        assert_eq!(user.donation_rank(), None);
    }

    #[test]
    fn test_user_player_links_identity() {
        let user = sample_user();
        let player = user.player();
        assert_eq!(player.uuid, Uuid::nil());
        assert_eq!(player.name, "Steve");
    }

    #[test]
    fn test_user_decodes_null_optionals_as_none() {
        let json = r#"{
            "id": 1,
            "username": "alex",
            "minecraft_username": "Alex",
            "minecraft_uuid": "069a79f4-44e9-4726-a5be-fca90e38aaf5",
            "role": "user",
            "total_donated": 0,
            "donation_rank_id": null,
            "donation_rank_expires_at": null
        }"#;
        let user: UserInfo = serde_json::from_str(json).unwrap();
        assert_eq!(user.donation_rank_id, None);
        assert_eq!(user.donation_rank_expires_at, None);
    }

    #[test]
    fn test_user_decodes_missing_optionals_as_none() {
        // The register endpoint omits donation fields entirely.
        let json = r#"{
            "id": 1,
            "username": "alex",
            "minecraft_username": "Alex",
            "minecraft_uuid": "069a79f4-44e9-4726-a5be-fca90e38aaf5",
            "role": "user"
        }"#;
        let user: UserInfo = serde_json::from_str(json).unwrap();
        assert_eq!(user.total_donated, 0.0);
        assert_eq!(user.donation_rank_id, None);
        assert!(!user.has_donated());
    }

    #[test]
    fn test_user_decode_bad_uuid_returns_error() {
        let json = r#"{
            "id": 1,
            "username": "alex",
            "minecraft_username": "Alex",
            "minecraft_uuid": "not-a-uuid",
            "role": "user"
        }"#;
        assert!(serde_json::from_str::<UserInfo>(json).is_err());
    }

    #[test]
    fn test_registration_code_minutes_rounds_up() {
        let code = RegistrationCode {
            code: "A1B2C3".into(),
            expires_in: Duration::from_secs(90),
        };
        assert_eq!(code.expires_in_minutes(), 2);

        let code = RegistrationCode {
            code: "A1B2C3".into(),
            expires_in: RegistrationCode::DEFAULT_VALIDITY,
        };
        assert_eq!(code.expires_in_minutes(), 10);
    }

    #[test]
    fn test_login_result_debug_redacts_token() {
        let result = LoginResult::success("hi", "secret-jwt", sample_user());
        let printed = format!("{result:?}");
        assert!(!printed.contains("secret-jwt"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn test_login_result_failure_has_no_token_or_user() {
        let result = LoginResult::failure("Invalid password");
        assert!(!result.success);
        assert!(result.token.is_none());
        assert!(result.user.is_none());
    }

    #[test]
    fn test_player_identity_display() {
        let player = PlayerIdentity::new(Uuid::nil(), "Steve");
        assert_eq!(
            player.to_string(),
            "Steve (00000000-0000-0000-0000-000000000000)"
        );
    }
}
