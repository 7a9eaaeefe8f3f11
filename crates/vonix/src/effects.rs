//! Post-login effects: rank perks and donation thanks.

use vonix_host::{ChatColor, ChatMessage, PlayerHost};
use vonix_protocol::{DonationRank, PlayerIdentity, UserInfo};

/// One thing that happens to a player because of their account.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// A recognized donation rank is active.
    RankActivated(DonationRank),
    /// The account has donated this much in total (always > 0).
    DonationThanks(f64),
}

impl Effect {
    /// The chat line announcing this effect.
    pub fn message(&self, tag: &str) -> ChatMessage {
        match self {
            Self::RankActivated(rank) => {
                let (color, badge) = match rank {
                    DonationRank::Supporter => (ChatColor::Green, "🌟"),
                    DonationRank::Patron => (ChatColor::Blue, "💎"),
                    DonationRank::Champion => (ChatColor::LightPurple, "👑"),
                    DonationRank::Legend => (ChatColor::Gold, "🏆"),
                };
                ChatMessage::new(color, format!("{badge} {} rank active!", rank.display_name()))
            }
            Self::DonationThanks(amount) => ChatMessage::new(
                ChatColor::Gold,
                format!("{tag} Thank you for donating ${amount:.2}!"),
            ),
        }
    }
}

/// Turns a logged-in account into effects on the player.
///
/// Rank and donation are independent: a player can get either, both, or
/// neither. An unknown rank identifier is silently ignored.
#[derive(Debug, Clone)]
pub struct EffectApplier {
    tag: String,
}

impl EffectApplier {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }

    /// Effects for `user`, rank first.
    pub fn effects_for(user: &UserInfo) -> Vec<Effect> {
        let mut effects = Vec::with_capacity(2);

        match (user.rank_id(), user.donation_rank()) {
            (_, Some(rank)) => effects.push(Effect::RankActivated(rank)),
            (Some(unknown), None) => {
                tracing::debug!(rank = unknown, user_id = user.id, "ignoring unknown donation rank");
            }
            (None, None) => {}
        }

        if user.has_donated() {
            effects.push(Effect::DonationThanks(user.total_donated));
        }

        effects
    }

    /// Announces every effect to `player` and grants rank perks through
    /// the host. Returns what was applied.
    ///
    /// Must run on the main context.
    pub fn apply(
        &self,
        host: &dyn PlayerHost,
        player: &PlayerIdentity,
        user: &UserInfo,
    ) -> Vec<Effect> {
        let effects = Self::effects_for(user);
        for effect in &effects {
            if let Effect::RankActivated(rank) = effect {
                host.apply_rank(player, *rank);
            }
            host.send_message(player, effect.message(&self.tag));
        }
        if !effects.is_empty() {
            tracing::debug!(uuid = %player.uuid, count = effects.len(), "login effects applied");
        }
        effects
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use vonix_protocol::Uuid;

    fn user(rank: Option<&str>, donated: f64) -> UserInfo {
        UserInfo {
            id: 7,
            username: "steve".into(),
            minecraft_username: "Steve".into(),
            minecraft_uuid: Uuid::nil(),
            role: "user".into(),
            total_donated: donated,
            donation_rank_id: rank.map(str::to_string),
            donation_rank_expires_at: None,
        }
    }

    #[derive(Default)]
    struct Recorder {
        lines: Mutex<Vec<ChatMessage>>,
        ranks: Mutex<Vec<DonationRank>>,
    }

    impl PlayerHost for Recorder {
        fn send_message(&self, _player: &PlayerIdentity, message: ChatMessage) {
            self.lines.lock().unwrap().push(message);
        }

        fn apply_rank(&self, _player: &PlayerIdentity, rank: DonationRank) {
            self.ranks.lock().unwrap().push(rank);
        }
    }

    #[test]
    fn test_effects_for_patron_without_donation_is_rank_only() {
        assert_eq!(
            EffectApplier::effects_for(&user(Some("Patron"), 0.0)),
            vec![Effect::RankActivated(DonationRank::Patron)]
        );
    }

    #[test]
    fn test_effects_for_empty_rank_with_donation_is_thanks_only() {
        assert_eq!(
            EffectApplier::effects_for(&user(Some(""), 12.5)),
            vec![Effect::DonationThanks(12.5)]
        );
    }

    #[test]
    fn test_effects_for_unknown_rank_is_ignored() {
        assert!(EffectApplier::effects_for(&user(Some("diamond"), 0.0)).is_empty());
    }

    #[test]
    fn test_effects_for_rank_and_donation_both_fire() {
        assert_eq!(
            EffectApplier::effects_for(&user(Some("LEGEND"), 250.0)),
            vec![
                Effect::RankActivated(DonationRank::Legend),
                Effect::DonationThanks(250.0)
            ]
        );
    }

    #[test]
    fn test_effects_for_no_rank_no_donation_is_empty() {
        assert!(EffectApplier::effects_for(&user(None, 0.0)).is_empty());
    }

    #[test]
    fn test_message_rank_lines() {
        let line = |rank| Effect::RankActivated(rank).message("[Vonix]");

        assert_eq!(line(DonationRank::Supporter).plain_text(), "🌟 Supporter rank active!");
        assert_eq!(line(DonationRank::Supporter).color(), ChatColor::Green);
        assert_eq!(line(DonationRank::Patron).plain_text(), "💎 Patron rank active!");
        assert_eq!(line(DonationRank::Patron).color(), ChatColor::Blue);
        assert_eq!(line(DonationRank::Champion).plain_text(), "👑 Champion rank active!");
        assert_eq!(line(DonationRank::Champion).color(), ChatColor::LightPurple);
        assert_eq!(line(DonationRank::Legend).plain_text(), "🏆 Legend rank active!");
        assert_eq!(line(DonationRank::Legend).color(), ChatColor::Gold);
    }

    #[test]
    fn test_message_donation_thanks_two_decimals() {
        let line = Effect::DonationThanks(12.5).message("[Vonix]");
        assert_eq!(line.plain_text(), "[Vonix] Thank you for donating $12.50!");
        assert_eq!(line.color(), ChatColor::Gold);
    }

    #[test]
    fn test_apply_sends_lines_and_grants_rank() {
        let host = Recorder::default();
        let player = PlayerIdentity::new(Uuid::nil(), "Steve");

        let applied =
            EffectApplier::new("[Vonix]").apply(&host, &player, &user(Some("champion"), 5.0));

        assert_eq!(applied.len(), 2);
        assert_eq!(*host.ranks.lock().unwrap(), vec![DonationRank::Champion]);
        let lines: Vec<String> = host.lines.lock().unwrap().iter().map(|l| l.plain_text()).collect();
        assert_eq!(
            lines,
            vec![
                "👑 Champion rank active!".to_string(),
                "[Vonix] Thank you for donating $5.00!".to_string()
            ]
        );
    }
}
