//! Parsing `/vonix ...` command arguments.

use std::fmt;

use vonix_protocol::PlayerIdentity;

use crate::BridgeError;

/// One-line summary of every subcommand, shown on bad input.
pub const USAGE: &str = "/vonix register | /vonix login <password> | /vonix logout | /vonix status";

/// Who issued a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSender {
    /// An in-game player.
    Player(PlayerIdentity),
    /// The server console, a command block, or anything else without a
    /// player identity.
    Console,
}

impl CommandSender {
    /// The player behind this sender, if there is one.
    pub fn player(&self) -> Option<&PlayerIdentity> {
        match self {
            Self::Player(player) => Some(player),
            Self::Console => None,
        }
    }
}

/// A parsed `/vonix` command.
///
/// ```rust
/// use vonix::VonixCommand;
///
/// assert_eq!(VonixCommand::parse::<&str>(&[]).unwrap(), VonixCommand::Register);
/// assert_eq!(
///     VonixCommand::parse(&["login", "hunter2", "extra"]).unwrap(),
///     VonixCommand::Login { password: "hunter2 extra".into() },
/// );
/// assert!(VonixCommand::parse(&["login"]).is_err());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub enum VonixCommand {
    /// Ask the website for a registration code.
    Register,
    /// Log in with the website password.
    Login { password: String },
    /// Forget this player's session token.
    Logout,
    /// Show whether this player is registered and logged in.
    Status,
}

impl VonixCommand {
    /// Parses the arguments that followed `/vonix`.
    ///
    /// - no arguments, `register` or `vonixregister` → [`Register`](Self::Register)
    /// - `login <password...>` → [`Login`](Self::Login), password tokens
    ///   joined by a single space
    /// - `logout`, `status`
    ///
    /// Subcommand names are case-insensitive; the password is taken as is.
    ///
    /// # Errors
    /// [`BridgeError::Usage`] for an unknown subcommand or a `login`
    /// without a password.
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self, BridgeError> {
        let Some((first, rest)) = args.split_first() else {
            return Ok(Self::Register);
        };

        match first.as_ref().to_ascii_lowercase().as_str() {
            "register" | "vonixregister" => Ok(Self::Register),
            "login" => {
                let password = rest
                    .iter()
                    .map(|arg| arg.as_ref())
                    .collect::<Vec<&str>>()
                    .join(" ");
                if password.is_empty() {
                    return Err(BridgeError::Usage(USAGE.to_string()));
                }
                Ok(Self::Login { password })
            }
            "logout" => Ok(Self::Logout),
            "status" => Ok(Self::Status),
            _ => Err(BridgeError::Usage(USAGE.to_string())),
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Register => "register",
            Self::Login { .. } => "login",
            Self::Logout => "logout",
            Self::Status => "status",
        }
    }
}

/// Never prints the password.
impl fmt::Debug for VonixCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Register => f.write_str("Register"),
            Self::Login { .. } => f
                .debug_struct("Login")
                .field("password", &"<redacted>")
                .finish(),
            Self::Logout => f.write_str("Logout"),
            Self::Status => f.write_str("Status"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<VonixCommand, BridgeError> {
        VonixCommand::parse(args)
    }

    #[test]
    fn test_parse_no_args_is_register() {
        assert_eq!(parse(&[]).unwrap(), VonixCommand::Register);
    }

    #[test]
    fn test_parse_register_aliases() {
        assert_eq!(parse(&["register"]).unwrap(), VonixCommand::Register);
        assert_eq!(parse(&["vonixregister"]).unwrap(), VonixCommand::Register);
        assert_eq!(parse(&["REGISTER"]).unwrap(), VonixCommand::Register);
    }

    #[test]
    fn test_parse_login_joins_password_tokens() {
        assert_eq!(
            parse(&["login", "correct", "horse", "battery"]).unwrap(),
            VonixCommand::Login {
                password: "correct horse battery".into()
            }
        );
    }

    #[test]
    fn test_parse_login_keeps_password_case() {
        assert_eq!(
            parse(&["LOGIN", "HuNtEr2"]).unwrap(),
            VonixCommand::Login {
                password: "HuNtEr2".into()
            }
        );
    }

    #[test]
    fn test_parse_login_without_password_is_usage_error() {
        let err = parse(&["login"]).unwrap_err();
        assert!(matches!(err, BridgeError::Usage(ref u) if u == USAGE));
    }

    #[test]
    fn test_parse_logout_and_status() {
        assert_eq!(parse(&["logout"]).unwrap(), VonixCommand::Logout);
        assert_eq!(parse(&["status"]).unwrap(), VonixCommand::Status);
    }

    #[test]
    fn test_parse_unknown_subcommand_is_usage_error() {
        assert!(matches!(parse(&["dance"]), Err(BridgeError::Usage(_))));
    }

    #[test]
    fn test_parse_accepts_owned_strings() {
        let args = vec!["login".to_string(), "pw".to_string()];
        assert_eq!(
            VonixCommand::parse(&args).unwrap(),
            VonixCommand::Login {
                password: "pw".into()
            }
        );
    }

    #[test]
    fn test_debug_redacts_password() {
        let cmd = VonixCommand::Login {
            password: "hunter2".into(),
        };
        let printed = format!("{cmd:?}");
        assert!(!printed.contains("hunter2"));
        assert_eq!(format!("{:?}", VonixCommand::Status), "Status");
    }

    #[test]
    fn test_command_sender_player() {
        let player = PlayerIdentity::new(vonix_protocol::Uuid::nil(), "Steve");
        assert_eq!(
            CommandSender::Player(player.clone()).player(),
            Some(&player)
        );
        assert_eq!(CommandSender::Console.player(), None);
    }
}
