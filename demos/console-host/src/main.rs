//! A terminal pretending to be a game server.
//!
//! Every line on stdin is a chat command from one player. `/vonix ...`
//! goes through the bridge exactly as a real server would route it; the
//! bridge's chat lines are printed back. With `--mock-api` an in-process
//! registration API is started and two extra commands simulate the
//! website:
//!
//! ```text
//! /website <code> <password>     redeem a registration code
//! /donate <amount> [rank]        record a donation
//! ```
//!
//! ```text
//! cargo run -p console-host -- --mock-api --player Steve
//! > /vonix register
//! > /website 9F3A1C hunter22
//! > /vonix login hunter22
//! ```

mod mock_api;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{fmt, EnvFilter};
use vonix::prelude::*;

use crate::mock_api::MockApi;

#[derive(Parser)]
#[command(name = "console-host")]
#[command(about = "Drive the Vonix bridge from a terminal")]
struct Args {
    /// Bridge configuration file (TOML)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Display name of the player typing commands
    #[arg(long, default_value = "Steve")]
    player: String,

    /// Player UUID (random when omitted)
    #[arg(long)]
    uuid: Option<Uuid>,

    /// Start an in-process registration API and point the bridge at it
    #[arg(long)]
    mock_api: bool,

    /// Print chat with legacy `§` color codes instead of plain text
    #[arg(long)]
    legacy_colors: bool,
}

/// Prints chat to stdout.
struct ConsoleHost {
    legacy_colors: bool,
}

impl PlayerHost for ConsoleHost {
    fn send_message(&self, player: &PlayerIdentity, message: ChatMessage) {
        let text = if self.legacy_colors {
            message.to_legacy_string()
        } else {
            message.plain_text()
        };
        println!("[{}] {text}", player.name);
    }

    fn apply_rank(&self, player: &PlayerIdentity, rank: DonationRank) {
        tracing::info!(player = %player, rank = rank.id(), "granting rank perks");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => BridgeConfig::from_file(path)?,
        None => BridgeConfig::default(),
    }
    .with_env()?;

    let mock = if args.mock_api {
        let mock = MockApi::start(config.api.api_key.clone()).await?;
        config.api.base_url = mock.base_url();
        Some(mock)
    } else {
        None
    };

    let player = PlayerIdentity::new(args.uuid.unwrap_or_else(Uuid::new_v4), args.player);
    tracing::info!(player = %player, api = %config.api.base_url, "console host ready");

    let host = Arc::new(ConsoleHost {
        legacy_colors: args.legacy_colors,
    });
    let (main, main_join) = MainContext::spawn(BridgeState::new(host));
    let bridge = VonixBridge::connect(config, main.clone())?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let mut words = line.split_whitespace();
        match words.next() {
            None => continue,
            Some("/quit" | "/stop") => break,
            Some("/vonix") => {
                let args: Vec<String> = words.map(str::to_string).collect();
                let sender = CommandSender::Player(player.clone());
                match bridge.dispatch(sender, args).await {
                    // The game loop doesn't wait on the API. Report the
                    // outcome whenever it lands.
                    Ok(Some(pending)) => {
                        tokio::spawn(async move {
                            let command = pending.command();
                            if let Err(e) = pending.wait().await {
                                tracing::warn!(command, error = %e, "command did not complete");
                            }
                        });
                    }
                    Ok(None) => {}
                    Err(BridgeError::Usage(_)) => {}
                    Err(e) => tracing::warn!(error = %e, "command rejected"),
                }
            }
            Some(website @ ("/website" | "/donate")) => {
                let Some(mock) = &mock else {
                    println!("{website} needs --mock-api");
                    continue;
                };
                let rest: Vec<&str> = words.collect();
                simulate_website(mock, &player, website, &rest).await;
            }
            Some(other) => println!("Unknown command: {other}. Try /vonix, or /quit."),
        }
    }

    bridge.shutdown()?;
    main.shutdown()?;
    let state = main_join.await?;
    tracing::info!(sessions = state.sessions.len(), "console host stopped");
    Ok(())
}

/// Stands in for what the player would do on the website.
async fn simulate_website(mock: &MockApi, player: &PlayerIdentity, command: &str, args: &[&str]) {
    match (command, args) {
        ("/website", [code, password]) => match mock.redeem_code(code, password).await {
            Ok(user) => println!("(website) Account #{} created for {}", user.id, user.username),
            Err(e) => println!("(website) {e}"),
        },
        ("/donate", [amount, rest @ ..]) => {
            let Ok(amount) = amount.parse::<f64>() else {
                println!("(website) not an amount: {amount}");
                return;
            };
            let rank = match rest.first().map(|r| r.parse::<DonationRank>()) {
                Some(Ok(rank)) => Some(rank),
                Some(Err(e)) => {
                    println!("(website) {e}");
                    return;
                }
                None => None,
            };
            if mock.donate(player.uuid, amount, rank).await {
                println!("(website) Donation of ${amount:.2} recorded");
            } else {
                println!("(website) {} has no account yet", player.name);
            }
        }
        ("/website", _) => println!("Usage: /website <code> <password>"),
        _ => println!("Usage: /donate <amount> [supporter|patron|champion|legend]"),
    }
}
