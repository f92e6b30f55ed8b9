//! ChiTieu daemon - natural-language expense assistant.
//!
//! Runs a line-oriented local transport: each stdin line is one message,
//! each stdout block is one reply. A chat frontend would call the same
//! `Bot::respond`.

use anyhow::Result;
use chrono::{Duration, Utc};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, Level};

use chitieu_common::replies;
use chitieud::bot::Bot;
use chitieud::compose;
use chitieud::config::BotConfig;
use chitieud::oracle::HttpOracle;
use chitieud::store::{ExpenseStore, SqliteStore};

/// Single-user local transport.
const LOCAL_USER_ID: i64 = 1;

const DEFAULT_RECENT_DAYS: i64 = 7;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    info!("chitieud v{} starting", env!("CARGO_PKG_VERSION"));

    let config = BotConfig::load();
    let store = SqliteStore::open(&config.db_path)?;
    let oracle = HttpOracle::new(&config)?;
    let bot = Bot::new(oracle, store);

    println!("{}", replies::WELCOME);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        let reply = match text.split_whitespace().next() {
            Some("/start") => replies::WELCOME.to_string(),
            Some("/help") => replies::HELP.to_string(),
            Some("/recent") => recent_reply(bot.store(), text)?,
            _ => bot.respond(LOCAL_USER_ID, text).await?,
        };
        println!("{}\n", reply);
    }

    info!("stdin closed, shutting down");
    Ok(())
}

fn recent_reply<S: ExpenseStore>(store: &S, text: &str) -> Result<String> {
    let days = text
        .split_whitespace()
        .nth(1)
        .and_then(|arg| arg.parse::<i64>().ok())
        .filter(|d| *d > 0)
        .unwrap_or(DEFAULT_RECENT_DAYS);
    let since = Utc::now() - Duration::days(days);
    let expenses = store.recent(LOCAL_USER_ID, since)?;
    Ok(compose::recent_listing(&expenses, days))
}
