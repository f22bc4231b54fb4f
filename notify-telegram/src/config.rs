//! Minimal backend config: token and optional API URL only.
//! Loaded from the BOT_TOKEN and TELEGRAM_API_URL environment variables.

use anyhow::Result;
use std::env;

/// Connectivity settings for the Telegram backend.
pub struct TelegramConfig {
    pub bot_token: String,
    pub telegram_api_url: Option<String>,
}

impl TelegramConfig {
    /// Loads from environment variables: BOT_TOKEN is required,
    /// TELEGRAM_API_URL is optional.
    pub fn from_env() -> Result<Self> {
        let bot_token = env::var("BOT_TOKEN").map_err(|_| anyhow::anyhow!("BOT_TOKEN not set"))?;
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();
        Ok(Self {
            bot_token,
            telegram_api_url,
        })
    }

    /// Builds a config with the given token and default API URL.
    pub fn with_token(bot_token: String) -> Self {
        Self {
            bot_token,
            telegram_api_url: None,
        }
    }
}
