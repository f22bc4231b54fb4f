//! Pipeline configuration: the log channel target, mention lists, and delivery
//! worker tuning.
//!
//! Loaded from environment variables (`LOG_CHAT_ID`, `ADMIN_MENTIONS`,
//! `MODERATOR_MENTIONS`, `NOTIFY_ADMIN_LEVELS`, `NOTIFY_MODERATOR_LEVELS`).

use std::env;
use std::time::Duration;

use anyhow::Result;

use crate::types::Severity;

/// Where channel log lines go and who gets mentioned on which severities.
#[derive(Debug, Clone)]
pub struct LogChannelConfig {
    /// Chat the delivery worker sends log lines to.
    pub chat_id: i64,
    pub admin_mentions: Vec<String>,
    pub moderator_mentions: Vec<String>,
    /// Severities that append the admin mention suffix.
    pub notify_admin_levels: Vec<Severity>,
    /// Severities that append the moderator mention suffix.
    pub notify_moderator_levels: Vec<Severity>,
}

impl LogChannelConfig {
    pub fn new(chat_id: i64) -> Self {
        Self {
            chat_id,
            admin_mentions: Vec::new(),
            moderator_mentions: Vec::new(),
            notify_admin_levels: vec![Severity::Error, Severity::Critical],
            notify_moderator_levels: vec![Severity::Warning],
        }
    }

    /// Loads from environment variables. `LOG_CHAT_ID` is required; the list
    /// variables are optional and comma-separated. Invalid severity names fail
    /// loading rather than being dropped.
    pub fn from_env() -> Result<Self> {
        let chat_id: i64 = env::var("LOG_CHAT_ID")
            .map_err(|_| anyhow::anyhow!("LOG_CHAT_ID not set"))?
            .parse()
            .map_err(|_| anyhow::anyhow!("LOG_CHAT_ID is not a valid chat id"))?;

        let mut config = Self::new(chat_id);
        config.admin_mentions = split_list(env::var("ADMIN_MENTIONS").ok());
        config.moderator_mentions = split_list(env::var("MODERATOR_MENTIONS").ok());

        if let Ok(raw) = env::var("NOTIFY_ADMIN_LEVELS") {
            config.notify_admin_levels = parse_levels(&raw)?;
        }
        if let Ok(raw) = env::var("NOTIFY_MODERATOR_LEVELS") {
            config.notify_moderator_levels = parse_levels(&raw)?;
        }

        Ok(config)
    }

    /// One line mentioning all admins, empty when there are none.
    pub fn admin_mention_line(&self) -> String {
        self.admin_mentions.join(" ")
    }

    /// One line mentioning all moderators, empty when there are none.
    pub fn moderator_mention_line(&self) -> String {
        self.moderator_mentions.join(" ")
    }
}

fn split_list(raw: Option<String>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

fn parse_levels(raw: &str) -> Result<Vec<Severity>> {
    raw.split(',')
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(|item| item.parse::<Severity>().map_err(|e| anyhow::anyhow!(e)))
        .collect()
}

/// Tuning for the delivery queue worker.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Append the admin mention suffix when an entry asks for it.
    pub mention_admins: bool,
    /// Record the enqueue call site in each entry.
    pub show_caller: bool,
    /// Sleep between successive successful sends within one batch.
    pub rate_limit: Duration,
    /// Maximum entries drained per batch.
    pub batch_size: usize,
    /// Total delivery attempts per entry.
    pub max_retries: u32,
    /// Backoff between attempts is `attempt_index * retry_base_delay`.
    pub retry_base_delay: Duration,
    /// Bounded wait for each queue pull while collecting a batch.
    pub poll_timeout: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            mention_admins: false,
            show_caller: true,
            rate_limit: Duration::from_millis(500),
            batch_size: 10,
            max_retries: 3,
            retry_base_delay: Duration::from_secs(1),
            poll_timeout: Duration::from_secs(1),
        }
    }
}
