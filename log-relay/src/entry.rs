//! Log entry model and channel-message formatting.

use notify_core::{LogChannelConfig, Severity};

/// One log line queued for delivery. Immutable once enqueued; consumed and
/// discarded by the worker after a successful send or retry exhaustion.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub text: String,
    pub severity: Severity,
    /// Force the admin mention suffix regardless of severity.
    pub notify: bool,
    /// Call site of the producing `log()` call, when caller capture is on.
    pub caller: Option<String>,
    /// Overrides the configured log chat for this entry only.
    pub chat_id: Option<i64>,
}

impl LogEntry {
    /// Renders the entry into the payload sent to the chat: severity label,
    /// optional caller, body, then mention suffixes. Mention suffixes are
    /// omitted when the corresponding mention list is empty.
    pub fn format(&self, channel: &LogChannelConfig, mention_admins: bool) -> String {
        let mut parts = vec![format!("<b>{}</b>", self.severity.label())];

        if let Some(caller) = &self.caller {
            parts.push(format!(" [{}]", caller));
        }

        parts.push(format!(":\n{}", self.text));

        let wants_admins = channel.notify_admin_levels.contains(&self.severity) || self.notify;
        if wants_admins && mention_admins {
            let mentions = channel.admin_mention_line();
            if !mentions.is_empty() {
                parts.push(format!("\n\n\u{26a0}\u{fe0f} {}", mentions));
            }
        }

        if channel.notify_moderator_levels.contains(&self.severity) {
            let mentions = channel.moderator_mention_line();
            if !mentions.is_empty() {
                parts.push(format!("\n\n\u{1f46e} {}", mentions));
            }
        }

        parts.concat()
    }
}
