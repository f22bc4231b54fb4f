//! Integration tests for [`log_relay::LogRelay`].
//!
//! Covers: stop() draining every enqueued entry in order, bounded retry with
//! exhaustion terminal per entry, permanent errors not retried, per-entry chat
//! override, and worker restart. Uses a recording fake transport and the paused
//! tokio clock so backoff and rate-limit sleeps are deterministic.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use log_relay::LogRelay;
use notify_core::{
    InlineKeyboard, LogChannelConfig, MediaRef, RelayConfig, SentMessage, Severity, Transport,
    TransportError,
};

/// Transport fake: records sends, fails the first `failures_remaining` calls.
#[derive(Default)]
struct FakeTransport {
    sent: Mutex<Vec<(i64, String)>>,
    attempts: AtomicUsize,
    failures_remaining: AtomicUsize,
    permanent_failures: bool,
}

impl FakeTransport {
    fn failing(times: usize, permanent: bool) -> Self {
        Self {
            failures_remaining: AtomicUsize::new(times),
            permanent_failures: permanent,
            ..Default::default()
        }
    }

    fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        _keyboard: Option<&InlineKeyboard>,
    ) -> Result<SentMessage, TransportError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.failures_remaining.load(Ordering::SeqCst) > 0 {
            self.failures_remaining.fetch_sub(1, Ordering::SeqCst);
            return if self.permanent_failures {
                Err(TransportError::InvalidArgument("bad payload".into()))
            } else {
                Err(TransportError::Api("flood control".into()))
            };
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push((chat_id, text.to_string()));
        Ok(SentMessage {
            message_id: sent.len() as i32,
        })
    }

    async fn send_photo(
        &self,
        _chat_id: i64,
        _file_id: &str,
        _caption: Option<&str>,
        _keyboard: Option<&InlineKeyboard>,
    ) -> Result<SentMessage, TransportError> {
        Err(TransportError::Api("not used by the relay".into()))
    }

    async fn send_video(
        &self,
        _chat_id: i64,
        _file_id: &str,
        _caption: Option<&str>,
        _keyboard: Option<&InlineKeyboard>,
    ) -> Result<SentMessage, TransportError> {
        Err(TransportError::Api("not used by the relay".into()))
    }

    async fn edit_message_text(
        &self,
        _chat_id: i64,
        _message_id: i32,
        _text: &str,
        _keyboard: Option<&InlineKeyboard>,
    ) -> Result<(), TransportError> {
        Err(TransportError::Api("not used by the relay".into()))
    }

    async fn edit_message_media(
        &self,
        _chat_id: i64,
        _message_id: i32,
        _media: &MediaRef,
        _caption: Option<&str>,
        _keyboard: Option<&InlineKeyboard>,
    ) -> Result<(), TransportError> {
        Err(TransportError::Api("not used by the relay".into()))
    }

    async fn delete_message(&self, _chat_id: i64, _message_id: i32) -> Result<(), TransportError> {
        Err(TransportError::Api("not used by the relay".into()))
    }

    async fn delete_messages(
        &self,
        _chat_id: i64,
        _message_ids: &[i32],
    ) -> Result<(), TransportError> {
        Err(TransportError::Api("not used by the relay".into()))
    }
}

fn relay_with(transport: Arc<FakeTransport>) -> LogRelay {
    let mut config = RelayConfig::default();
    config.show_caller = false;
    LogRelay::new(transport, LogChannelConfig::new(-100), config)
}

/// **Test: stop() returns only after every enqueued entry is delivered, in
/// enqueue order, even across multiple batches.**
#[tokio::test(start_paused = true)]
async fn test_stop_drains_all_entries_in_order() {
    let transport = Arc::new(FakeTransport::default());
    let relay = relay_with(Arc::clone(&transport));

    for i in 0..25 {
        relay.log(format!("line {}", i), Severity::Info, false, None).unwrap();
    }

    relay.start();
    relay.stop().await;

    let sent = transport.sent();
    assert_eq!(sent.len(), 25);
    for (i, (chat_id, text)) in sent.iter().enumerate() {
        assert_eq!(*chat_id, -100);
        assert!(text.ends_with(&format!("line {}", i)));
    }
}

/// **Test: entries enqueued before start() are delivered once the worker runs.**
#[tokio::test(start_paused = true)]
async fn test_entries_buffered_until_start() {
    let transport = Arc::new(FakeTransport::default());
    let relay = relay_with(Arc::clone(&transport));

    relay.info("queued early").unwrap();
    assert!(transport.sent().is_empty());

    relay.start();
    relay.stop().await;
    assert_eq!(transport.sent().len(), 1);
}

/// **Test: an always-failing entry triggers exactly max_retries attempts, is
/// dropped, and the worker keeps processing the next entry.**
#[tokio::test(start_paused = true)]
async fn test_retry_exhaustion_is_terminal_per_entry() {
    // First 3 attempts fail: the first entry exhausts its budget exactly.
    let transport = Arc::new(FakeTransport::failing(3, false));
    let relay = relay_with(Arc::clone(&transport));

    relay.error("doomed").unwrap();
    relay.info("survivor").unwrap();

    relay.start();
    relay.stop().await;

    assert_eq!(transport.attempts.load(Ordering::SeqCst), 4);
    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].1.contains("survivor"));
}

/// **Test: a transient failure is retried with backoff and eventually delivered.**
#[tokio::test(start_paused = true)]
async fn test_transient_failure_recovers_within_budget() {
    let transport = Arc::new(FakeTransport::failing(2, false));
    let relay = relay_with(Arc::clone(&transport));

    relay.warning("flaky").unwrap();

    relay.start();
    relay.stop().await;

    assert_eq!(transport.attempts.load(Ordering::SeqCst), 3);
    assert_eq!(transport.sent().len(), 1);
}

/// **Test: permanent (invalid-argument) errors are not retried.**
#[tokio::test(start_paused = true)]
async fn test_permanent_error_not_retried() {
    let transport = Arc::new(FakeTransport::failing(usize::MAX, true));
    let relay = relay_with(Arc::clone(&transport));

    relay.error("malformed").unwrap();

    relay.start();
    relay.stop().await;

    assert_eq!(transport.attempts.load(Ordering::SeqCst), 1);
    assert!(transport.sent().is_empty());
}

/// **Test: an entry's chat override redirects only that entry.**
#[tokio::test(start_paused = true)]
async fn test_chat_override_per_entry() {
    let transport = Arc::new(FakeTransport::default());
    let relay = relay_with(Arc::clone(&transport));

    relay.log("to default", Severity::Info, false, None).unwrap();
    relay.log("to override", Severity::Info, false, Some(777)).unwrap();

    relay.start();
    relay.stop().await;

    let sent = transport.sent();
    assert_eq!(sent[0].0, -100);
    assert_eq!(sent[1].0, 777);
}

/// **Test: the relay can be restarted after stop() and keeps delivering.**
#[tokio::test(start_paused = true)]
async fn test_restart_after_stop() {
    let transport = Arc::new(FakeTransport::default());
    let relay = relay_with(Arc::clone(&transport));

    relay.info("first run").unwrap();
    relay.start();
    relay.stop().await;
    assert_eq!(transport.sent().len(), 1);

    relay.info("second run").unwrap();
    relay.start();
    relay.stop().await;
    assert_eq!(transport.sent().len(), 2);
}

/// **Test: severity and notify flag shape the formatted payload.**
#[tokio::test(start_paused = true)]
async fn test_formatting_includes_mentions() {
    let transport = Arc::new(FakeTransport::default());
    let mut channel = LogChannelConfig::new(-100);
    channel.admin_mentions = vec!["@admin".into()];
    let mut config = RelayConfig::default();
    config.show_caller = false;
    config.mention_admins = true;
    let relay = LogRelay::new(Arc::clone(&transport) as Arc<dyn Transport>, channel, config);

    relay.error("it broke").unwrap();
    relay.start();
    relay.stop().await;

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].1.starts_with("<b>ERROR</b>"));
    assert!(sent[0].1.contains("@admin"));
}
