//! Delivery queue worker: a single background consumer draining batched log
//! entries to the transport with rate limiting and bounded retry.

use std::panic::Location;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use notify_core::{LogChannelConfig, RelayConfig, Severity, Transport, TransportError};

use crate::entry::LogEntry;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Log relay queue is closed")]
    Closed,
}

/// Asynchronous logger shipping formatted log lines to a chat.
///
/// Producers enqueue entries without blocking; one background worker drains the
/// queue in batches, respecting the remote rate limit and retrying transient
/// failures with linear backoff. Retry exhaustion is terminal for the entry
/// only, never for the worker.
pub struct LogRelay {
    transport: Arc<dyn Transport>,
    channel: Arc<LogChannelConfig>,
    config: RelayConfig,
    tx: UnboundedSender<LogEntry>,
    rx: Mutex<Option<UnboundedReceiver<LogEntry>>>,
    worker: Mutex<Option<JoinHandle<UnboundedReceiver<LogEntry>>>>,
    stopping: Arc<AtomicBool>,
}

impl LogRelay {
    pub fn new(
        transport: Arc<dyn Transport>,
        channel: LogChannelConfig,
        config: RelayConfig,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            transport,
            channel: Arc::new(channel),
            config,
            tx,
            rx: Mutex::new(Some(rx)),
            worker: Mutex::new(None),
            stopping: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Starts the background worker if one is not already running.
    pub fn start(&self) {
        let mut worker = self.worker.lock().unwrap();
        if worker.as_ref().map(|h| !h.is_finished()).unwrap_or(false) {
            return;
        }

        let Some(rx) = self.rx.lock().unwrap().take() else {
            warn!("Log relay receiver unavailable; worker not started");
            return;
        };

        self.stopping.store(false, Ordering::SeqCst);
        *worker = Some(tokio::spawn(worker_loop(
            Arc::clone(&self.transport),
            Arc::clone(&self.channel),
            self.config.clone(),
            rx,
            Arc::clone(&self.stopping),
        )));
        info!("Log relay background worker launched");
    }

    /// Stops the background worker. Returns only after every previously
    /// enqueued entry has reached a terminal state (sent or exhausted). The
    /// relay can be started again afterwards.
    pub async fn stop(&self) {
        let handle = self.worker.lock().unwrap().take();
        let Some(handle) = handle else {
            return;
        };

        self.stopping.store(true, Ordering::SeqCst);
        match handle.await {
            Ok(rx) => {
                *self.rx.lock().unwrap() = Some(rx);
            }
            Err(e) => error!("Log relay worker task failed: {}", e),
        }
        info!("Log relay background worker stopped");
    }

    /// Enqueues a log line for delivery. Writes a local tracing record first,
    /// then returns as soon as the entry is queued.
    #[track_caller]
    pub fn log(
        &self,
        text: impl Into<String>,
        severity: Severity,
        notify: bool,
        chat_id: Option<i64>,
    ) -> Result<(), RelayError> {
        let loc = Location::caller();
        let text = text.into();
        let caller = self
            .config
            .show_caller
            .then(|| format!("{}:{}", loc.file(), loc.line()));

        match severity {
            Severity::Debug => debug!(caller = caller.as_deref(), "{}", text),
            Severity::Info => info!(caller = caller.as_deref(), "{}", text),
            Severity::Warning => warn!(caller = caller.as_deref(), "{}", text),
            Severity::Error | Severity::Critical => {
                error!(caller = caller.as_deref(), "{}", text)
            }
        }

        self.tx
            .send(LogEntry {
                text,
                severity,
                notify,
                caller,
                chat_id,
            })
            .map_err(|_| RelayError::Closed)
    }

    #[track_caller]
    pub fn debug(&self, text: impl Into<String>) -> Result<(), RelayError> {
        self.log(text, Severity::Debug, false, None)
    }

    #[track_caller]
    pub fn info(&self, text: impl Into<String>) -> Result<(), RelayError> {
        self.log(text, Severity::Info, false, None)
    }

    #[track_caller]
    pub fn warning(&self, text: impl Into<String>) -> Result<(), RelayError> {
        self.log(text, Severity::Warning, true, None)
    }

    #[track_caller]
    pub fn error(&self, text: impl Into<String>) -> Result<(), RelayError> {
        self.log(text, Severity::Error, true, None)
    }

    #[track_caller]
    pub fn critical(&self, text: impl Into<String>) -> Result<(), RelayError> {
        self.log(text, Severity::Critical, true, None)
    }
}

/// Main loop: drain batches until a stop is signalled and the queue is empty.
/// Returns the receiver so the relay can be restarted.
async fn worker_loop(
    transport: Arc<dyn Transport>,
    channel: Arc<LogChannelConfig>,
    config: RelayConfig,
    mut rx: UnboundedReceiver<LogEntry>,
    stopping: Arc<AtomicBool>,
) -> UnboundedReceiver<LogEntry> {
    loop {
        let batch = collect_batch(&mut rx, config.batch_size, config.poll_timeout).await;
        process_batch(transport.as_ref(), &channel, &config, batch).await;

        if stopping.load(Ordering::SeqCst) && rx.is_empty() {
            break;
        }
    }
    rx
}

/// Pulls up to `batch_size` entries; each pull waits at most `poll_timeout`,
/// and an empty pull ends the batch early.
async fn collect_batch(
    rx: &mut UnboundedReceiver<LogEntry>,
    batch_size: usize,
    poll_timeout: std::time::Duration,
) -> Vec<LogEntry> {
    let mut batch = Vec::new();
    for _ in 0..batch_size {
        match timeout(poll_timeout, rx.recv()).await {
            Ok(Some(entry)) => batch.push(entry),
            Ok(None) | Err(_) => break,
        }
    }
    batch
}

/// Sends each entry of the batch in order; exhausted entries are logged and
/// dropped, and the rate-limit sleep separates successful sends.
async fn process_batch(
    transport: &dyn Transport,
    channel: &LogChannelConfig,
    config: &RelayConfig,
    batch: Vec<LogEntry>,
) {
    for entry in batch {
        match send_with_retry(transport, channel, config, &entry).await {
            Ok(()) => sleep(config.rate_limit).await,
            Err(e) => error!(
                attempts = config.max_retries,
                "Error sending log line to chat after retries: {}", e
            ),
        }
    }
}

/// Attempts delivery up to `max_retries` times with linear backoff. Permanent
/// transport errors are surfaced immediately.
async fn send_with_retry(
    transport: &dyn Transport,
    channel: &LogChannelConfig,
    config: &RelayConfig,
    entry: &LogEntry,
) -> Result<(), TransportError> {
    let text = entry.format(channel, config.mention_admins);
    let chat_id = entry.chat_id.unwrap_or(channel.chat_id);

    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match transport.send_text(chat_id, &text, None).await {
            Ok(_) => return Ok(()),
            Err(e) if e.is_permanent() || attempt >= config.max_retries => return Err(e),
            Err(e) => {
                warn!(attempt, "Transient error sending log line: {}", e);
                sleep(config.retry_base_delay * attempt).await;
            }
        }
    }
}
