//! Per-group album buffering with a fixed debounce window.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, info};

/// Collapses events arriving within `latency` of a group's first event into one
/// batch.
///
/// The debounce window opens on the first buffered event of a group and is not
/// extended by later arrivals; an album straddling the window boundary starts a
/// second window. The buffer is removed before the batch is handed back, so a
/// failing consumer never sees the same batch twice.
pub struct AlbumAggregator<E> {
    latency: Duration,
    buffers: Mutex<HashMap<String, Vec<E>>>,
}

impl<E> AlbumAggregator<E> {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            buffers: Mutex::new(HashMap::new()),
        }
    }

    /// Buffers `event` under `group_id` and returns the collected batch when
    /// this call is responsible for forwarding it.
    ///
    /// - No group id: the event bypasses buffering, returned immediately as a
    ///   batch of one.
    /// - First event of a group: this call suspends for the debounce window,
    ///   then drains the group's buffer and returns the whole batch.
    /// - Later events while the window is open: appended; returns `None`.
    pub async fn observe(&self, group_id: Option<String>, event: E) -> Option<Vec<E>> {
        let Some(group_id) = group_id else {
            return Some(vec![event]);
        };

        // Append and check under one lock so a near-simultaneous second event
        // cannot also see an empty buffer and open its own window.
        let is_first = {
            let mut buffers = self.buffers.lock().await;
            let buffer = buffers.entry(group_id.clone()).or_default();
            buffer.push(event);
            buffer.len() == 1
        };

        if !is_first {
            debug!(%group_id, "Event appended to open album window");
            return None;
        }

        info!(
            %group_id,
            latency_ms = self.latency.as_millis() as u64,
            "New album detected, waiting for the debounce window"
        );
        sleep(self.latency).await;

        let batch = self.buffers.lock().await.remove(&group_id)?;
        debug!(%group_id, size = batch.len(), "Album window closed");
        Some(batch)
    }
}
