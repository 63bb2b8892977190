//! Upload progress reporting
//!
//! Transports count bytes; displays want a percentage. [`ProgressReporter`]
//! publishes the percentage on a `watch` channel, so a slow consumer simply
//! sees the latest value and intermediate updates are coalesced.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Percentage of `total` covered by `loaded`, rounded, capped at 100
///
/// `None` when `total` is zero: progress is unknown rather than 0 or 100.
pub fn percentage(loaded: u64, total: u64) -> Option<u8> {
    if total == 0 {
        return None;
    }
    let pct = (loaded as f64 / total as f64 * 100.0).round();
    Some(pct.clamp(0.0, 100.0) as u8)
}

/// Publishes upload progress as a percentage
///
/// Cloning shares the channel.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    tx: Arc<watch::Sender<u8>>,
}

impl ProgressReporter {
    /// A reporter starting at 0%
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx: Arc::new(tx) }
    }

    /// Receive percentage updates
    pub fn subscribe(&self) -> watch::Receiver<u8> {
        self.tx.subscribe()
    }

    /// Latest published percentage
    pub fn current(&self) -> u8 {
        *self.tx.borrow()
    }

    /// Publish a byte count; ignored when `total` is unknown
    pub fn report_bytes(&self, loaded: u64, total: u64) {
        if let Some(pct) = percentage(loaded, total) {
            self.set(pct);
        }
    }

    /// Back to 0%
    pub fn reset(&self) {
        self.set(0);
    }

    /// Force 100%, regardless of the last byte count seen
    pub fn complete(&self) {
        self.set(100);
    }

    fn set(&self, pct: u8) {
        self.tx.send_if_modified(|current| {
            if *current == pct {
                false
            } else {
                *current = pct;
                true
            }
        });
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared byte counter for one request body
///
/// Body streams call [`ByteCounter::advance`] as chunks are handed to the
/// transport.
#[derive(Debug)]
pub struct ByteCounter {
    total: u64,
    loaded: AtomicU64,
    reporter: ProgressReporter,
}

impl ByteCounter {
    /// Counter for a body of `total` bytes
    pub fn new(total: u64, reporter: ProgressReporter) -> Self {
        Self {
            total,
            loaded: AtomicU64::new(0),
            reporter,
        }
    }

    /// Record `bytes` more as sent and publish the new percentage
    pub fn advance(&self, bytes: u64) {
        let loaded = self.loaded.fetch_add(bytes, Ordering::Relaxed) + bytes;
        self.reporter.report_bytes(loaded, self.total);
    }

    /// Bytes recorded so far
    pub fn loaded(&self) -> u64 {
        self.loaded.load(Ordering::Relaxed)
    }

    /// Expected total
    pub fn total(&self) -> u64 {
        self.total
    }
}
