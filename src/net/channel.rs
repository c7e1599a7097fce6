//! Duplex channel identity and lifetime tracking.
//!
//! # Responsibilities
//! - Generate unique channel IDs for tracing
//! - Count live channels
//!
//! Channels never share protocol state; the counter exists for logs and
//! metrics only.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::observability::metrics;

/// Global atomic counter for channel IDs.
/// Using relaxed ordering is sufficient since we only need uniqueness, not synchronization.
static CHANNEL_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a duplex channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId(u64);

impl ChannelId {
    /// Generate a new unique channel ID.
    pub fn new() -> Self {
        Self(CHANNEL_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for ChannelId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "chan-{}", self.0)
    }
}

/// Counts live channels.
#[derive(Debug, Clone, Default)]
pub struct ChannelTracker {
    active_count: Arc<AtomicU64>,
}

impl ChannelTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new channel. Returns a guard that decrements on drop.
    pub fn track(&self) -> ChannelGuard {
        self.active_count.fetch_add(1, Ordering::SeqCst);
        metrics::channel_opened();
        ChannelGuard {
            active_count: Arc::clone(&self.active_count),
            id: ChannelId::new(),
        }
    }

    /// Get current live channel count.
    pub fn active_count(&self) -> u64 {
        self.active_count.load(Ordering::SeqCst)
    }
}

/// Guard that tracks a channel's lifetime.
/// Decrements the live count when dropped.
#[derive(Debug)]
pub struct ChannelGuard {
    active_count: Arc<AtomicU64>,
    id: ChannelId,
}

impl ChannelGuard {
    /// Get this channel's ID.
    pub fn id(&self) -> ChannelId {
        self.id
    }
}

impl Drop for ChannelGuard {
    fn drop(&mut self) {
        self.active_count.fetch_sub(1, Ordering::SeqCst);
        metrics::channel_closed();
        tracing::trace!(channel_id = %self.id, "Channel released");
    }
}
