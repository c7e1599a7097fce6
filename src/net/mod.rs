//! Connection-level bookkeeping.
//!
//! # Data Flow
//! ```text
//! Upgraded connection
//!     → channel.rs (assign ChannelId, count live channels)
//!     → echo loop (http/websocket.rs)
//!     → guard dropped when the loop ends
//! ```

pub mod channel;

pub use channel::{ChannelGuard, ChannelId, ChannelTracker};
