//! # Responder Core
//!
//! Event pipeline that turns an inbound mesh packet into (at most) one reply:
//!
//! ```text
//! packet ─► Deduplicator ─► MessageFilter ─► RateLimiter ─► ReplyComposer ─► send_text
//!              (exact)      (self/port/ch/trigger) (per sender)   (telemetry)
//! ```
//!
//! Any stage may drop the packet silently. Faults inside a stage or the
//! transport are caught by the [`Dispatcher`] and logged; they never stop the
//! listening loop in [`service`].
//!
//! All state lives in one [`Dispatcher`] value, so independent instances (and
//! tests) never share caches.

pub mod dedup;
pub mod dispatcher;
pub mod filter;
pub mod packet;
pub mod rate_limit;
pub mod reply;
pub mod service;
pub mod telemetry;

pub use dedup::Deduplicator;
pub use dispatcher::{DispatchOutcome, DispatchStats, Dispatcher};
pub use filter::{matches_trigger, FilterSkip, MessageFilter, TRIGGER};
pub use packet::{IncomingPacket, PortTag, SenderKey, SignalValue};
pub use rate_limit::RateLimiter;
pub use reply::ReplyComposer;
pub use service::{run_until_shutdown, ConnectionGuard, ListenerState, StopReason};
pub use telemetry::TelemetrySnapshot;
