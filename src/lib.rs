//! # Meshresponder - Channel Auto-Responder for Meshtastic Networks
//!
//! Meshresponder listens on one Meshtastic channel and answers the exact
//! greeting `hi` (any case, surrounding whitespace ignored) with a one-line
//! link report: how the sender's packet was received (RSSI, SNR, hops) and
//! how the local radio is configured (TX power, region).
//!
//! ## Features
//!
//! - **Meshtastic Integration**: USB/UART serial link in PROTO mode with frame resync, config sync and paced sends.
//! - **Duplicate Suppression**: Bounded cache of exact packet signatures absorbs repeated deliveries.
//! - **Per-Sender Cooldown**: At most one reply per sender per rate-limit window.
//! - **Fault Isolation**: A failure while handling one packet is logged and never stops the listener.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use meshresponder::config::Config;
//! use meshresponder::responder::{Dispatcher, IncomingPacket, TelemetrySnapshot};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     let dispatcher = Dispatcher::new(&config.responder, None, TelemetrySnapshot::default());
//!     let greeting = IncomingPacket::text(0x1234, config.responder.target_channel, "hi");
//!     println!("{} senders tracked, sig={}", dispatcher.tracked_senders(), greeting.signature());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`responder`] - Dedup, filter, rate limit, reply composition and the listening loop
//! - [`meshtastic`] - Serial transport, link state and radio config mapping
//! - [`protobuf`] - Meshtastic protobuf message subset
//! - [`config`] - Configuration management and validation
//! - [`errors`] - Typed transport errors
//! - [`logutil`] - Log sanitizing for over-the-air text
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   Responder     │ ← dedup → filter → rate limit → reply
//! └─────────────────┘
//!          │  MeshTransport
//! ┌─────────────────┐
//! │   Meshtastic    │ ← reader / writer tasks on one serial port
//! │   Link          │
//! └─────────────────┘
//! ```

pub mod config;
pub mod errors;
pub mod logutil;
pub mod meshtastic;
pub mod protobuf;
pub mod responder;
