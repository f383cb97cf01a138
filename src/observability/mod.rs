//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! loader / validation / defaults / normalize produce:
//!     → logging.rs (structured log events)
//!
//! Consumers:
//!     → stderr of the CLI
//! ```
//!
//! # Design Decisions
//! - The library only emits events; installing a subscriber is left to the
//!   binary
//! - Phase summaries at debug, completed loads at info

pub mod logging;
