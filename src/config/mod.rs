//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config document (YAML/TOML/JSON)
//!     → loader.rs (strict parse & deserialize)
//!     → validation.rs (required / ip / cidr rules, all violations at once)
//!     → defaults.rs (fill absent fields from declared defaults)
//!     → normalize.rs (address family split, VRRP state canonicalization)
//!     → Config (validated, immutable)
//!     → handed to the renderer
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - fields.rs declares key, type, default, rules and description of every
//!   field once; validation, defaulting and docs all read it
//! - Unknown keys are an error at every level

pub mod defaults;
pub mod family;
pub mod fields;
pub mod loader;
pub mod normalize;
pub mod schema;
pub mod validation;

pub use loader::{load, load_as, load_file, ConfigError, Format, ParseError};
pub use schema::Config;
pub use schema::Peer;
pub use schema::VrrpInstance;
pub use schema::VrrpState;
pub use schema::Interface;
pub use schema::Augments;
pub use schema::PeerContext;
