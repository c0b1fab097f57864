//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → DaemonConfig (validated, immutable)
//!     → passed by value/reference into each subsystem
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload path
//! - All fields have defaults so an empty config file is valid
//! - Validation separates syntactic (serde) from semantic checks
//! - No process-wide mutable globals: the config is threaded through
//!   constructors

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::DaemonConfig;
pub use schema::ObservabilityConfig;
pub use schema::SocketConfig;
pub use schema::WorkerConfig;
