//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via `tracing`; every subsystem attaches fields
//!   (`connection`, `path`, `error`) rather than formatting strings
//! - Log level comes from configuration, overridable with `RUST_LOG`
//! - Errors surface to the operator only through logs; remote peers see
//!   either a clean rejection response or a closed connection

pub mod logging;
