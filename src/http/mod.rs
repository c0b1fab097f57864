//! Minimal HTTP/1.1 support.
//!
//! The only HTTP this daemon speaks is the rejection response written
//! onto a forwarded connection whose path failed validation. Requests are
//! never parsed here; the trusted peer already did that and sent the
//! result as an envelope.

pub mod response;

pub use response::{not_found, SERVER_NAME};
