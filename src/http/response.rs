//! Rejection response framing.
//!
//! # Design Decisions
//! - Hand-framed HTTP/1.1: one fixed status line, explicit
//!   `Content-Length: 0`, `Connection: close` — exactly what a generic
//!   HTTP/1.1 client expects on a terminal response
//! - The `Server` header names this daemon so a rejected client can tell
//!   who answered

/// Value of the identifying `Server` header.
pub const SERVER_NAME: &str = "migratord";

/// Build the `404 Not Found` response written to a forwarded connection
/// whose path is not served here.
pub fn not_found() -> Vec<u8> {
    format!(
        "HTTP/1.1 404 Not Found\r\n\
         Server: {SERVER_NAME}\r\n\
         Content-Length: 0\r\n\
         Connection: close\r\n\
         \r\n"
    )
    .into_bytes()
}
