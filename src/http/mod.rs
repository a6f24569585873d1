//! HTTP protocol implementation.
//!
//! A deliberately small HTTP/1.x surface: enough to parse one request per
//! connection and write one response back. Keep-alive reuse, chunked
//! transfer, and compression are out of scope for a status page that a
//! browser reloads every few seconds.
//!
//! # Submodules
//!
//! - **`connection`**: one accepted exchange, reading a request and writing
//!   a response exactly once
//! - **`parser`**: incremental request parser over a byte buffer
//! - **`request`**: request representation and lookup helpers
//! - **`response`**: response representation with a builder
//! - **`writer`**: response serialization onto the socket
//!
//! # Exchange lifecycle
//!
//! ```text
//!  accept ──▶ queued ──▶ read_request ──▶ handler ──▶ respond ──▶ close
//!                              │                         │
//!                              └── parse error ── 400 ───┘
//! ```
//!
//! A handler may also decline to respond (the favicon probe); dropping the
//! context closes the socket either way.

pub mod connection;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
