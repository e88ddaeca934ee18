//! Connection Handling Module
//!
//! This module manages individual client connections. Each accepted socket
//! is handled by its own async task running a strict read-dispatch-write
//! loop: one full request is decoded, executed, and answered before the next
//! one is read. Concurrency exists only across connections, never within
//! one.
//!
//! ## Lifecycle
//!
//! ```text
//! accept ──> read bytes ──> parse request ──> execute ──> write response
//!                ▲                                             │
//!                └─────────────────────────────────────────────┘
//!
//! clean close at a message boundary  => orderly disconnect
//! close in the middle of a message   => UnexpectedEof, logged
//! malformed bytes                    => ParseError, logged, socket closed
//! ```

pub mod handler;

// Re-export commonly used types
pub use handler::{handle_connection, ConnectionError, ConnectionHandler, ConnectionStats};
