//! # bytecache - A Network-Accessible In-Memory Key-Value Cache
//!
//! bytecache is a TCP cache server speaking a compact ASCII wire protocol
//! with binary-safe, length-prefixed payloads. Clients issue commands over a
//! stream connection and get one response per request, in order.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          bytecache                           │
//! │                                                              │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐       │
//! │  │  Listener   │───>│ Connection  │───>│  Command    │       │
//! │  │ (server.rs) │    │  Handler    │    │  Handler    │       │
//! │  └─────────────┘    └─────────────┘    └──────┬──────┘       │
//! │                            │                  │              │
//! │                            ▼                  ▼              │
//! │                     ┌─────────────┐    ┌─────────────┐       │
//! │                     │    Wire     │    │    Store    │       │
//! │                     │    Codec    │    │ (one RwLock │       │
//! │                     │             │    │  map+stats) │       │
//! │                     └─────────────┘    └─────────────┘       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! One tokio task per connection; every task shares one store. The store
//! keeps live aggregate counters (entry count, key bytes, value bytes) that
//! are updated in the same critical section as every map mutation, so they
//! are always exact.
//!
//! ## Wire format
//!
//! Messages are decimal fields separated by single spaces; variable-length
//! content is length-prefixed and consumed by count:
//!
//! ```text
//! Set  "foo" = "bar"   1 3 3 foobar
//! Get  "foo"           2 3 foo
//! Set  response        10001 0 2 ok
//! Get  response        10002 0 2 ok3 bar
//! ```
//!
//! Seven commands are framed (Set, Get, GetRange, GetSet, GetBit, MGet,
//! SetBit); Set and Get are served, the rest answer a distinct
//! "not implemented" code and form the protocol's extension surface.
//!
//! ## Quick Start
//!
//! ```ignore
//! use bytecache::server::{self, ServerConfig, TransportKind};
//! use bytecache::storage::StoreKind;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     server::run(ServerConfig {
//!         addr: "127.0.0.1:45678".to_string(),
//!         transport: TransportKind::Wire,
//!         store: StoreKind::Memory,
//!     })
//!     .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`protocol`]: wire format types and the incremental decoder
//! - [`storage`]: the concurrent store and its live size accounting
//! - [`commands`]: dispatch from parsed requests to store operations
//! - [`connection`]: the per-connection read-dispatch-write loop
//! - [`server`]: the listener, transport selection, accept loop
//! - [`client`]: an async client for the same protocol

pub mod client;
pub mod commands;
pub mod connection;
pub mod protocol;
pub mod server;
pub mod storage;

// Re-export commonly used types for convenience
pub use client::{Client, ClientError};
pub use commands::CommandHandler;
pub use connection::{handle_connection, ConnectionError, ConnectionStats};
pub use protocol::{parse_request, parse_response, ParseError, Request, Response, ResponsePayload};
pub use server::{ServerConfig, ServerError, TransportKind};
pub use storage::{MemoryStore, Status, Store, StoreError, StoreKind};

/// The default port the cache server listens on
pub const DEFAULT_PORT: u16 = 45678;

/// The default host the cache server binds to
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Version of bytecache
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
