//! Command Dispatcher
//!
//! This module maps each parsed [`Request`] to exactly one [`Store`]
//! operation and builds the [`Response`] for it. Dispatch is stateless per
//! call and exhaustive over the request variants, so an unhandled command
//! cannot slip through.
//!
//! Failures are always surfaced as a response with a nonzero code; the
//! dispatcher never retries and never aborts the connection. Only protocol
//! decode errors do that, one layer up.
//!
//! Five of the seven commands (GetRange, GetSet, GetBit, MGet, SetBit) are a
//! protocol extension surface: their wire shape is fully specified and
//! decoded, but they have no server-side behavior yet. Each answers with the
//! distinct "not implemented" code rather than an empty success, so clients
//! can tell "unsupported" apart from "succeeded with nothing to say".

use crate::protocol::{code, Request, Response, ResponsePayload, types::MSG_UNKNOWN};
use crate::storage::Store;
use bytes::Bytes;
use std::sync::Arc;

/// Executes requests against the shared store.
#[derive(Clone)]
pub struct CommandHandler {
    /// The store, shared across all connections.
    store: Arc<dyn Store>,
}

impl CommandHandler {
    /// Creates a new command handler backed by the given store.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Executes one request and returns the response to send back.
    pub fn execute(&self, request: Request) -> Response {
        match request {
            Request::Set { key, value } => self.cmd_set(key, value),
            Request::Get { key } => self.cmd_get(&key),
            Request::GetRange { .. } => Response::not_implemented(ResponsePayload::GetRange),
            Request::GetSet { .. } => Response::not_implemented(ResponsePayload::GetSet),
            Request::GetBit { .. } => Response::not_implemented(ResponsePayload::GetBit),
            Request::MGet { .. } => Response::not_implemented(ResponsePayload::MGet),
            Request::SetBit { .. } => Response::not_implemented(ResponsePayload::SetBit),
        }
    }

    /// Set: insert or overwrite, empty response body.
    fn cmd_set(&self, key: Bytes, value: Bytes) -> Response {
        match self.store.set(key, value) {
            Ok(()) => Response::ok(ResponsePayload::Set),
            Err(_) => Response::failure(code::UNKNOWN, MSG_UNKNOWN, ResponsePayload::Set),
        }
    }

    /// Get: an absent key is a success carrying an empty value, never an
    /// error.
    fn cmd_get(&self, key: &[u8]) -> Response {
        match self.store.get(key) {
            Ok(value) => Response::ok(ResponsePayload::Get {
                value: value.unwrap_or_else(Bytes::new),
            }),
            Err(_) => Response::failure(
                code::UNKNOWN,
                MSG_UNKNOWN,
                ResponsePayload::Get {
                    value: Bytes::new(),
                },
            ),
        }
    }
}
