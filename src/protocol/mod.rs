//! Cache Wire Protocol Implementation
//!
//! This module implements the compact ASCII wire protocol the cache speaks
//! over TCP. Messages are framed by decimal fields separated by single
//! spaces; variable-length content is length-prefixed and consumed by count,
//! which keeps payloads binary-safe.
//!
//! ## Modules
//!
//! - `types`: the `Request`/`Response` sum types, command ids, status codes,
//!   and serialization
//! - `parser`: the incremental decoder for both directions of the protocol
//!
//! ## Example
//!
//! ```
//! use bytecache::protocol::{parse_request, Request};
//! use bytes::Bytes;
//!
//! // Decoding an incoming request
//! let (request, consumed) = parse_request(b"2 3 foo").unwrap().unwrap();
//! assert_eq!(request, Request::Get { key: Bytes::from("foo") });
//! assert_eq!(consumed, 7);
//!
//! // Encoding it back to the wire
//! assert_eq!(request.serialize(), b"2 3 foo");
//! ```

pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use parser::{parse_request, parse_response, ParseError, ParseResult};
pub use types::{code, id, Request, Response, ResponsePayload};
