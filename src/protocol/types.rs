//! Wire Protocol Data Types
//!
//! This module defines the request and response types for the cache wire
//! protocol. The protocol is ASCII-framed with binary-safe payloads: every
//! message opens with a decimal command id terminated by a single space,
//! scalar fields are decimal integers each terminated by a single space, and
//! variable-length content is consumed by declared byte count rather than by
//! delimiter.
//!
//! ## Grammar
//!
//! ```text
//! bytes-array = length SP content          ; content read by count, binary-safe
//! key-value   = length SP length SP content content
//!                                          ; key bytes immediately followed by
//!                                          ; value bytes, no separator
//! request     = id SP payload
//! response    = id SP code SP bytes-array payload
//! ```
//!
//! ## Examples
//!
//! Get request for key `foo`: `2 3 foo`
//! Set request for `foo` = `bar`: `1 3 3 foobar`
//! Successful Set response: `10001 0 2 ok`
//! Successful Get response carrying `bar`: `10002 0 2 ok3 bar`

use bytes::Bytes;

/// Command identifiers used on the wire.
///
/// Request ids are small integers; the paired response id is the request id
/// plus 10000.
pub mod id {
    pub const SET_REQ: u64 = 1;
    pub const SET_RESP: u64 = 10001;

    pub const GET_REQ: u64 = 2;
    pub const GET_RESP: u64 = 10002;

    pub const GET_RANGE_REQ: u64 = 3;
    pub const GET_RANGE_RESP: u64 = 10003;

    pub const GET_SET_REQ: u64 = 4;
    pub const GET_SET_RESP: u64 = 10004;

    pub const GET_BIT_REQ: u64 = 5;
    pub const GET_BIT_RESP: u64 = 10005;

    pub const M_GET_REQ: u64 = 6;
    pub const M_GET_RESP: u64 = 10006;

    pub const SET_BIT_REQ: u64 = 7;
    pub const SET_BIT_RESP: u64 = 10007;
}

/// Response status codes. Zero is success; everything else is a failure.
pub mod code {
    /// The operation completed successfully.
    pub const OK: u64 = 0;
    /// The store reported a failure the protocol has no finer name for.
    pub const UNKNOWN: u64 = 1;
    /// The command is recognized by the codec but has no server-side behavior.
    pub const NOT_IMPLEMENTED: u64 = 2;
}

/// Canonical human-readable messages paired with the status codes above.
pub const MSG_OK: &str = "ok";
pub const MSG_UNKNOWN: &str = "unknown error";
pub const MSG_NOT_IMPLEMENTED: &str = "not implemented";

/// A parsed client request.
///
/// Each variant carries exactly the payload its command id declares, so a
/// request whose payload does not match its id is unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Insert or overwrite a key. Wire: `1 SP key-value`
    Set { key: Bytes, value: Bytes },

    /// Read a key. Wire: `2 SP key`
    Get { key: Bytes },

    /// Read a byte range of a value. Wire: `3 SP start SP end SP key`
    GetRange { start: u64, end: u64, key: Bytes },

    /// Swap in a new value, returning the old one. Wire: `4 SP key-value`
    GetSet { key: Bytes, value: Bytes },

    /// Read a single bit of a value. Wire: `5 SP offset SP key`
    GetBit { offset: u64, key: Bytes },

    /// Read several keys at once. Wire: `6 SP count SP count * key`
    MGet { keys: Vec<Bytes> },

    /// Write a single bit of a value. Wire: `7 SP offset SP key-value`
    SetBit { offset: u64, key: Bytes, value: Bytes },
}

impl Request {
    /// Returns the command id this request travels under.
    pub fn id(&self) -> u64 {
        match self {
            Request::Set { .. } => id::SET_REQ,
            Request::Get { .. } => id::GET_REQ,
            Request::GetRange { .. } => id::GET_RANGE_REQ,
            Request::GetSet { .. } => id::GET_SET_REQ,
            Request::GetBit { .. } => id::GET_BIT_REQ,
            Request::MGet { .. } => id::M_GET_REQ,
            Request::SetBit { .. } => id::SET_BIT_REQ,
        }
    }

    /// Serializes the request to its wire format.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.serialize_into(&mut buf);
        buf
    }

    /// Serializes the request into an existing buffer.
    ///
    /// This is more efficient than `serialize()` when you want to reuse a buffer.
    pub fn serialize_into(&self, buf: &mut Vec<u8>) {
        write_int(buf, self.id());
        match self {
            Request::Set { key, value } => write_key_value(buf, key, value),
            Request::Get { key } => write_blob(buf, key),
            Request::GetRange { start, end, key } => {
                write_int(buf, *start);
                write_int(buf, *end);
                write_blob(buf, key);
            }
            Request::GetSet { key, value } => write_key_value(buf, key, value),
            Request::GetBit { offset, key } => {
                write_int(buf, *offset);
                write_blob(buf, key);
            }
            Request::MGet { keys } => {
                write_int(buf, keys.len() as u64);
                for key in keys {
                    write_blob(buf, key);
                }
            }
            Request::SetBit { offset, key, value } => {
                write_int(buf, *offset);
                write_key_value(buf, key, value);
            }
        }
    }
}

/// The command-specific body of a [`Response`].
///
/// The response id on the wire is derived from the variant, never stored
/// separately, so an id/payload mismatch cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponsePayload {
    /// Set carries no body.
    Set,
    /// Get carries the value, empty when the key is absent.
    Get { value: Bytes },
    /// GetRange carries no body until the command grows server-side behavior.
    GetRange,
    /// GetSet carries no body until the command grows server-side behavior.
    GetSet,
    /// GetBit carries no body until the command grows server-side behavior.
    GetBit,
    /// MGet carries no body until the command grows server-side behavior.
    MGet,
    /// SetBit carries no body until the command grows server-side behavior.
    SetBit,
}

impl ResponsePayload {
    /// Returns the response id this payload travels under.
    pub fn id(&self) -> u64 {
        match self {
            ResponsePayload::Set => id::SET_RESP,
            ResponsePayload::Get { .. } => id::GET_RESP,
            ResponsePayload::GetRange => id::GET_RANGE_RESP,
            ResponsePayload::GetSet => id::GET_SET_RESP,
            ResponsePayload::GetBit => id::GET_BIT_RESP,
            ResponsePayload::MGet => id::M_GET_RESP,
            ResponsePayload::SetBit => id::SET_BIT_RESP,
        }
    }
}

/// A server response: a status code, a short human-readable message, and a
/// command-specific payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub code: u64,
    pub message: String,
    pub payload: ResponsePayload,
}

impl Response {
    /// Creates a successful response with the given payload.
    pub fn ok(payload: ResponsePayload) -> Self {
        Self {
            code: code::OK,
            message: MSG_OK.to_string(),
            payload,
        }
    }

    /// Creates a failure response.
    pub fn failure(code: u64, message: impl Into<String>, payload: ResponsePayload) -> Self {
        Self {
            code,
            message: message.into(),
            payload,
        }
    }

    /// Creates the canonical answer for a command the server does not
    /// implement. The nonzero code keeps the absence explicit instead of
    /// masquerading as an empty success.
    pub fn not_implemented(payload: ResponsePayload) -> Self {
        Self::failure(code::NOT_IMPLEMENTED, MSG_NOT_IMPLEMENTED, payload)
    }

    /// Returns the response id, derived from the payload variant.
    pub fn id(&self) -> u64 {
        self.payload.id()
    }

    /// Returns true if the response carries the success code.
    pub fn is_ok(&self) -> bool {
        self.code == code::OK
    }

    /// Serializes the response to its wire format.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.serialize_into(&mut buf);
        buf
    }

    /// Serializes the response into an existing buffer.
    ///
    /// Framing: `<id> <code> <messageLen> <message><payload>` — the payload
    /// follows the message with no separator, disambiguated by the declared
    /// message length.
    pub fn serialize_into(&self, buf: &mut Vec<u8>) {
        write_int(buf, self.id());
        write_int(buf, self.code);
        write_blob(buf, self.message.as_bytes());
        match &self.payload {
            ResponsePayload::Get { value } => write_blob(buf, value),
            ResponsePayload::Set
            | ResponsePayload::GetRange
            | ResponsePayload::GetSet
            | ResponsePayload::GetBit
            | ResponsePayload::MGet
            | ResponsePayload::SetBit => {}
        }
    }
}

/// Writes a decimal integer followed by its terminating space.
fn write_int(buf: &mut Vec<u8>, n: u64) {
    buf.extend_from_slice(n.to_string().as_bytes());
    buf.push(b' ');
}

/// Writes a bytes-array: `<length> SP <content>`.
fn write_blob(buf: &mut Vec<u8>, content: &[u8]) {
    write_int(buf, content.len() as u64);
    buf.extend_from_slice(content);
}

/// Writes a key-value pair: `<keyLen> SP <valueLen> SP <key><value>`.
fn write_key_value(buf: &mut Vec<u8>, key: &[u8], value: &[u8]) {
    write_int(buf, key.len() as u64);
    write_int(buf, value.len() as u64);
    buf.extend_from_slice(key);
    buf.extend_from_slice(value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_get_request() {
        let request = Request::Get {
            key: Bytes::from("foo"),
        };
        assert_eq!(request.serialize(), b"2 3 foo");
    }

    #[test]
    fn test_serialize_set_request() {
        let request = Request::Set {
            key: Bytes::from("foo"),
            value: Bytes::from("bar"),
        };
        assert_eq!(request.serialize(), b"1 3 3 foobar");
    }

    #[test]
    fn test_serialize_set_request_binary_value() {
        // Values are consumed by count on the wire, so spaces and NULs
        // inside them must survive untouched.
        let request = Request::Set {
            key: Bytes::from("k"),
            value: Bytes::from(&b"a b\x00c"[..]),
        };
        assert_eq!(request.serialize(), b"1 1 5 ka b\x00c");
    }

    #[test]
    fn test_serialize_get_range_request() {
        let request = Request::GetRange {
            start: 2,
            end: 5,
            key: Bytes::from("foo"),
        };
        assert_eq!(request.serialize(), b"3 2 5 3 foo");
    }

    #[test]
    fn test_serialize_get_bit_request() {
        let request = Request::GetBit {
            offset: 9,
            key: Bytes::from("foo"),
        };
        assert_eq!(request.serialize(), b"5 9 3 foo");
    }

    #[test]
    fn test_serialize_mget_request() {
        let request = Request::MGet {
            keys: vec![Bytes::from("foo"), Bytes::from("quux")],
        };
        assert_eq!(request.serialize(), b"6 2 3 foo4 quux");
    }

    #[test]
    fn test_serialize_set_bit_request() {
        let request = Request::SetBit {
            offset: 3,
            key: Bytes::from("foo"),
            value: Bytes::from("b"),
        };
        assert_eq!(request.serialize(), b"7 3 3 1 foob");
    }

    #[test]
    fn test_serialize_set_response() {
        let response = Response::ok(ResponsePayload::Set);
        assert_eq!(response.serialize(), b"10001 0 2 ok");
    }

    #[test]
    fn test_serialize_get_response() {
        let response = Response::ok(ResponsePayload::Get {
            value: Bytes::from("bar"),
        });
        // The value blob follows the message bytes with no separator.
        assert_eq!(response.serialize(), b"10002 0 2 ok3 bar");
    }

    #[test]
    fn test_serialize_get_response_empty_value() {
        let response = Response::ok(ResponsePayload::Get {
            value: Bytes::new(),
        });
        assert_eq!(response.serialize(), b"10002 0 2 ok0 ");
    }

    #[test]
    fn test_serialize_not_implemented_response() {
        let response = Response::not_implemented(ResponsePayload::MGet);
        assert_eq!(response.serialize(), b"10006 2 15 not implemented");
    }

    #[test]
    fn test_request_ids() {
        let key = Bytes::from("k");
        let value = Bytes::from("v");
        assert_eq!(
            Request::Set {
                key: key.clone(),
                value: value.clone()
            }
            .id(),
            id::SET_REQ
        );
        assert_eq!(Request::Get { key: key.clone() }.id(), id::GET_REQ);
        assert_eq!(
            Request::MGet {
                keys: vec![key.clone()]
            }
            .id(),
            id::M_GET_REQ
        );
        assert_eq!(
            Request::SetBit {
                offset: 0,
                key,
                value
            }
            .id(),
            id::SET_BIT_REQ
        );
    }

    #[test]
    fn test_response_id_follows_payload() {
        let response = Response::ok(ResponsePayload::Get {
            value: Bytes::new(),
        });
        assert_eq!(response.id(), id::GET_RESP);
        assert!(response.is_ok());

        let response = Response::not_implemented(ResponsePayload::SetBit);
        assert_eq!(response.id(), id::SET_BIT_RESP);
        assert!(!response.is_ok());
    }
}
