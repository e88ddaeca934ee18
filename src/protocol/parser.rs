//! Incremental Wire Protocol Decoder
//!
//! This module parses requests and responses out of a byte buffer that is
//! filled from the network a chunk at a time. TCP is a stream transport, so a
//! read may deliver half a message or several messages back to back; the
//! parser therefore reports three outcomes:
//!
//! - `Ok(Some((message, consumed)))` - a full message was parsed, `consumed`
//!   bytes of the buffer belong to it
//! - `Ok(None)` - the buffer holds an incomplete message, read more
//! - `Err(ParseError)` - the bytes cannot be a valid message
//!
//! The caller appends incoming data to its buffer, calls the parse function,
//! advances the buffer by `consumed` on success, and waits for more data on
//! `None`. A parse error is unrecoverable for the stream: the framing relies
//! on declared lengths, and once a length field is garbage there is no way to
//! find the next message boundary.
//!
//! The grammar has no out-of-band length field for a whole message. Every
//! variable-length field declares its own byte count and is consumed by that
//! count, which is what makes payloads binary-safe even though the framing
//! itself is ASCII.

use crate::protocol::types::{id, Request, Response, ResponsePayload};
use bytes::Bytes;
use thiserror::Error;

/// Errors that can occur while decoding a message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// An integer field is empty, holds a non-digit byte, or overflows.
    #[error("invalid integer field: {0}")]
    InvalidInteger(String),

    /// The message opened with a command id the protocol does not define.
    #[error("unknown command id: {0}")]
    UnknownCommand(u64),

    /// The message opened with a response id the protocol does not define.
    #[error("unknown response id: {0}")]
    UnknownResponse(u64),

    /// The response message field is not valid UTF-8.
    #[error("invalid UTF-8 in message field: {0}")]
    InvalidUtf8(String),

    /// A declared field length exceeds the hard cap.
    #[error("declared length too large: {size} bytes (max: {max})")]
    LengthTooLarge { size: u64, max: usize },

    /// A multi-get request declares more keys than the cap allows.
    #[error("batch declares too many keys: {count} (max: {max})")]
    BatchTooLarge { count: u64, max: usize },

    /// A multi-get request declares zero keys.
    #[error("multi-get request declares zero keys")]
    EmptyBatch,
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Maximum size for a single length-prefixed field (512 MB).
pub const MAX_BLOB_SIZE: usize = 512 * 1024 * 1024;

/// Maximum number of keys a multi-get may declare.
pub const MAX_BATCH_KEYS: usize = 4096;

/// A u64 never needs more decimal digits than this; a longer digit run can
/// only be garbage, so it is rejected instead of buffered forever.
const MAX_INT_DIGITS: usize = 20;

/// Attempts to parse one request from the buffer.
///
/// # Returns
///
/// - `Ok(Some((request, consumed)))` - a full request was parsed
/// - `Ok(None)` - incomplete data, need more bytes
/// - `Err(e)` - the bytes cannot be a valid request
pub fn parse_request(buf: &[u8]) -> ParseResult<Option<(Request, usize)>> {
    if buf.is_empty() {
        return Ok(None);
    }

    let (cmd_id, mut consumed) = match read_int(buf)? {
        Some(v) => v,
        None => return Ok(None),
    };
    let rest = &buf[consumed..];

    let request = match cmd_id {
        id::SET_REQ => {
            let ((key, value), n) = match read_key_value(rest)? {
                Some(v) => v,
                None => return Ok(None),
            };
            consumed += n;
            Request::Set { key, value }
        }
        id::GET_REQ => {
            let (key, n) = match read_blob(rest)? {
                Some(v) => v,
                None => return Ok(None),
            };
            consumed += n;
            Request::Get { key }
        }
        id::GET_RANGE_REQ => {
            let (start, a) = match read_int(rest)? {
                Some(v) => v,
                None => return Ok(None),
            };
            let (end, b) = match read_int(&rest[a..])? {
                Some(v) => v,
                None => return Ok(None),
            };
            let (key, c) = match read_blob(&rest[a + b..])? {
                Some(v) => v,
                None => return Ok(None),
            };
            consumed += a + b + c;
            Request::GetRange { start, end, key }
        }
        id::GET_SET_REQ => {
            let ((key, value), n) = match read_key_value(rest)? {
                Some(v) => v,
                None => return Ok(None),
            };
            consumed += n;
            Request::GetSet { key, value }
        }
        id::GET_BIT_REQ => {
            let (offset, a) = match read_int(rest)? {
                Some(v) => v,
                None => return Ok(None),
            };
            let (key, b) = match read_blob(&rest[a..])? {
                Some(v) => v,
                None => return Ok(None),
            };
            consumed += a + b;
            Request::GetBit { offset, key }
        }
        id::M_GET_REQ => {
            let (count, a) = match read_int(rest)? {
                Some(v) => v,
                None => return Ok(None),
            };
            if count == 0 {
                return Err(ParseError::EmptyBatch);
            }
            if count > MAX_BATCH_KEYS as u64 {
                return Err(ParseError::BatchTooLarge {
                    count,
                    max: MAX_BATCH_KEYS,
                });
            }
            let mut keys = Vec::with_capacity(count as usize);
            let mut offset = a;
            for _ in 0..count {
                let (key, n) = match read_blob(&rest[offset..])? {
                    Some(v) => v,
                    None => return Ok(None),
                };
                keys.push(key);
                offset += n;
            }
            consumed += offset;
            Request::MGet { keys }
        }
        id::SET_BIT_REQ => {
            let (offset, a) = match read_int(rest)? {
                Some(v) => v,
                None => return Ok(None),
            };
            let ((key, value), b) = match read_key_value(&rest[a..])? {
                Some(v) => v,
                None => return Ok(None),
            };
            consumed += a + b;
            Request::SetBit { offset, key, value }
        }
        other => return Err(ParseError::UnknownCommand(other)),
    };

    Ok(Some((request, consumed)))
}

/// Attempts to parse one response from the buffer.
///
/// Mirrors [`parse_request`]; used by the client side of the protocol.
pub fn parse_response(buf: &[u8]) -> ParseResult<Option<(Response, usize)>> {
    if buf.is_empty() {
        return Ok(None);
    }

    let (resp_id, mut consumed) = match read_int(buf)? {
        Some(v) => v,
        None => return Ok(None),
    };
    let (code, a) = match read_int(&buf[consumed..])? {
        Some(v) => v,
        None => return Ok(None),
    };
    consumed += a;
    let (message, b) = match read_blob(&buf[consumed..])? {
        Some(v) => v,
        None => return Ok(None),
    };
    consumed += b;

    let message = std::str::from_utf8(&message)
        .map_err(|e| ParseError::InvalidUtf8(e.to_string()))?
        .to_string();

    let payload = match resp_id {
        id::SET_RESP => ResponsePayload::Set,
        id::GET_RESP => {
            let (value, n) = match read_blob(&buf[consumed..])? {
                Some(v) => v,
                None => return Ok(None),
            };
            consumed += n;
            ResponsePayload::Get { value }
        }
        id::GET_RANGE_RESP => ResponsePayload::GetRange,
        id::GET_SET_RESP => ResponsePayload::GetSet,
        id::GET_BIT_RESP => ResponsePayload::GetBit,
        id::M_GET_RESP => ResponsePayload::MGet,
        id::SET_BIT_RESP => ResponsePayload::SetBit,
        other => return Err(ParseError::UnknownResponse(other)),
    };

    Ok(Some((
        Response {
            code,
            message,
            payload,
        },
        consumed,
    )))
}

/// Reads a decimal integer terminated by a single space.
///
/// Returns the value and the number of bytes consumed, terminator included.
fn read_int(buf: &[u8]) -> ParseResult<Option<(u64, usize)>> {
    let sp = match buf.iter().position(|&b| b == b' ') {
        Some(pos) => pos,
        None => {
            // No terminator yet. A digit run longer than any u64 cannot
            // become valid by reading more, so fail early instead of
            // buffering an endless stream of digits.
            if buf.len() > MAX_INT_DIGITS {
                return Err(ParseError::InvalidInteger(
                    "unterminated integer field".to_string(),
                ));
            }
            return Ok(None);
        }
    };

    if sp == 0 {
        return Err(ParseError::InvalidInteger("empty integer field".to_string()));
    }
    if sp > MAX_INT_DIGITS {
        return Err(ParseError::InvalidInteger(format!(
            "integer field too long: {} digits",
            sp
        )));
    }

    let digits = &buf[..sp];
    if !digits.iter().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidInteger(
            String::from_utf8_lossy(digits).into_owned(),
        ));
    }

    // All bytes are ASCII digits, so the slice is valid UTF-8; only overflow
    // can still fail here.
    let value = std::str::from_utf8(digits)
        .expect("digit run is ASCII")
        .parse::<u64>()
        .map_err(|_| ParseError::InvalidInteger(String::from_utf8_lossy(digits).into_owned()))?;

    Ok(Some((value, sp + 1)))
}

/// Reads a bytes-array: `<length> SP <content>`, content consumed by count.
fn read_blob(buf: &[u8]) -> ParseResult<Option<(Bytes, usize)>> {
    let (len, header) = match read_int(buf)? {
        Some(v) => v,
        None => return Ok(None),
    };

    if len > MAX_BLOB_SIZE as u64 {
        return Err(ParseError::LengthTooLarge {
            size: len,
            max: MAX_BLOB_SIZE,
        });
    }
    let len = len as usize;

    if buf.len() < header + len {
        return Ok(None);
    }

    let content = Bytes::copy_from_slice(&buf[header..header + len]);
    Ok(Some((content, header + len)))
}

/// Reads a key-value pair: `<keyLen> SP <valueLen> SP <key><value>`.
///
/// The key bytes are immediately followed by the value bytes with no
/// separator; the two leading lengths are the only disambiguation.
fn read_key_value(buf: &[u8]) -> ParseResult<Option<((Bytes, Bytes), usize)>> {
    let (key_len, a) = match read_int(buf)? {
        Some(v) => v,
        None => return Ok(None),
    };
    let (value_len, b) = match read_int(&buf[a..])? {
        Some(v) => v,
        None => return Ok(None),
    };

    if key_len > MAX_BLOB_SIZE as u64 {
        return Err(ParseError::LengthTooLarge {
            size: key_len,
            max: MAX_BLOB_SIZE,
        });
    }
    if value_len > MAX_BLOB_SIZE as u64 {
        return Err(ParseError::LengthTooLarge {
            size: value_len,
            max: MAX_BLOB_SIZE,
        });
    }
    let key_len = key_len as usize;
    let value_len = value_len as usize;

    let header = a + b;
    if buf.len() < header + key_len + value_len {
        return Ok(None);
    }

    let key = Bytes::copy_from_slice(&buf[header..header + key_len]);
    let value = Bytes::copy_from_slice(&buf[header + key_len..header + key_len + value_len]);
    Ok(Some(((key, value), header + key_len + value_len)))
}
