//! Wire Protocol Client
//!
//! A small async client for the cache: connect, then call [`Client::set`]
//! and [`Client::get`]. Each call sends one request and waits for its
//! response — the protocol interleaves requests and responses 1:1 on a
//! connection, so no pipelining is attempted.
//!
//! ## Example
//!
//! ```ignore
//! use bytecache::client::Client;
//!
//! let mut client = Client::connect("127.0.0.1:45678").await?;
//! client.set("greeting", "hello").await?;
//! let value = client.get("greeting").await?;
//! assert_eq!(&value[..], b"hello");
//! ```

use crate::protocol::{code, parse_response, ParseError, Request, Response, ResponsePayload};
use bytes::{Bytes, BytesMut};
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, ToSocketAddrs};

/// Errors a client call can produce.
#[derive(Debug, Error)]
pub enum ClientError {
    /// I/O error (network issue)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The server sent bytes that do not decode as a response.
    #[error("protocol error: {0}")]
    Parse(#[from] ParseError),

    /// The connection closed before a full response arrived.
    #[error("connection closed before a full response arrived")]
    UnexpectedEof,

    /// The server answered with a failure code.
    #[error("server error {code}: {message}")]
    Server { code: u64, message: String },

    /// The response decoded fine but does not pair with the request sent.
    #[error("response does not match the request")]
    MismatchedResponse,
}

/// A connection to a cache server.
pub struct Client {
    stream: TcpStream,
    buffer: BytesMut,
}

impl Client {
    /// Connects to a cache server.
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self, ClientError> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self {
            stream,
            buffer: BytesMut::with_capacity(4096),
        })
    }

    /// Sets `key` to `value`.
    pub async fn set(
        &mut self,
        key: impl Into<Bytes>,
        value: impl Into<Bytes>,
    ) -> Result<(), ClientError> {
        let response = self
            .round_trip(&Request::Set {
                key: key.into(),
                value: value.into(),
            })
            .await?;

        match response.payload {
            ResponsePayload::Set => Ok(()),
            _ => Err(ClientError::MismatchedResponse),
        }
    }

    /// Gets the value for `key`.
    ///
    /// A key the server has never seen comes back as an empty value — the
    /// protocol does not distinguish absent from empty.
    pub async fn get(&mut self, key: impl Into<Bytes>) -> Result<Bytes, ClientError> {
        let response = self.round_trip(&Request::Get { key: key.into() }).await?;

        match response.payload {
            ResponsePayload::Get { value } => Ok(value),
            _ => Err(ClientError::MismatchedResponse),
        }
    }

    /// Sends one request and reads one response.
    async fn round_trip(&mut self, request: &Request) -> Result<Response, ClientError> {
        self.stream.write_all(&request.serialize()).await?;

        loop {
            if let Some((response, consumed)) = parse_response(&self.buffer)? {
                let _ = self.buffer.split_to(consumed);
                if response.code != code::OK {
                    return Err(ClientError::Server {
                        code: response.code,
                        message: response.message,
                    });
                }
                return Ok(response);
            }

            let n = self.stream.read_buf(&mut self.buffer).await?;
            if n == 0 {
                return Err(ClientError::UnexpectedEof);
            }
        }
    }
}
