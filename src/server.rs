//! Listener and Transport Selection
//!
//! This module owns the accept loop: it binds one TCP listener and spawns a
//! connection handler task per accepted socket, all sharing one store. The
//! accept loop itself never blocks on handler work.
//!
//! Transports are selected through the [`TransportKind`] enumeration. Only
//! the wire protocol transport is functional; the HTTP transport is a
//! recognized placeholder that fails with a typed error instead of
//! pretending to listen.

use crate::commands::CommandHandler;
use crate::connection::{handle_connection, ConnectionStats};
use crate::storage::{Store, StoreKind};
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{error, info};

/// The available server transports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// The ASCII wire protocol over TCP. The only functional transport.
    Wire,
    /// Reserved for an HTTP front end; not implemented.
    Http,
}

impl FromStr for TransportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wire" => Ok(TransportKind::Wire),
            "http" => Ok(TransportKind::Http),
            other => Err(format!(
                "unknown transport '{}' (expected: wire, http)",
                other
            )),
        }
    }
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportKind::Wire => write!(f, "wire"),
            TransportKind::Http => write!(f, "http"),
        }
    }
}

/// Everything the server needs to start listening.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind, e.g. `127.0.0.1:45678`.
    pub addr: String,
    /// Which transport to serve.
    pub transport: TransportKind,
    /// Which store backend to build.
    pub store: StoreKind,
}

/// Errors that can occur while starting or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind or accept.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The selected transport has no implementation.
    #[error("transport '{0}' is not implemented")]
    UnsupportedTransport(TransportKind),
}

/// Builds the store and serves the configured transport until the task is
/// cancelled or the listener fails.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let store = config.store.build();
    info!(backend = %config.store, "store ready");

    match config.transport {
        TransportKind::Wire => serve_wire(&config.addr, store).await,
        TransportKind::Http => Err(ServerError::UnsupportedTransport(TransportKind::Http)),
    }
}

/// Binds the listener and runs the accept loop for the wire transport.
async fn serve_wire(addr: &str, store: Arc<dyn Store>) -> Result<(), ServerError> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "cache server listening");

    let stats = Arc::new(ConnectionStats::new());
    accept_loop(listener, store, stats).await;
    Ok(())
}

/// Accepts connections forever, spawning one handler task per socket.
async fn accept_loop(listener: TcpListener, store: Arc<dyn Store>, stats: Arc<ConnectionStats>) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let commands = CommandHandler::new(Arc::clone(&store));
                let stats = Arc::clone(&stats);

                tokio::spawn(async move {
                    handle_connection(stream, addr, commands, stats).await;
                });
            }
            Err(e) => {
                error!(error = %e, "failed to accept connection");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_kind_from_str() {
        assert_eq!("wire".parse::<TransportKind>(), Ok(TransportKind::Wire));
        assert_eq!("http".parse::<TransportKind>(), Ok(TransportKind::Http));
        assert!("grpc".parse::<TransportKind>().is_err());
    }

    #[tokio::test]
    async fn test_http_transport_is_rejected() {
        let config = ServerConfig {
            addr: "127.0.0.1:0".to_string(),
            transport: TransportKind::Http,
            store: StoreKind::Memory,
        };

        let result = run(config).await;
        assert!(matches!(
            result,
            Err(ServerError::UnsupportedTransport(TransportKind::Http))
        ));
    }

    #[tokio::test]
    async fn test_bind_failure_surfaces_as_io_error() {
        let config = ServerConfig {
            addr: "256.0.0.1:0".to_string(),
            transport: TransportKind::Wire,
            store: StoreKind::Memory,
        };

        let result = run(config).await;
        assert!(matches!(result, Err(ServerError::Io(_))));
    }
}
