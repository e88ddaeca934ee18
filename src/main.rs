//! bytecache - A Network-Accessible In-Memory Key-Value Cache
//!
//! This is the main entry point for the bytecache server. It parses the
//! command line, sets up logging, and starts the listener.

use bytecache::server::{self, ServerConfig, TransportKind};
use bytecache::storage::StoreKind;
use tokio::signal;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Server configuration
struct Config {
    /// Host to bind to
    host: String,
    /// Port to listen on
    port: u16,
    /// Store backend to build
    store: StoreKind,
    /// Transport to serve
    transport: TransportKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: bytecache::DEFAULT_HOST.to_string(),
            port: bytecache::DEFAULT_PORT,
            store: StoreKind::Memory,
            transport: TransportKind::Wire,
        }
    }
}

impl Config {
    /// Parse configuration from command-line arguments
    fn from_args() -> Self {
        let mut config = Config::default();
        let args: Vec<String> = std::env::args().collect();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--host" | "-h" => {
                    config.host = take_value(&args, i, "--host");
                    i += 2;
                }
                "--port" | "-p" => {
                    config.port = take_value(&args, i, "--port").parse().unwrap_or_else(|_| {
                        eprintln!("Error: invalid port number");
                        std::process::exit(1);
                    });
                    i += 2;
                }
                "--store" | "-s" => {
                    config.store = take_value(&args, i, "--store").parse().unwrap_or_else(|e| {
                        eprintln!("Error: {}", e);
                        std::process::exit(1);
                    });
                    i += 2;
                }
                "--transport" | "-t" => {
                    config.transport =
                        take_value(&args, i, "--transport").parse().unwrap_or_else(|e| {
                            eprintln!("Error: {}", e);
                            std::process::exit(1);
                        });
                    i += 2;
                }
                "--help" => {
                    print_help();
                    std::process::exit(0);
                }
                "--version" | "-v" => {
                    println!("bytecache version {}", bytecache::VERSION);
                    std::process::exit(0);
                }
                _ => {
                    eprintln!("Unknown argument: {}", args[i]);
                    print_help();
                    std::process::exit(1);
                }
            }
        }

        config
    }

    /// Returns the bind address as a string
    fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Returns the value following a flag, or exits with a usage error.
fn take_value(args: &[String], i: usize, flag: &str) -> String {
    match args.get(i + 1) {
        Some(value) => value.clone(),
        None => {
            eprintln!("Error: {} requires a value", flag);
            std::process::exit(1);
        }
    }
}

fn print_help() {
    println!(
        r#"
bytecache - A Network-Accessible In-Memory Key-Value Cache

USAGE:
    bytecache [OPTIONS]

OPTIONS:
    -h, --host <HOST>            Host to bind to (default: 127.0.0.1)
    -p, --port <PORT>            Port to listen on (default: 45678)
    -s, --store <BACKEND>        Store backend: memory (default: memory)
    -t, --transport <TRANSPORT>  Transport: wire, http (default: wire)
    -v, --version                Print version information
        --help                   Print this help message

EXAMPLES:
    bytecache                      # Start on 127.0.0.1:45678
    bytecache --port 45680         # Start on port 45680
    bytecache --host 0.0.0.0       # Listen on all interfaces
"#
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_args();

    // Set up logging
    let _subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    println!(
        "bytecache v{} starting on {} ({} transport, {} store)",
        bytecache::VERSION,
        config.bind_address(),
        config.transport,
        config.store,
    );

    let server_config = ServerConfig {
        addr: config.bind_address(),
        transport: config.transport,
        store: config.store,
    };

    // Set up graceful shutdown
    let shutdown = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
        info!("shutdown signal received, stopping server...");
    };

    tokio::select! {
        result = server::run(server_config) => result?,
        _ = shutdown => {}
    }

    info!("server shutdown complete");
    Ok(())
}
