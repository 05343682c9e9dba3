use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use log::{info, LevelFilter};
use statichttp_rs::{HttpServer, ServerConfig};

/// Serve the files in a directory over HTTP/1.0 and HTTP/1.1.
#[derive(Debug, Parser)]
#[command(name = "statichttp", version, about)]
struct Cli {
    /// Directory to serve
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    addr: SocketAddr,

    /// Virtual hostname requests must be addressed to
    #[arg(long, default_value = "localhost")]
    hostname: String,

    /// Maximum number of concurrent connections
    #[arg(long, default_value_t = 1024)]
    max_connections: usize,

    /// Close connections idle for this many seconds
    #[arg(long)]
    read_timeout: Option<u64>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Log everything at debug level
    #[arg(short, long)]
    debug: bool,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        if self.debug {
            return LevelFilter::Debug.max(verbosity(self.verbose));
        }
        verbosity(self.verbose)
    }

    fn into_config(self) -> ServerConfig {
        ServerConfig {
            addr: self.addr,
            root: self.root,
            hostname: self.hostname,
            max_connections: self.max_connections,
            read_timeout: self.read_timeout.map(Duration::from_secs),
            ..ServerConfig::default()
        }
    }
}

fn verbosity(count: u8) -> LevelFilter {
    match count {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // RUST_LOG, when set, wins over the command line
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let config = cli.into_config();
    if !config.root.is_dir() {
        return Err(format!("{} is not a directory", config.root.display()).into());
    }
    info!("Starting with {config:?}");

    let server = HttpServer::new(config);
    server.start().await?;

    Ok(())
}
