use std::{env, process, time::Duration};

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use counter_client::{
    config::{normalize_args, DEFAULT_REPEATS, DEFAULT_SERVER_ADDR, DEFAULT_TIMEOUT},
    serve, ClientConfig,
};

#[derive(Debug, Parser)]
#[command(about = "Increments a remote counter and prints every new value.")]
struct Opts {
    /// Server address as host:port
    #[arg(long, default_value = DEFAULT_SERVER_ADDR)]
    server: String,

    /// Number of sequential increments
    #[arg(short = 'n', long, default_value_t = DEFAULT_REPEATS)]
    repeats: usize,

    /// Overall deadline in seconds, shared by the connect and every call
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout: u64,
}

impl From<Opts> for ClientConfig {
    fn from(opts: Opts) -> Self {
        Self {
            server: opts.server,
            repeats: opts.repeats,
            timeout: Duration::from_secs(opts.timeout),
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from(Opts::parse_from(normalize_args(env::args())));

    if let Err(e) = serve(&config).await {
        error!("failed to connect to the server: {}", e);
        process::exit(1);
    }
}
