//! Endpoint inspection demo.
//!
//! Authenticates against the live exchange, prints the market status, and
//! dumps the raw JSON of the company endpoints for one security. Useful
//! when the server changes a response shape and a typed wrapper stops
//! parsing.
//!
//! ```console
//! $ cargo run --example debug -- --security-id 2781 --no-tls-verify -v
//! ```

use std::process;

use clap::Parser;
use log::{debug, error, info, LevelFilter};

use salter::{client::Client, config::Config, error::Result};

/// Group name for mutually exclusive logging options.
const ARGS_GROUP_LOGGING: &str = "logging";

/// Command line arguments as parsed by `clap`.
#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Security ID to inspect
    #[arg(short, long, default_value_t = 2781, env = "SALTER_SECURITY_ID")]
    security_id: i32,

    /// Accept the exchange's broken TLS certificate chains
    #[arg(long, default_value_t = false, env = "SALTER_NO_TLS_VERIFY")]
    no_tls_verify: bool,

    /// Suppress all output except warnings and errors
    #[arg(short, long, default_value_t = false, group = ARGS_GROUP_LOGGING, env = "SALTER_QUIET")]
    quiet: bool,

    /// Enable verbose logging
    ///
    /// Use -v for debug logging
    /// Use -vv for trace logging
    #[arg(short, long, action = clap::ArgAction::Count, group = ARGS_GROUP_LOGGING, env = "SALTER_VERBOSE")]
    verbose: u8,
}

/// Initializes the logger facade.
///
/// The logging level is determined as follows, in order of precedence
/// from highest to lowest:
/// 1. Command line arguments
/// 2. `RUST_LOG` environment variable
/// 3. Hard-coded default
fn init_logger(args: &Args) {
    let mut logger = env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );

    if args.quiet || args.verbose > 0 {
        let level = match args.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        logger.filter_module("salter", level);
        logger.filter_module(module_path!(), level);
    }

    logger.init();
}

async fn run(args: Args) -> Result<()> {
    let config = Config {
        tls_verification: !args.no_tls_verify,
        ..Config::default()
    };
    let client = Client::new(config)?;

    let status = client.market_status().await?;
    info!(
        "market is {} as of {}",
        if status.is_market_open() { "open" } else { "closed" },
        status.as_of,
    );

    let endpoints = [
        ("profile", format!("/api/nots/security/profile/{}", args.security_id)),
        (
            "board of directors",
            format!("/api/nots/security/boardOfDirectors/{}", args.security_id),
        ),
        (
            "corporate actions",
            format!("/api/nots/security/corporate-actions/{}", args.security_id),
        ),
        ("reports", format!("/api/nots/application/reports/{}", args.security_id)),
        ("dividend", format!("/api/nots/application/dividend/{}", args.security_id)),
    ];

    for (name, path) in endpoints {
        println!("\n=== {name} ===");
        println!("endpoint: {path}\n");

        match client.raw(&path).await {
            Ok(body) => match serde_json::from_str::<serde_json::Value>(&body) {
                Ok(value) => println!(
                    "{}",
                    serde_json::to_string_pretty(&value).unwrap_or(body)
                ),
                // Not valid JSON, print raw.
                Err(_) => println!("{body}"),
            },
            Err(e) => error!("{name}: {e}"),
        }
    }

    client.close();
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logger(&args);

    debug!("Command {args:#?}");

    if let Err(e) = run(args).await {
        error!("{e}");
        process::exit(1);
    }
}
