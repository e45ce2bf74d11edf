//! zk-inspector entry point
//!
//! Usage: zk-inspector capture.jsonl [--config decoder.toml] [--strict] [--json]

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use zk_codec::{DecoderConfig, ReplyDecoder};
use zk_inspector::{read_capture, Inspector, Outcome};

/// Records between sweeps of idle connection tables
const PRUNE_INTERVAL: usize = 10_000;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Capture file, one JSON record per line
    capture: PathBuf,

    /// Decoder configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print decoded messages as JSON instead of one-line summaries
    #[arg(long)]
    json: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Start from tight bounds (short strings, 64 KiB frames) instead of defaults
    #[arg(long)]
    strict: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "zk_inspector=info,zk_codec=warn".into());

    // Logs go to stderr so stdout stays clean for decoded output
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }
}

fn load_config(path: Option<&PathBuf>, strict: bool) -> Result<DecoderConfig> {
    let config = match path {
        Some(path) => DecoderConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?
            .with_env_overrides(),
        None if strict => DecoderConfig::strict().with_env_overrides(),
        None => DecoderConfig::from_env(),
    };
    config.validate().context("Invalid decoder configuration")?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.json_logs);

    if args.strict && args.config.is_some() {
        warn!("--strict ignored, bounds come from the config file");
    }
    let config = load_config(args.config.as_ref(), args.strict)?;
    info!(?config, "decoder configured");

    let decoder = ReplyDecoder::new(config).context("Failed to build reply registry")?;
    debug!(opcodes = ?decoder.registry().opcodes(), "reply registry ready");
    let mut inspector = Inspector::new(decoder);

    let file = File::open(&args.capture)
        .with_context(|| format!("Failed to open capture {}", args.capture.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    for (index, record) in read_capture(BufReader::new(file)).enumerate() {
        if index > 0 && index % PRUNE_INTERVAL == 0 {
            inspector.prune();
        }

        let record = match record {
            Ok(record) => record,
            Err(err) => {
                warn!("{}", err);
                inspector.skip_unreadable();
                continue;
            }
        };

        if let Outcome::Decoded(msg) = inspector.handle(record) {
            if args.json {
                serde_json::to_writer(&mut out, &msg)?;
                writeln!(out)?;
            } else {
                writeln!(out, "{}", msg)?;
            }
        }
    }

    if inspector.pending() > 0 {
        info!(pending = inspector.pending(), "requests without a reply");
    }
    write!(out, "{}", inspector.stats())?;
    Ok(())
}
