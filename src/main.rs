use clap::Parser;
use parley::core::config::{self, CliOverrides, ParleyConfig};
use parley::plain::{self, OutputFormat};
use parley::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "parley", about = "A chat window that answers back")]
struct Args {
    /// Milliseconds before the bot replies
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Bot message shown when the conversation starts
    #[arg(long)]
    greeting: Option<String>,

    /// Read lines from stdin and print the transcript instead of opening the TUI
    #[arg(long)]
    plain: bool,

    /// Output format for --plain
    #[arg(long, default_value_t, value_enum)]
    format: OutputFormat,

    /// Log level written to parley.log
    #[arg(long, default_value_t = LevelFilter::Debug)]
    log_level: LevelFilter,

    /// Ignore ~/.parley/config.toml
    #[arg(long)]
    no_config: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to parley.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("parley.log") {
        let _ = WriteLogger::init(args.log_level, log_config, log_file);
    }

    let file_config = if args.no_config {
        ParleyConfig::default()
    } else {
        match config::load_config() {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Warning: {}", e);
                log::warn!("Config load failed, using defaults: {}", e);
                ParleyConfig::default()
            }
        }
    };

    let overrides = CliOverrides {
        response_delay_ms: args.delay_ms,
        greeting: args.greeting,
    };
    let resolved = config::resolve(&file_config, &overrides);

    log::info!(
        "Parley starting up (mode={}, delay={}ms)",
        if args.plain { "plain" } else { "tui" },
        resolved.response_delay.as_millis()
    );

    if args.plain {
        plain::run(&resolved, args.format).await
    } else {
        tui::run(&resolved)
    }
}
