use std::fs::read_to_string;
use std::io::{read_to_string as read_all, stderr, stdin, stdout, BufWriter, Write};
use std::process::exit;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::{json, Value};
use tracing::{error, info};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use finance_summary_service::notifications::{ChannelKind, ChannelSource, LocalPlatform, StaticIdentity};
use finance_summary_service::router::Router;
use finance_summary_service::settings::{is_placeholder, Settings};
use finance_summary_service::storage::CsvRecordStore;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: finance-summary-service [event].json|- [log_level:optional] > [response].json");
        eprintln!("Available log levels: error, warn, info, debug, trace (default: error)");
        exit(1);
    }

    let log_level = args.get(2)
        .map(|s| parse_log_level(s)).unwrap_or_else(|| LevelFilter::ERROR);

    setup_logging(log_level);

    let event = read_event(&args[1])?;
    let settings = Arc::new(Settings::from_env().context("Could not load settings")?);

    info!("Environment [{}], region [{}], data directory [{}]", settings.environment, settings.region, settings.data_dir.display());

    let store = Arc::new(CsvRecordStore::new(settings.data_dir.clone()));
    let platform = Arc::new(LocalPlatform::new(&settings.region, &settings.account_id));
    let identity = Arc::new(StaticIdentity::new(&settings.account_id));

    provision_configured_channels(&platform, &settings);

    let router = Router::new(store, platform, identity, settings);

    match router.handle(&event).await {
        Ok(response) => write_json(&serde_json::to_value(response)?),
        Err(failure) => {
            error!("Handler error: {failure:?}");
            write_json(&json!({ "error": failure.to_string() }))?;
            exit(2);
        }
    }
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'error'", level);
            LevelFilter::ERROR
        }
    }
}

fn setup_logging(level: LevelFilter) {
    //NOTE: Because we are doing stdout redirection, we will need to utilize stderr to display logging
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}

fn read_event(source: &str) -> Result<Value> {
    let raw = if source == "-" {
        read_all(stdin().lock()).context("Could not read event from stdin")?
    } else {
        read_to_string(source).with_context(|| format!("Could not read event file {source}"))?
    };

    serde_json::from_str(&raw).context("Event is not valid JSON")
}

//NOTE: Externally provisioned topics already exist on the hosted platform; the local one has to be told about them
fn provision_configured_channels(platform: &LocalPlatform, settings: &Settings) {
    for kind in [ChannelKind::MonthlyReports, ChannelKind::BudgetAlerts] {
        if let ChannelSource::Provisioned(channel) = settings.channel_source(kind) {
            if !is_placeholder(&channel) {
                platform.provision(&channel);
            }
        }
    }
}

fn write_json(value: &Value) -> Result<()> {
    let mut output = BufWriter::new(stdout().lock());

    serde_json::to_writer(&mut output, value)?;
    writeln!(output)?;
    output.flush()?;

    Ok(())
}
