use std::sync::Arc;

use clap::Parser;
use lastlicht::{
    config::{Config, read_config_file},
    driver,
    feed::HttpMetricSource,
    lamp::HttpLamp,
    sampler::SamplerHandle,
};
use tracing::{level_filters::LevelFilter, trace};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Parser)]
struct Args {
    /// Config file
    #[arg(short, long)]
    config: Option<String>,

    /// Monitoring feed endpoint (overrides the config file)
    #[arg(long)]
    feed_url: Option<String>,

    /// Lamp base URL (overrides the config file)
    #[arg(long)]
    lamp_url: Option<String>,

    /// Poll interval in seconds (overrides the config file)
    #[arg(long)]
    interval: Option<u64>,
}

fn init() {
    dotenv::dotenv().ok();

    let filter = filter::Targets::new().with_targets(vec![
        ("lastlicht", LevelFilter::TRACE),
        ("daemon", LevelFilter::TRACE),
    ]);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init();
    let args = Args::parse();
    trace!("started with args: {args:?}");

    let mut config = match &args.config {
        Some(path) => read_config_file(path)?,
        None => Config::default(),
    };

    if let Some(feed_url) = args.feed_url {
        config.feed_url = feed_url;
    }
    if let Some(lamp_url) = args.lamp_url {
        config.lamp_url = lamp_url;
    }
    if let Some(interval) = args.interval {
        config.interval_secs = interval;
    }

    let source = Arc::new(HttpMetricSource::new(config.feed_url.as_str())?);
    let lamp = Arc::new(HttpLamp::new(config.lamp_url.as_str())?);

    let sampler = SamplerHandle::spawn(source, config.interval());

    driver::run(sampler, lamp).await;

    Ok(())
}
