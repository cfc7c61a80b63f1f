use anyhow::{Context, Result};
use handover_convo::{HttpStatsSource, PollerConfig, Stats, StatsPoller};
use std::time::Duration;
use tokio::sync::mpsc;

pub fn run(
    url: String,
    index: Option<String>,
    interval_ms: u64,
    count: usize,
    pretty: bool,
) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    runtime.block_on(poll(url, index, interval_ms, count, pretty))
}

async fn poll(
    url: String,
    index: Option<String>,
    interval_ms: u64,
    count: usize,
    pretty: bool,
) -> Result<()> {
    let source = HttpStatsSource::new(&url, index.as_deref());
    tracing::debug!(url = %source.url(), index = %source.index(), "polling stats");

    let config = PollerConfig {
        interval: Duration::from_millis(interval_ms.max(1)),
    };
    let poller = StatsPoller::new(source, Some(config));
    let (tx, mut rx) = mpsc::channel(4);
    let handle = poller.start(tx);

    for _ in 0..count {
        let Some(stats) = rx.recv().await else {
            break;
        };
        println!("{}", format_stats(&stats, pretty)?);
    }

    handle.stop().await;
    Ok(())
}

fn format_stats(stats: &Stats, pretty: bool) -> Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(stats)?
    } else {
        serde_json::to_string(stats)?
    })
}
