//! Simple load reporter example
//!
//! Run with: cargo run --example simple_reporter [CHANNELS] [CALLS_PER_CHANNEL]
//!
//! Simulates a pipeline with a few channels serving concurrent calls and a
//! reporter that tallies per-method load from the lifecycle events.
//!
//! Set `RUST_LOG=load_reporting=trace` to see every dispatch.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use load_reporting::{
    CallFinalInfo, CallId, ChannelArgs, ChannelId, ChannelReporter, LifecycleEvent,
    LoadReporter, LoadReportingConfig, MetadataMap, ReportingOptions, StatusCode,
    LOAD_REPORTING_INITIAL_MD_KEY, LOAD_REPORTING_TRAILING_MD_KEY,
};

#[derive(Debug, Default, Clone)]
struct MethodLoad {
    calls: u64,
    errors: u64,
    total_latency: Duration,
    bytes: u64,
}

/// Reporter that aggregates load per method
struct MyReporter {
    channels: AtomicU64,
    active_calls: AtomicU64,
    per_method: Mutex<HashMap<String, MethodLoad>>,
}

impl MyReporter {
    fn new() -> Self {
        Self {
            channels: AtomicU64::new(0),
            active_calls: AtomicU64::new(0),
            per_method: Mutex::new(HashMap::new()),
        }
    }

    fn print_stats(&self) {
        println!(
            "Stats: channels_open={} active_calls={}",
            self.channels.load(Ordering::Relaxed),
            self.active_calls.load(Ordering::Relaxed),
        );

        let per_method = self.per_method.lock().unwrap();
        let mut methods: Vec<_> = per_method.iter().collect();
        methods.sort_by(|a, b| a.0.cmp(b.0));
        for (method, load) in methods {
            let avg = load.total_latency / load.calls.max(1) as u32;
            println!(
                "  {:<20} calls={:<4} errors={:<3} avg_latency={:?} bytes={}",
                method, load.calls, load.errors, avg, load.bytes
            );
        }
    }
}

/// Handle registered with the config; the demo keeps another to print stats
struct SharedReporter(Arc<MyReporter>);

impl LoadReporter for SharedReporter {
    fn report(&self, event: &LifecycleEvent<'_>) {
        let this = &self.0;
        match event {
            LifecycleEvent::ChannelCreation { channel_id } => {
                this.channels.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(channel = %channel_id, "Channel opened");
            }
            LifecycleEvent::ChannelDestruction { channel_id } => {
                this.channels.fetch_sub(1, Ordering::Relaxed);
                tracing::debug!(channel = %channel_id, "Channel closed");
            }
            LifecycleEvent::CallCreation { initial_md, .. } => {
                this.active_calls.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(initial_md = ?initial_md, "Call started");
            }
            LifecycleEvent::CallDestruction {
                method_name,
                trailing_md,
                final_info,
                ..
            } => {
                this.active_calls.fetch_sub(1, Ordering::Relaxed);
                let mut per_method = this.per_method.lock().unwrap();
                let load = per_method.entry(method_name.to_string()).or_default();
                load.calls += 1;
                if !final_info.is_ok() {
                    load.errors += 1;
                }
                load.total_latency += final_info.latency;
                load.bytes += final_info.bytes_received + final_info.bytes_sent;
                tracing::trace!(
                    method = method_name,
                    status = %final_info.status,
                    trailing_md = ?trailing_md,
                    "Call finished"
                );
            }
        }
    }

    fn on_registered(&self) {
        println!("Load reporter registered");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let channels: u64 = args.get(1).map(|s| s.parse()).transpose()?.unwrap_or(3);
    let calls_per_channel: u64 = args.get(2).map(|s| s.parse()).transpose()?.unwrap_or(20);

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("load_reporting=debug".parse()?)
                .add_directive("simple_reporter=debug".parse()?),
        )
        .init();

    let reporter = Arc::new(MyReporter::new());
    let config = LoadReportingConfig::builder()
        .reporter(SharedReporter(Arc::clone(&reporter)))
        .options(ReportingOptions::default().isolate_panics())
        .build()?;

    let channel_args = ChannelArgs::new().with(config.to_channel_arg());
    let methods = ["/echo.Echo/Say", "/echo.Echo/Stream", "/health.Health/Check"];

    let mut tasks = Vec::new();
    for c in 0..channels {
        let Some(channel) = ChannelReporter::attach(&channel_args, ChannelId::from(c)) else {
            continue;
        };

        for i in 0..calls_per_channel {
            let channel = channel.clone();
            let method = methods[(i as usize) % methods.len()];
            tasks.push(tokio::spawn(async move {
                let call_id = CallId::from(c * 1_000 + i);
                let initial = MetadataMap::new()
                    .with(":authority", "demo.local")
                    .with(LOAD_REPORTING_INITIAL_MD_KEY, format!("client=demo-{}", c));
                let mut call = channel.start_call(call_id, method, &initial);

                let work = Duration::from_millis(1 + (i % 5));
                tokio::time::sleep(work).await;

                let trailing = MetadataMap::new()
                    .with(LOAD_REPORTING_TRAILING_MD_KEY, format!("cost={}", i % 7));
                call.set_trailing_metadata(&trailing);
                let status = if i % 11 == 10 {
                    StatusCode::Unavailable
                } else {
                    StatusCode::Ok
                };
                let info = CallFinalInfo::new(status, call.elapsed()).bytes(128 * i, 64);
                call.finish(info);
            }));
        }
    }

    for task in tasks {
        task.await?;
    }

    drop(channel_args);
    println!("Config refs after all channels closed: {}", config.ref_count());
    reporter.print_stats();
    config.release();

    Ok(())
}
