use anyhow::Context;
use bridge::sse::SseBridge;
use clap::Parser;
use device::simulator::DeviceSimulator;
use session::config::MonitorConfig;
use session::runner::SessionRunner;
use session::tracker::SessionTracker;
use sink::recorder::RecordSink;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tococore::feed::ReadingBus;
use tococore::telemetry::MetricsRecorder;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;

mod bridge;
mod device;
mod session;
mod sink;

#[derive(Parser)]
#[command(author, version, about = "Contraction monitoring ingest and streaming service")]
struct Args {
    /// Load a monitor config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the HTTP bridge port
    #[arg(long)]
    port: Option<u16>,
    /// Run one simulated session offline and emit a summary
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Simulated session length in seconds for --offline
    #[arg(long, default_value_t = 3600.0)]
    offline_secs: f32,
    /// Feed the bus from the built-in simulated tocodynamometer
    #[arg(long, default_value_t = false)]
    simulate: bool,
    /// Keep the HTTP bridge alive for readings and SSE clients
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = if let Some(path) = args.config {
        MonitorConfig::load(path)?
    } else {
        MonitorConfig::default()
    };
    if let Some(port) = args.port {
        config.port = port;
    }

    if args.offline {
        let runner = SessionRunner::new(config.clone());
        let report = runner.execute(args.offline_secs)?;

        println!(
            "Offline session -> readings {}, contractions {}, last 10 min {}, verdict: {}",
            report.readings,
            report.contractions,
            report.snapshot.last10_count,
            report.verdict.summary()
        );

        let line = format!(
            "readings={} contractions={} last10={} last24={} median_interval={:?} median_duration={:?} verdict={}\n",
            report.readings,
            report.contractions,
            report.snapshot.last10_count,
            report.snapshot.last24_count,
            report.snapshot.median_interval_secs,
            report.snapshot.median_duration_secs,
            report.verdict.summary()
        );
        let report_path = PathBuf::from("tools/data/offline_session.log");
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(report_path)?;
        file.write_all(line.as_bytes())?;
    }

    if args.serve || args.simulate {
        let bus = ReadingBus::new(config.bus_capacity);
        let metrics = Arc::new(MetricsRecorder::new());
        let tracker = Arc::new(RwLock::new(SessionTracker::new(
            config.rule.clone(),
            metrics.clone(),
        )));
        let sink = RecordSink::new(config.record_endpoint.clone())?;

        // The tracker holds the one long-lived bus subscription; SSE clients
        // each register their own through the bridge.
        let _consumer = SessionTracker::spawn_consumer(tracker.clone(), bus.subscribe(), sink);

        let sse_bridge = SseBridge::new(bus.clone(), tracker, metrics, &config);
        sse_bridge.publish_status(&format!(
            "HTTP bridge on {} (Ctrl+C to stop)...",
            sse_bridge.address()
        ));

        if args.simulate {
            let _device = DeviceSimulator::spawn(bus, config.device.clone());
        }

        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
