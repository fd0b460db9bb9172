//! `park-controller`: run the admission controller on a named pipe.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::error;

use park_admission::config::ParkConfig;
use park_admission::util::init_tracing;

#[derive(Parser, Debug)]
#[command(name = "park-controller")]
#[command(about = "Admission controller for an hour-sliced park", long_about = None)]
struct Args {
    /// First simulated hour
    #[arg(short = 'i', long, env = "PARK_START_HOUR", default_value_t = 7)]
    start_hour: u32,
    /// Last simulated hour; the run ends when the clock reaches it
    #[arg(short = 'f', long, env = "PARK_END_HOUR", default_value_t = 19)]
    end_hour: u32,
    /// Real seconds per simulated hour
    #[arg(short = 's', long, env = "PARK_TICK_INTERVAL_SECS", default_value_t = 10)]
    tick_interval_secs: u64,
    /// Persons allowed in the park during any one hour
    #[arg(short = 't', long, env = "PARK_GLOBAL_MAX_CAPACITY", default_value_t = 100)]
    global_max_capacity: u32,
    /// Path of the inbound named pipe
    #[arg(short = 'p', long, env = "PARK_INBOUND_CHANNEL", default_value = "PIPE_RECEPTOR")]
    inbound_channel: String,
    /// How long a response waits for its requester to open the reply pipe
    #[arg(long, env = "PARK_DELIVERY_TIMEOUT_MS", default_value_t = 500)]
    delivery_timeout_ms: u64,
    /// JSON configuration file; replaces the values above
    #[arg(long, env = "PARK_CONFIG")]
    config: Option<PathBuf>,
    /// Print the final report as JSON
    #[arg(long, default_value_t = false)]
    report_json: bool,
}

impl Args {
    fn park_config(&self) -> anyhow::Result<ParkConfig> {
        if let Some(path) = &self.config {
            let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            return ParkConfig::from_json_str(&raw).map_err(anyhow::Error::msg);
        }
        let config = ParkConfig {
            start_hour: self.start_hour,
            end_hour: self.end_hour,
            tick_interval_secs: self.tick_interval_secs,
            global_max_capacity: self.global_max_capacity,
            inbound_channel: self.inbound_channel.clone(),
            delivery_timeout_ms: self.delivery_timeout_ms,
        };
        config.validate().map_err(anyhow::Error::msg)?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    init_tracing();

    let args = Args::parse();
    let config = match args.park_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("invalid configuration: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    match run(config, args.report_json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "controller failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(unix)]
fn run(config: ParkConfig, report_json: bool) -> anyhow::Result<()> {
    use park_admission::builders::ControllerBuilder;
    use park_admission::infra::{FifoListener, FifoMailbox, InboundQueue};

    let delivery_timeout = config.delivery_timeout();
    let inbound_channel = config.inbound_channel.clone();
    let controller = ControllerBuilder::new(config).build()?;

    let queue = InboundQueue::default();
    let mut listener = FifoListener::bind(&inbound_channel)?;
    listener.start(queue.sender())?;

    let handle = controller.start(queue.receiver(), FifoMailbox::new(delivery_timeout))?;
    #[cfg(feature = "tokio-runtime")]
    let _signals = park_admission::runtime::spawn_signal_listener(handle.stop_signal())?;

    let report = handle.wait()?;
    listener.shutdown();

    if report_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}

#[cfg(not(unix))]
fn run(_config: ParkConfig, _report_json: bool) -> anyhow::Result<()> {
    anyhow::bail!("the named-pipe transport requires a Unix platform")
}
