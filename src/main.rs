//! Loopback demo: both link endpoints in one process, joined by
//! in-memory byte pipes.  A scripted host driver starts a session, lets
//! telemetry flow, resets, then runs a second session before exiting.

use anyhow::Context;
use edge_executor::LocalExecutor;
use embassy_time::Timer;
use futures_lite::future::block_on;
use log::info;

use aquasense::app::events::LogEventSink;
use aquasense::channels::{CONTROLLER_FRAMES, HOST_COMMANDS, PLATFORM_FRAMES};
use aquasense::config::SystemConfig;
use aquasense::controller;
use aquasense::link::io_task::{frame_pump, host_line_pump};
use aquasense::link::transport::{duplex, BytePipe, ByteTransport, PipeEnd};
use aquasense::pipeline::{self, LogIndicator};
use aquasense::platform;
use aquasense::sensors::SensorHub;

// The simulated serial lines: sensor link plus host link, one pipe per
// direction.
static CTRL_TO_PLAT: BytePipe = BytePipe::new();
static PLAT_TO_CTRL: BytePipe = BytePipe::new();
static HOST_TO_CTRL: BytePipe = BytePipe::new();
static CTRL_TO_HOST: BytePipe = BytePipe::new();

fn load_config() -> anyhow::Result<SystemConfig> {
    match std::env::var("AQUASENSE_CONFIG") {
        Ok(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config file {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("parsing config file {path}"))
        }
        Err(_) => Ok(SystemConfig::default()),
    }
}

async fn host_driver(mut host: PipeEnd, demo_secs: u64) -> anyhow::Result<()> {
    info!("host: START");
    host.write_bytes(b"START\n").await?;
    Timer::after_secs(demo_secs).await;

    info!("host: RESET");
    host.write_bytes(b"RESET\n").await?;
    Timer::after_secs(2).await;

    info!("host: START (second session)");
    host.write_bytes(b"START\n").await?;
    Timer::after_secs(demo_secs).await;

    info!("host: demo complete");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_config()?;
    info!("aquasense loopback starting: {config:?}");

    let (controller_end, platform_end) = duplex(&CTRL_TO_PLAT, &PLAT_TO_CTRL);
    let (host_end, controller_host_end) = duplex(&HOST_TO_CTRL, &CTRL_TO_HOST);

    let ex: LocalExecutor = LocalExecutor::default();

    // Byte pumps: transport -> decoder -> bounded channel.
    ex.spawn(frame_pump(controller_end, &CONTROLLER_FRAMES, "controller"))
        .detach();
    ex.spawn(frame_pump(platform_end, &PLATFORM_FRAMES, "platform"))
        .detach();
    ex.spawn(host_line_pump(controller_host_end, &HOST_COMMANDS))
        .detach();

    // The three long-running stages.
    ex.spawn(controller::task::run(
        controller_end,
        config.clone(),
        LogEventSink,
    ))
    .detach();
    ex.spawn(platform::task::run(
        platform_end,
        SensorHub::new(config.sensor_noise_seed),
    ))
    .detach();
    ex.spawn(pipeline::task::run(LogIndicator)).detach();

    block_on(ex.run(host_driver(host_end, config.demo_telemetry_secs)))
}
