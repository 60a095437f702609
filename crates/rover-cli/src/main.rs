//! `rover` – camera-guided rover control station.
//!
//! This binary is the ignition switch for the rover stack. It:
//!
//! 1. Loads `~/.rover/config.toml`, writing a commented default on first run.
//! 2. Opens the serial channel to the motor controller and starts the
//!    control tasks: decision loop, telemetry reporter, command ingress,
//!    and (when configured) the simulated camera + classifier.
//! 3. Drops the operator into the interactive command shell on the main
//!    thread.
//! 4. Intercepts **Ctrl-C** and winds every task down through the shared
//!    shutdown channel.

mod broadcast;
mod config;
mod shell;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use tracing::warn;

use rover_control::{CommandSink, SerialCommandSink, reporter::StatusSink};
use rover_proto::{FrameReader, FrameWriter};
use rover_state::Blackboard;
use rover_vision::{Classifier, SimCamera, SimScene};

fn main() -> ExitCode {
    // ── Structured logging ────────────────────────────────────────────────
    // RUST_LOG controls the filter (defaults to "info"); ROVER_LOG_FORMAT=json
    // switches to newline-delimited JSON for log aggregators. Operator-facing
    // output still goes through println!.
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    if std::env::var("ROVER_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .compact()
            .init();
    }

    print_banner();

    // ── Configuration ─────────────────────────────────────────────────────
    let cfg = match config::load() {
        Ok(Some(cfg)) => {
            println!(
                "  config loaded from {}",
                config::config_path().display().to_string().bold()
            );
            cfg
        }
        Ok(None) => {
            let cfg = config::Config::default();
            match config::save(&cfg) {
                Ok(()) => println!(
                    "  first run – wrote defaults to {}",
                    config::config_path().display().to_string().bold()
                ),
                Err(e) => println!("{}: {}", "could not write default config".yellow(), e),
            }
            cfg
        }
        Err(e) => {
            println!("{}: {}", "config error".red(), e);
            println!("  continuing with defaults.");
            config::Config::default()
        }
    };

    // ── Runtime ───────────────────────────────────────────────────────────
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("{}: {}", "failed to start async runtime".red(), e);
            return ExitCode::FAILURE;
        }
    };

    // ── Shutdown channel + Ctrl-C ─────────────────────────────────────────
    let (handle, shutdown) = rover_control::shutdown::channel();
    let handle = Arc::new(handle);

    let handle_for_ctrlc = Arc::clone(&handle);
    if let Err(e) = ctrlc::set_handler(move || {
        println!();
        println!("{}", "Ctrl-C received – shutting down".yellow().bold());
        handle_for_ctrlc.trigger();
    }) {
        warn!(error = %e, "failed to install Ctrl-C handler");
    }

    // ── Serial channel ────────────────────────────────────────────────────
    // Opened twice: one read handle feeding command ingress, one write handle
    // behind the shared command sink.
    let device = cfg.serial_device.clone();
    let (read_half, write_half) = match runtime.block_on(open_serial(&device)) {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!(
                "{}: {} ({})",
                "cannot open serial device".red(),
                device.bold(),
                e
            );
            return ExitCode::FAILURE;
        }
    };

    let sink: Arc<dyn CommandSink> = SerialCommandSink::new(FrameWriter::new(write_half, "serial"));
    let reader = FrameReader::new(read_half, "serial");

    // ── Control tasks ─────────────────────────────────────────────────────
    let board = Arc::new(Blackboard::new());
    let mut tasks = Vec::new();

    let pilot_config = rover_control::pilot::PilotConfig {
        tick: Duration::from_millis(cfg.tick_ms),
        dwell: Duration::from_secs(cfg.dwell_secs),
        cruise_speed: cfg.cruise_speed,
        ..rover_control::pilot::PilotConfig::default()
    };
    tasks.push(runtime.spawn(rover_control::pilot::run(
        Arc::clone(&board),
        Arc::clone(&sink),
        pilot_config,
        handle.subscribe(),
    )));

    let status_sink: Arc<dyn StatusSink> =
        Arc::new(broadcast::TcpStatusSink::new(&cfg.broadcast_addr));
    tasks.push(runtime.spawn(rover_control::reporter::run(
        Arc::clone(&board),
        status_sink,
        Duration::from_millis(cfg.report_interval_ms),
        handle.subscribe(),
    )));

    tasks.push(runtime.spawn(rover_control::ingress::run(
        reader,
        Arc::clone(&board),
        handle.subscribe(),
    )));

    if cfg.camera == "sim" {
        let camera = SimCamera::new(96, 32, SimScene::from_name(&cfg.sim_scene));
        tasks.push(runtime.spawn(rover_control::perceive::run(
            camera,
            Classifier::new(),
            Arc::clone(&board),
            rover_control::perceive::FRAME_PAUSE,
            handle.subscribe(),
        )));
    } else {
        println!("  camera: {} (perception disabled)", cfg.camera.dimmed());
    }

    // ── Shell (blocks the main thread until quit / Ctrl-C / EOF) ──────────
    shell::run(sink, runtime.handle().clone(), &handle, shutdown);

    // ── Wind down ─────────────────────────────────────────────────────────
    handle.trigger();
    runtime.block_on(async {
        for task in tasks {
            if let Err(e) = task.await {
                warn!(error = %e, "task ended abnormally");
            }
        }
    });

    println!("{}", "all tasks stopped. bye.".green());
    ExitCode::SUCCESS
}

/// Open the serial device twice: a read handle and a write handle.
async fn open_serial(device: &str) -> std::io::Result<(tokio::fs::File, tokio::fs::File)> {
    let read_half = tokio::fs::File::open(device).await?;
    let write_half = tokio::fs::OpenOptions::new()
        .write(true)
        .open(device)
        .await?;
    Ok((read_half, write_half))
}

fn print_banner() {
    println!();
    println!("  {}", "ROVER".bold().cyan());
    println!("  {}", "camera-guided rover control station".dimmed());
    println!();
}
