//! `maxwell` — CLI entry point (A2).
//!
//! Parses the command line, loads the scene file, brings up the compute
//! backend, installs the terminal event layer, and drives the simulation
//! loop until an interrupt/exit command or Ctrl-C arrives. Grounded on
//! `freddiehaddad-oxidized`'s `ox-bin/src/main.rs`: `clap::Parser` for args,
//! `tracing-subscriber` + `tracing-appender` for non-blocking file logging,
//! `anyhow::Result` with one diagnostic line on fatal error.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};

use maxwell::backend::Backend;
use maxwell::config;
use maxwell::controller::Controller;
use maxwell::presenter::Presenter;

/// 2-D TE-mode FDTD electromagnetic simulator.
#[derive(Debug, Parser)]
#[command(name = "maxwell", version, about)]
struct Args {
    /// Scene description file ([Simulation]/[Sources]/[Materials] sections).
    sim_file: PathBuf,

    /// Cell spacing in meters (both axes).
    #[arg(long, default_value_t = 1.0)]
    dx: f32,
    #[arg(long, default_value_t = 1.0)]
    dy: f32,

    /// Time step in seconds. Must satisfy the CFL bound for dx/dy.
    #[arg(long, default_value_t = 1e-12)]
    dt: f32,

    /// Directory for periodic PPM frame snapshots.
    #[arg(long, default_value = "./frames")]
    snapshot_dir: PathBuf,

    /// Snapshot every N frames.
    #[arg(long, default_value_t = 30)]
    snapshot_every: u64,

    /// Run headless: step the full simulation without polling the terminal
    /// for interactive commands (useful for batch/CI runs).
    #[arg(long)]
    headless: bool,

    /// Total steps to run in headless mode before exiting.
    #[arg(long, default_value_t = 1000)]
    steps: u64,

    /// Path to the log file.
    #[arg(long, default_value = "maxwell.log")]
    log_file: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging(&args.log_file)?;

    if let Err(err) = run(&args) {
        tracing::error!(target: "main", error = %err, "fatal error");
        eprintln!("maxwell: {err}");
        std::process::exit(1);
    }

    Ok(())
}

fn configure_logging(log_file: &PathBuf) -> anyhow::Result<tracing_appender::non_blocking::WorkerGuard> {
    let directory = log_file.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| std::path::Path::new("."));
    let filename = log_file.file_name().context("log file path has no file name")?;

    let file_appender = tracing_appender::rolling::never(directory, filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(non_blocking)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(guard)
}

fn run(args: &Args) -> anyhow::Result<()> {
    let scene = config::load_file(&args.sim_file).context("loading scene file")?;
    let (mut sim, requested_target) = config::build(&scene, args.dx, args.dy, args.dt).context("building simulation")?;

    let mut backend = Backend::new(requested_target, sim.width, sim.height);
    if backend.active() != backend.requested() {
        tracing::warn!(target: "main", "accelerator unavailable, running on CPU");
    }

    let presenter = Presenter::new(&args.snapshot_dir, args.snapshot_every).context("setting up presenter")?;
    let mut controller = Controller::new();

    if args.headless {
        run_headless(&mut sim, &mut backend, &mut controller, &presenter, args.steps)?;
    } else {
        run_interactive(&mut sim, &mut backend, &mut controller, &presenter)?;
    }

    Ok(())
}

fn run_headless(
    sim: &mut maxwell::grid::Simulation,
    backend: &mut Backend,
    controller: &mut Controller,
    presenter: &Presenter,
    steps: u64,
) -> anyhow::Result<()> {
    for _ in 0..steps {
        controller.tick(sim, backend).context("simulation step")?;
        presenter.present(sim).context("presenting frame")?;
    }
    Ok(())
}

fn run_interactive(
    sim: &mut maxwell::grid::Simulation,
    backend: &mut Backend,
    controller: &mut Controller,
    presenter: &Presenter,
) -> anyhow::Result<()> {
    crossterm::terminal::enable_raw_mode().context("enabling raw terminal mode")?;
    let result = interactive_loop(sim, backend, controller, presenter);
    let _ = crossterm::terminal::disable_raw_mode();
    result
}

fn interactive_loop(
    sim: &mut maxwell::grid::Simulation,
    backend: &mut Backend,
    controller: &mut Controller,
    presenter: &Presenter,
) -> anyhow::Result<()> {
    loop {
        if event::poll(Duration::from_millis(0)).context("polling terminal events")? {
            if let Event::Key(key) = event::read().context("reading terminal event")? {
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    break;
                }
                match key.code {
                    KeyCode::Char('q') => break,
                    KeyCode::Char(' ') => controller.toggle_running(),
                    KeyCode::Char('r') => controller.pending_reset = true,
                    KeyCode::Char('v') => controller.pending_cycle_vis = true,
                    KeyCode::Char('b') => controller.draw_boundaries = !controller.draw_boundaries,
                    KeyCode::Char('f') => controller.pending_report_fps = true,
                    _ => {}
                }
            }
        }

        controller.tick(sim, backend).context("simulation step")?;
        presenter.present(sim).context("presenting frame")?;
    }

    Ok(())
}
