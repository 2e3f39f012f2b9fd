mod config;
mod directory;
mod hostel;
mod ipc;
mod model;
mod seed;
mod wardens;

use anyhow::Context;
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

fn init_tracing(default_filter: &str) {
    // stdout carries the IPC stream; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let config = config::Config::load()?;
    init_tracing(&config.log_filter);

    let school = seed::load(config.seed).context("failed to seed school data")?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        seed = ?config.seed,
        students = school.students.len(),
        rooms = school.rooms.len(),
        enforce_capacity = config.allocation.enforce_capacity,
        roster_conflicts = ?config.allocation.roster_conflicts,
        "sidecar ready"
    );
    let mut state = ipc::AppState { school, config };

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(error = %e, "stdin read failed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let resp = match serde_json::from_str::<ipc::Request>(&line) {
            Ok(req) => ipc::handle_request(&mut state, req),
            Err(e) => {
                // No id to echo back.
                tracing::warn!(error = %e, "unparseable request line");
                ipc::bad_json(e.to_string())
            }
        };

        writeln!(stdout, "{}", resp).context("failed to write response")?;
        stdout.flush().context("failed to flush stdout")?;
    }

    tracing::info!("stdin closed, exiting");
    Ok(())
}
