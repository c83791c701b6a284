//! Tournament blind clock for the terminal.
//!
//! Spawns a ClockActor over a JSON-backed tournament, prints clock events,
//! and reads operator commands from stdin.

use std::{io::BufRead, sync::Arc};

use anyhow::Error;
use bc_console::{
    commands::{self, Input},
    config::{ConfigOverrides, ConsoleConfig},
    logging, render,
};
use blind_clock::{
    clock::{ClockActor, ClockHandle, ClockResponse},
    notify::{BroadcastSink, ClockEvent, FanoutSink, LogSink, NotificationSink},
    storage::{BackgroundStore, JsonFileStore, StateStore},
    tournament::Tournament,
};
use pico_args::Arguments;
use tokio::sync::mpsc;
use tracing::info;

const HELP: &str = "\
Run a poker tournament blind clock in the terminal

USAGE:
  bc_console [OPTIONS]

OPTIONS:
  --state      PATH        Saved tournament file      [default: env CLOCK_STATE_PATH or poker-tournament-settings.json]
  --tick-ms    MS          Clock tick interval        [default: env CLOCK_TICK_MS or 250]
  --delay      SECS        Delay before auto-advance  [default: env CLOCK_AUTO_ADVANCE_DELAY_SECS or 0]
  --structure  KEY         Default blind structure    [default: env CLOCK_STRUCTURE or regular]

FLAGS:
  --fresh                  Ignore the saved tournament and start over
  -h, --help               Print help information

ENVIRONMENT:
  CLOCK_EVENT_BUFFER       Capacity of the display event channel
  RUST_LOG                 Log filter (e.g., blind_clock=debug)
  (A .env file in the working directory is read first)

Type 'help' at the prompt for the list of commands.
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let fresh = pargs.contains("--fresh");
    let overrides = ConfigOverrides {
        state_path: pargs.opt_value_from_str("--state")?,
        tick_ms: pargs.opt_value_from_str("--tick-ms")?,
        auto_advance_delay_secs: pargs.opt_value_from_str("--delay")?,
        structure: pargs.opt_value_from_str("--structure")?,
    };

    logging::init();

    let config = ConsoleConfig::from_env(overrides);
    config.validate()?;
    info!("Using state file {}", config.state_path.display());

    let file_store = Arc::new(JsonFileStore::new(config.state_path.clone()));
    if fresh {
        file_store.clear()?;
        info!("Saved tournament cleared");
    }
    let (store, writer) = BackgroundStore::spawn(file_store);

    let display_sink = Arc::new(BroadcastSink::new(config.event_buffer));
    let events = display_sink.subscribe();
    let sink = FanoutSink::new(vec![
        Arc::new(LogSink) as Arc<dyn NotificationSink>,
        display_sink as Arc<dyn NotificationSink>,
    ]);

    let tournament = Tournament::restore(config.clock_config(), Arc::new(store), Arc::new(sink));
    let (actor, handle) = ClockActor::new(tournament);
    let actor_task = tokio::spawn(actor.run());
    tokio::spawn(print_events(events));

    print!("{}", render::render_view(&handle.view().await?));
    println!("Type 'help' for commands.");

    tokio::select! {
        result = command_loop(&handle, spawn_stdin_reader()) => result?,
        _ = shutdown_signal() => info!("Interrupted"),
    }

    info!("Shutting down clock...");
    handle.shutdown().await?;
    actor_task.await?;
    // The actor owned the store; its final save is flushed once the writer ends
    writer.await?;

    Ok(())
}

/// Read stdin on a dedicated thread so a pending read never blocks shutdown
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (sender, receiver) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if sender.blocking_send(line).is_err() {
                break;
            }
        }
    });
    receiver
}

/// Handle operator commands until `quit` or end of input
async fn command_loop(handle: &ClockHandle, mut lines: mpsc::Receiver<String>) -> Result<(), Error> {
    while let Some(line) = lines.recv().await {
        if line.trim().is_empty() {
            continue;
        }

        match commands::parse_command(&line) {
            Ok(Input::Quit) => break,
            Ok(Input::Help) => print!("{}", commands::COMMANDS),
            Ok(Input::Status) => print!("{}", render::render_view(&handle.view().await?)),
            Ok(Input::Dump) => {
                let snapshot = handle.snapshot().await?;
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            }
            Ok(Input::Command(command)) => match handle.execute(command).await? {
                ClockResponse::Applied => {}
                ClockResponse::LevelAdded(id) => println!("Added level {}", id),
                ClockResponse::Ignored(reason) => {
                    logging::log_ignored(line.trim(), &reason.to_string());
                    println!("Ignored: {}", reason);
                }
            },
            Err(e) => println!("{}", e),
        }
    }

    Ok(())
}

/// Print display-worthy events as they arrive
async fn print_events(mut events: mpsc::Receiver<ClockEvent>) {
    while let Some(event) = events.recv().await {
        if let Some(line) = render::render_event(&event) {
            println!("{}", line);
        }
    }
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
