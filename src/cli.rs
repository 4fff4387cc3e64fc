//! CLI interface for syncwatch.
//!
//! `syncwatch run` is the long-lived service. The other commands are
//! one-shot helpers around the same pieces: a single tick, raising the
//! manual marker, listing tasks, printing fingerprints.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use jiff::Zoned;

use crate::{
    config::Config,
    fingerprint::{local_fingerprint, remote_fingerprint},
    marker::ManualMarker,
    network::Iwgetid,
    scheduler::{Scheduler, Scope},
    tasks::load_tasks,
    transfer::Rclone,
};

/// Keep directories in sync when it matters.
#[derive(Debug, Parser)]
#[command(name = "syncwatch", version)]
pub struct Cli {
    /// Settings file. Defaults to `<config dir>/syncwatch/config.toml`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Defaults to `run`.
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the scheduler until killed.
    ///
    /// Checks WiFi tasks once at startup, then every task each tick.
    Run,

    /// Run a single tick over every task and exit.
    ///
    /// Run history starts empty, so every trigger that is due fires.
    Tick,

    /// Request a manual sync of every manual task on the next tick.
    Trigger,

    /// List the tasks in the task file.
    Tasks,

    /// Print the content fingerprint of a directory or remote endpoint.
    Fingerprint {
        /// Local directory, or remote endpoint with `--remote`.
        target: String,

        /// Treat `target` as a remote endpoint.
        #[arg(long)]
        remote: bool,
    },
}

/// Run the CLI, returning an error message on failure.
pub fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).map_err(|e| e.to_string())?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => scheduler(&config).run(),
        Command::Tick => cmd_tick(&config),
        Command::Trigger => cmd_trigger(&config),
        Command::Tasks => cmd_tasks(&config),
        Command::Fingerprint { target, remote } => cmd_fingerprint(&config, &target, remote),
    }
}

fn scheduler(config: &Config) -> Scheduler<Rclone, Iwgetid> {
    Scheduler::new(
        config,
        Rclone::new(&config.rclone),
        Iwgetid::new(&config.iwgetid),
    )
}

fn cmd_tick(config: &Config) -> Result<(), String> {
    let report = scheduler(config)
        .tick(Zoned::now(), Scope::All)
        .map_err(|e| e.to_string())?;

    println!(
        "evaluated {}, fired {}, synced {}, unchanged {}, failed {}",
        report.evaluated, report.fired, report.synced, report.unchanged, report.failed
    );

    if report.failed > 0 {
        return Err(format!("{} task(s) failed", report.failed));
    }
    Ok(())
}

fn cmd_trigger(config: &Config) -> Result<(), String> {
    let marker = ManualMarker::new(&config.marker);
    marker
        .raise()
        .map_err(|e| format!("failed to create {}: {e}", marker.path().display()))?;

    println!("{}", marker.path().display());
    Ok(())
}

fn cmd_tasks(config: &Config) -> Result<(), String> {
    let tasks = load_tasks(&config.tasks_file).map_err(|e| e.to_string())?;

    if tasks.is_empty() {
        println!("No tasks");
        return Ok(());
    }

    for task in &tasks {
        println!("{task}");
    }
    Ok(())
}

fn cmd_fingerprint(config: &Config, target: &str, remote: bool) -> Result<(), String> {
    let fingerprint = if remote {
        remote_fingerprint(&Rclone::new(&config.rclone), target)
    } else {
        local_fingerprint(Path::new(target))
    }
    .map_err(|e| e.to_string())?;

    println!("{fingerprint}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_run() {
        let cli = Cli::try_parse_from(["syncwatch"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn global_config_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["syncwatch", "tasks", "--config", "/etc/sw.toml"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Tasks)));
        assert_eq!(cli.config, Some(PathBuf::from("/etc/sw.toml")));
    }

    #[test]
    fn fingerprint_remote_flag() {
        let cli =
            Cli::try_parse_from(["syncwatch", "fingerprint", "gdrive:saves", "--remote"]).unwrap();
        let Some(Command::Fingerprint { target, remote }) = cli.command else {
            panic!("expected fingerprint command");
        };
        assert_eq!(target, "gdrive:saves");
        assert!(remote);
    }
}
