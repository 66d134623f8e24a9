pub mod handlers;
pub mod history;
pub mod output;

use std::{io, path::PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use history::{process_history_command, HistoryCommand};
use output::format_entry;
use tracing::debug;

use crate::{
    storage::file_store::FileStore,
    utils::{
        clock::DefaultClock,
        dir::{create_application_default_path, create_application_path, store_path},
        logging::enable_logging,
    },
    workout::{EntryUpdate, WorkoutLog},
};

#[derive(Parser, Debug)]
#[command(name = "liftlog", version, long_about = None)]
#[command(about = "Log workout sets, track personal records and daily streaks", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(
        long,
        global = true,
        env = "LIFTLOG_DIR",
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
    #[arg(long, global = true, help = "Print logs into the console")]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Log an exercise")]
    Add {
        name: String,
        #[arg(short, long)]
        sets: u32,
        #[arg(short, long)]
        reps: u32,
        #[arg(short, long, help = "Weight in kg")]
        weight: f64,
    },
    #[command(about = "List logged exercises, most recent first")]
    List {},
    #[command(about = "Change sets, reps or weight of a logged exercise")]
    Edit {
        id: i64,
        #[arg(short, long)]
        sets: Option<u32>,
        #[arg(short, long)]
        reps: Option<u32>,
        #[arg(short, long)]
        weight: Option<f64>,
    },
    #[command(about = "Delete a logged exercise")]
    Delete {
        id: i64,
        #[arg(short, long, help = "Don't ask for confirmation")]
        yes: bool,
    },
    #[command(about = "Show weekday checklist")]
    Days {},
    #[command(about = "Mark a weekday as done. 0 is Monday, 6 is Sunday")]
    Check { index: usize },
    #[command(about = "Unmark a weekday. 0 is Monday, 6 is Sunday")]
    Uncheck { index: usize },
    #[command(about = "Show the personal record for an exercise")]
    Record { name: String },
    #[command(about = "Show all personal records")]
    Records {},
    #[command(about = "Show how many days in a row ending today have logged exercises")]
    Streak {},
    #[command(about = "Show amount of exercises logged per day")]
    History {
        #[command(flatten)]
        command: HistoryCommand,
    },
    #[command(about = "Recount exercises per day from the logged exercises")]
    Recount {},
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = args
        .dir
        .map_or_else(create_application_default_path, create_application_path)?;

    enable_logging(&app_dir, args.log)?;
    debug!("Using application directory {app_dir:?}");

    let store = FileStore::new(store_path(&app_dir))?;
    let mut log = WorkoutLog::new(store, Box::new(DefaultClock));
    let mut out = io::stdout();

    match args.commands {
        Commands::Add {
            name,
            sets,
            reps,
            weight,
        } => handlers::add(&mut log, &mut out, &name, sets, reps, weight).await,
        Commands::List {} => handlers::list(&log, &mut out).await,
        Commands::Edit {
            id,
            sets,
            reps,
            weight,
        } => {
            let update = EntryUpdate { sets, reps, weight };
            handlers::edit(&mut log, &mut out, id, update).await
        }
        Commands::Delete { id, yes } => {
            handlers::delete(&mut log, &mut out, id, |entry| {
                if yes {
                    return Ok(true);
                }
                Ok(Confirm::new()
                    .with_prompt(format!("Delete {}?", format_entry(entry)))
                    .default(false)
                    .interact()?)
            })
            .await
        }
        Commands::Days {} => handlers::days(&log, &mut out).await,
        Commands::Check { index } => handlers::set_day(&mut log, &mut out, index, true).await,
        Commands::Uncheck { index } => handlers::set_day(&mut log, &mut out, index, false).await,
        Commands::Record { name } => handlers::record(&log, &mut out, &name).await,
        Commands::Records {} => handlers::records(&log, &mut out).await,
        Commands::Streak {} => handlers::streak(&log, &mut out).await,
        Commands::History { command } => process_history_command(&log, &mut out, command).await,
        Commands::Recount {} => handlers::recount(&mut log, &mut out).await,
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Args, Commands};

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let args = Args::parse_from(["liftlog", "add", "Squat", "-s", "4", "-r", "10", "-w", "82.5"]);
        match args.commands {
            Commands::Add {
                name,
                sets,
                reps,
                weight,
            } => {
                assert_eq!(name, "Squat");
                assert_eq!((sets, reps, weight), (4, 10, 82.5));
            }
            other => panic!("Unexpected command {other:?}"),
        }
    }
}
