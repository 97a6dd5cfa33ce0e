use std::sync::atomic::{self, AtomicBool};
use std::{process, result};

use crate::simulation::{Simulation, SimulationSettings};
use fern::InitError;
use log::error;
use rand::Rng;

mod cli;
mod report;
mod rounds;
mod scoring;
mod simulation;
mod standings;
#[cfg(test)]
mod tests;

fn main() {
    let cli_args = cli::parse_cli_arguments();

    if let Some(log_file_name) = cli_args.log_file_name.as_ref() {
        setup_logger(log_file_name).unwrap_or_else(|err| match err {
            InitError::Io(io_err) => exit_with_error(&format!(
                "Couldn't open log file \"{}\": {}",
                log_file_name, io_err
            )),
            InitError::SetLoggerError(_) => panic!("Logger already initialized"),
        });
    }

    let pool = rounds::pool_from_files(&cli_args.game_files)
        .unwrap_or_else(|err| exit_with_error(&err.to_string()));
    let teams = standings::standings_from_file(&cli_args.standings_file)
        .unwrap_or_else(|err| exit_with_error(&err.to_string()));

    let seed = cli_args.seed.unwrap_or_else(|| rand::thread_rng().gen());
    println!(
        "Simulating {} tournaments over a pool of {} recorded rounds, threshold {} points, seed {}",
        cli_args.trials,
        pool.len(),
        cli_args.threshold,
        seed
    );

    let settings = SimulationSettings {
        threshold: cli_args.threshold,
        num_trials: cli_args.trials,
        max_rounds: cli_args.max_rounds,
        seed,
    };
    let simulation = Simulation::new(pool, &teams, settings)
        .unwrap_or_else(|err| exit_with_error(&err.to_string()));

    // If user presses ctrl-c, try to finish the trials that are already running
    let is_shutting_down: &'static AtomicBool = Box::leak(Box::new(AtomicBool::new(false)));

    ctrlc::set_handler(move || {
        // If is_shutting_down was already set, exit immediately
        if is_shutting_down.swap(true, atomic::Ordering::SeqCst) {
            process::exit(0)
        } else {
            println!("\nGot Ctrl-C, waiting for running trials to finish...");
            println!("Press Ctrl-C again to exit immediately");
        }
    })
    .expect("Error setting Ctrl-C handler");

    let result = simulation
        .run(cli_args.concurrency, is_shutting_down)
        .unwrap_or_else(|err| exit_with_error(&err.to_string()));

    if result.trials_completed < cli_args.trials {
        println!(
            "Interrupted after {} of {} trials.",
            result.trials_completed, cli_args.trials
        );
    }
    report::print_report(&result, &teams, cli_args.full_matrix);
}

fn setup_logger(file_name: &str) -> result::Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(log::LevelFilter::Debug)
        .chain(fern::log_file(file_name)?)
        .apply()?;
    Ok(())
}

/// Utility for quickly exiting during initialization, generally due to a user error
fn exit_with_error(error_message: &str) -> ! {
    eprintln!("{}", error_message);
    error!("{}", error_message);
    process::exit(1)
}
