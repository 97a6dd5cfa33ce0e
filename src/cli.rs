use clap::{self, Arg, ArgAction, Command};
use std::{env, ffi::OsString};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CliOptions {
    pub game_files: Vec<String>,
    pub standings_file: String,
    pub threshold: i64,
    pub trials: u64,
    pub concurrency: usize,
    pub max_rounds: u64,
    pub seed: Option<u64>,
    pub full_matrix: bool,
    pub log_file_name: Option<String>,
}

pub fn parse_cli_arguments() -> CliOptions {
    parse_cli_arguments_from(&mut env::args_os()).unwrap_or_else(|err| err.exit())
}

pub fn parse_cli_arguments_from(
    itr: impl Iterator<Item = OsString>,
) -> Result<CliOptions, clap::Error> {
    let matches = Command::new("Zonecast")
        .version("0.1.0")
        .about("Forecast the final standings of a 16-team tournament by resampling recorded rounds")
        .arg(Arg::new("games")
            .help("CSV file of recorded rounds: 16 rows, one per slot, with one placement,kills column pair per round. May be given several files, whose rounds are pooled in order.")
            .short('g')
            .long("games")
            .required(true)
            .num_args(1..)
            .action(ArgAction::Append)
            .value_name("file.csv"))
        .arg(Arg::new("standings")
            .help("CSV file with the current table: 16 rows of team,points.")
            .short('s')
            .long("standings")
            .required(true)
            .num_args(1)
            .value_name("file.csv"))
        .arg(Arg::new("threshold")
            .help("Points a team must already have to be crowned champion by winning a round.")
            .short('t')
            .long("threshold")
            .required(true)
            .num_args(1)
            .value_parser(clap::value_parser!(i64).range(0..)))
        .arg(Arg::new("trials")
            .help("Number of tournaments to simulate.")
            .short('n')
            .long("trials")
            .num_args(1)
            .default_value("100000")
            .value_parser(clap::value_parser!(u64).range(1..=u32::MAX as u64)))
        .arg(Arg::new("concurrency")
            .help("Number of trials to run in parallel.")
            .default_value("1")
            .short('c')
            .long("concurrency")
            .value_name("n")
            .value_parser(clap::value_parser!(u64).range(1..=1024)))
        .arg(Arg::new("max-rounds")
            .help("Abort if a single trial plays this many rounds without crowning a champion.")
            .long("max-rounds")
            .num_args(1)
            .default_value("10000")
            .value_parser(clap::value_parser!(u64).range(1..)))
        .arg(Arg::new("seed")
            .help("Master random seed. Runs with the same seed and inputs give identical results. Drawn randomly if not set.")
            .long("seed")
            .num_args(1)
            .value_parser(clap::value_parser!(u64)))
        .arg(Arg::new("full-matrix")
            .help("Also print the full 16x16 placement probability table.")
            .long("full-matrix")
            .num_args(0))
        .arg(Arg::new("log")
            .short('l')
            .long("log")
            .value_name("zonecast.log")
            .help("Name of debug logfile. If not set, no debug log will be written.")
            .num_args(1),
        )
        .try_get_matches_from(itr)?;

    Ok(CliOptions {
        game_files: matches
            .get_many::<String>("games")
            .unwrap()
            .cloned()
            .collect(),
        standings_file: matches.get_one::<String>("standings").unwrap().clone(),
        threshold: *matches.get_one::<i64>("threshold").unwrap(),
        trials: *matches.get_one::<u64>("trials").unwrap(),
        concurrency: *matches.get_one::<u64>("concurrency").unwrap() as usize,
        max_rounds: *matches.get_one::<u64>("max-rounds").unwrap(),
        seed: matches.get_one::<u64>("seed").copied(),
        full_matrix: *matches.get_one::<bool>("full-matrix").unwrap(),
        log_file_name: matches.get_one::<String>("log").cloned(),
    })
}
