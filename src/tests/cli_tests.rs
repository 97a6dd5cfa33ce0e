use crate::cli;

#[test]
fn cli_test() {
    let input: &str = "./zonecast --games week1.csv week2.csv --standings table.csv --threshold 50 --trials 2000 --concurrency 10 --max-rounds 500 --seed 42 --full-matrix -l zonecast.log";

    let cli_options =
        cli::parse_cli_arguments_from(input.split_whitespace().map(|word| word.into()));

    let expected = cli::CliOptions {
        game_files: vec!["week1.csv".to_string(), "week2.csv".to_string()],
        standings_file: "table.csv".to_string(),
        threshold: 50,
        trials: 2000,
        concurrency: 10,
        max_rounds: 500,
        seed: Some(42),
        full_matrix: true,
        log_file_name: Some("zonecast.log".to_string()),
    };

    if let Err(err) = &cli_options {
        eprintln!("{err}")
    }

    assert_eq!(cli_options.unwrap(), expected)
}

#[test]
fn default_options_test() {
    let input: &str = "./zonecast --games rounds.csv --standings table.csv --threshold 0";

    let cli_options =
        cli::parse_cli_arguments_from(input.split_whitespace().map(|word| word.into()));

    let expected = cli::CliOptions {
        game_files: vec!["rounds.csv".to_string()],
        standings_file: "table.csv".to_string(),
        threshold: 0,
        trials: 100000,
        concurrency: 1,
        max_rounds: 10000,
        seed: None,
        full_matrix: false,
        log_file_name: None,
    };

    if let Err(err) = &cli_options {
        eprintln!("{err}")
    }

    assert_eq!(cli_options.unwrap(), expected)
}

#[test]
fn repeated_games_flag_test() {
    let input: &str = "./zonecast -g week1.csv -g week2.csv -g week3.csv -s table.csv -t 25";

    let cli_options =
        cli::parse_cli_arguments_from(input.split_whitespace().map(|word| word.into()));

    if let Err(err) = &cli_options {
        eprintln!("{err}")
    }

    assert_eq!(
        cli_options.unwrap().game_files,
        vec![
            "week1.csv".to_string(),
            "week2.csv".to_string(),
            "week3.csv".to_string()
        ]
    )
}

#[test]
fn missing_threshold_test() {
    let input: &str = "./zonecast --games rounds.csv --standings table.csv";

    assert!(
        cli::parse_cli_arguments_from(input.split_whitespace().map(|word| word.into())).is_err()
    )
}

#[test]
fn negative_threshold_test() {
    let input: &str = "./zonecast --games rounds.csv --standings table.csv --threshold -5";

    assert!(
        cli::parse_cli_arguments_from(input.split_whitespace().map(|word| word.into())).is_err()
    )
}

#[test]
fn zero_trials_test() {
    let input: &str = "./zonecast --games rounds.csv --standings table.csv --threshold 0 --trials 0";

    assert!(
        cli::parse_cli_arguments_from(input.split_whitespace().map(|word| word.into())).is_err()
    )
}

// The interval math hands trial counts to bpci as u32, so the flag stops
// at u32::MAX.
#[test]
fn too_many_trials_test() {
    let input: &str =
        "./zonecast --games rounds.csv --standings table.csv --threshold 0 --trials 4294967295";

    let cli_options =
        cli::parse_cli_arguments_from(input.split_whitespace().map(|word| word.into()));

    if let Err(err) = &cli_options {
        eprintln!("{err}")
    }

    assert_eq!(cli_options.unwrap().trials, u32::MAX as u64);

    let input: &str =
        "./zonecast --games rounds.csv --standings table.csv --threshold 0 --trials 4294967296";

    assert!(
        cli::parse_cli_arguments_from(input.split_whitespace().map(|word| word.into())).is_err()
    )
}
