use bpci::{Interval, NSuccessesSample, WilsonScore};
use color_print::{cprint, cprintln};

use crate::rounds::NUM_TEAMS;
use crate::simulation::SimulationResult;
use crate::standings::TeamStanding;

// 97.5th percentile point of the normal distribution.
// This is used in computing 95% confidence intervals.
const NORM_PPF_0_975: f64 = 1.959963984540054;

/// 95% Wilson score interval, with continuity correction, for a team's
/// championship probability after winning `titles` of `trials` trials.
/// `trials` must be non-zero and fit in a `u32`, which the trials flag's
/// cap guarantees.
pub fn champion_interval(titles: u64, trials: u64) -> (f64, f64) {
    let sample = NSuccessesSample::new(trials as u32, titles as u32).unwrap();
    let interval = sample.wilson_score_with_cc(NORM_PPF_0_975);
    (interval.lower(), interval.upper())
}

/// Mean final placement implied by one team's row of the result matrix,
/// expressed 1-based, so 1.0 means champion in every trial.
pub fn expected_placement(rank_counts: &[u64; NUM_TEAMS]) -> f64 {
    let trials: u64 = rank_counts.iter().sum();
    let weighted: u64 = rank_counts
        .iter()
        .enumerate()
        .map(|(rank, &count)| (rank as u64 + 1) * count)
        .sum();
    weighted as f64 / trials as f64
}

/// Prints the run summary and the per-team forecast table, best championship
/// odds first.
pub fn print_report(result: &SimulationResult, teams: &[TeamStanding], full_matrix: bool) {
    if result.trials_completed == 0 {
        println!("No trials completed, nothing to report.");
        return;
    }

    let trials = result.trials_completed;
    println!(
        "Completed {} trials, {:.1} rounds played per trial on average.",
        trials,
        result.total_rounds as f64 / trials as f64
    );
    println!();

    // Stable sort, so teams on equal title counts stay in standings order.
    let mut order: Vec<usize> = (0..NUM_TEAMS).collect();
    order.sort_by(|&a, &b| result.matrix.count(b, 0).cmp(&result.matrix.count(a, 0)));

    cprintln!(
        "<bold>{:<20} {:>8} {:>10} {:>17} {:>10}</bold>",
        "Team",
        "Points",
        "Champion",
        "95% interval",
        "Expected"
    );
    for &team in &order {
        let titles = result.matrix.count(team, 0);
        let (lower, upper) = champion_interval(titles, trials);
        println!(
            "{:<20} {:>8} {:>9.1}% {:>7.1}% -{:>6.1}% {:>10.2}",
            teams[team].name,
            teams[team].points,
            100.0 * titles as f64 / trials as f64,
            100.0 * lower,
            100.0 * upper,
            expected_placement(result.matrix.rank_counts(team))
        );
    }

    if full_matrix {
        println!();
        print_full_matrix(result, teams, &order);
    }
}

/// The complete placement distribution, one row per team and one column per
/// final rank, as percentages of completed trials.
fn print_full_matrix(result: &SimulationResult, teams: &[TeamStanding], order: &[usize]) {
    cprint!("<bold>{:<20}</bold>", "Team");
    for rank in 1..=NUM_TEAMS {
        cprint!("<bold>{:>6}</bold>", format!("#{}", rank));
    }
    println!();
    for &team in order {
        print!("{:<20}", teams[team].name);
        for rank in 0..NUM_TEAMS {
            print!("{:>5.1}%", 100.0 * result.matrix.probability(team, rank));
        }
        println!();
    }
}
