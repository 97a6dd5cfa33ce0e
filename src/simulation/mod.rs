use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{Builder, JoinHandle};

use log::warn;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::rounds::{Round, NUM_TEAMS};
use crate::standings::TeamStanding;

/// Standing value that marks a team as already ranked. Legitimate standings
/// never go below zero, so the sentinel always loses a maximum scan.
const RANKED_SENTINEL: i64 = -1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimulationSettings {
    pub threshold: i64,
    pub num_trials: u64,
    pub max_rounds: u64,
    pub seed: u64,
}

/// Count matrix of final placements: entry `(team, rank)` is the number of
/// completed trials that put `team` at `rank`, rank 0 being the champion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResultMatrix {
    counts: [[u64; NUM_TEAMS]; NUM_TEAMS],
}

impl ResultMatrix {
    pub fn new() -> ResultMatrix {
        ResultMatrix {
            counts: [[0; NUM_TEAMS]; NUM_TEAMS],
        }
    }

    fn record(&mut self, final_ranks: &[usize; NUM_TEAMS]) {
        for (team, &rank) in final_ranks.iter().enumerate() {
            self.counts[team][rank] += 1;
        }
    }

    fn merge(&mut self, other: &ResultMatrix) {
        for team in 0..NUM_TEAMS {
            for rank in 0..NUM_TEAMS {
                self.counts[team][rank] += other.counts[team][rank];
            }
        }
    }

    pub fn count(&self, team: usize, rank: usize) -> u64 {
        self.counts[team][rank]
    }

    /// One team's row: how many trials ended at each final rank.
    pub fn rank_counts(&self, team: usize) -> &[u64; NUM_TEAMS] {
        &self.counts[team]
    }

    /// Fraction of completed trials that put `team` at `rank`. Every row
    /// sums to the completed trial count, which is the denominator used.
    pub fn probability(&self, team: usize, rank: usize) -> f64 {
        let trials: u64 = self.counts[team].iter().sum();
        if trials == 0 {
            0.0
        } else {
            self.counts[team][rank] as f64 / trials as f64
        }
    }
}

/// Outcome of one simulated tournament. `final_ranks[team]` is the rank the
/// trial assigned to `team`, 0 (champion) through 15.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrialOutcome {
    pub final_ranks: [usize; NUM_TEAMS],
    pub rounds_played: u64,
}

/// Simulates one tournament to completion.
///
/// Every iteration samples a recorded round uniformly with replacement,
/// deals its slots to the teams through a fresh random permutation, adds the
/// slot points to each team's standing, and checks whether the team dealt
/// the first-place slot already stood at or above `threshold` before the
/// points were added. If it did, that team is champion and the trial ends.
/// Otherwise the updated standings carry into the next iteration.
///
/// The pool must be non-empty. Returns `None` when no champion was crowned
/// within `max_rounds` iterations, which callers must treat as an
/// unreachable threshold.
pub fn run_trial(
    pool: &[Round],
    initial_standings: &[i64; NUM_TEAMS],
    threshold: i64,
    max_rounds: u64,
    rng: &mut SmallRng,
) -> Option<TrialOutcome> {
    let mut standings = *initial_standings;
    let mut slot_of_team = [0; NUM_TEAMS];
    for (team, slot) in slot_of_team.iter_mut().enumerate() {
        *slot = team;
    }

    for rounds_played in 1..=max_rounds {
        let round = &pool[rng.gen_range(0..pool.len())];
        slot_of_team.shuffle(rng);

        // Champion eligibility is decided on the standings as they were
        // before this round's points.
        let mut eligible = [false; NUM_TEAMS];
        for (team, &standing) in standings.iter().enumerate() {
            eligible[team] = standing >= threshold;
        }

        for (team, &slot) in slot_of_team.iter().enumerate() {
            standings[team] += round.slots[slot].points;
        }

        if let Some(round_winner) = first_place_team(round, &slot_of_team) {
            if eligible[round_winner] {
                return Some(TrialOutcome {
                    final_ranks: rank_teams(standings, round_winner),
                    rounds_played,
                });
            }
        }
    }

    None
}

/// First team, in team index order, whose dealt slot holds this round's
/// first place. The games loader guarantees exactly one such slot, but the
/// index-order scan keeps the pick deterministic even on malformed rounds.
pub(crate) fn first_place_team(round: &Round, slot_of_team: &[usize; NUM_TEAMS]) -> Option<usize> {
    for (team, &slot) in slot_of_team.iter().enumerate() {
        if round.slots[slot].placement == 1 {
            return Some(team);
        }
    }
    None
}

/// Assigns final ranks from the end-of-trial standings.
///
/// The crowned champion takes rank 0 regardless of its standing. The
/// remaining ranks go to the highest standing left, scanning teams in index
/// order with a strict comparison, so equal standings always resolve to the
/// lower team index.
pub fn rank_teams(mut standings: [i64; NUM_TEAMS], champion: usize) -> [usize; NUM_TEAMS] {
    let mut final_ranks = [0; NUM_TEAMS];
    final_ranks[champion] = 0;
    standings[champion] = RANKED_SENTINEL;

    for rank in 1..NUM_TEAMS {
        let mut best = 0;
        for team in 1..NUM_TEAMS {
            if standings[team] > standings[best] {
                best = team;
            }
        }
        final_ranks[best] = rank;
        standings[best] = RANKED_SENTINEL;
    }
    final_ranks
}

#[derive(Debug)]
pub struct SimulationError {
    kind: SimulationErrorKind,
    desc: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimulationErrorKind {
    EmptyPool,
    WrongTeamCount,
    ThresholdUnreachable,
}

impl SimulationError {
    fn new(kind: SimulationErrorKind, desc: String) -> SimulationError {
        SimulationError { kind, desc }
    }

    pub fn kind(&self) -> SimulationErrorKind {
        self.kind
    }
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            SimulationErrorKind::EmptyPool => write!(f, "Invalid game pool. {}", self.desc),
            SimulationErrorKind::WrongTeamCount => write!(f, "Invalid roster. {}", self.desc),
            SimulationErrorKind::ThresholdUnreachable => {
                write!(f, "Unreachable threshold. {}", self.desc)
            }
        }
    }
}

#[derive(Debug)]
pub struct SimulationResult {
    pub matrix: ResultMatrix,
    pub trials_completed: u64,
    pub total_rounds: u64,
}

#[derive(Debug)]
pub struct Simulation {
    pool: Vec<Round>,
    initial_standings: [i64; NUM_TEAMS],
    settings: SimulationSettings,
    trial_seeds: Vec<u64>,
    next_trial: AtomicU64,
    threshold_missed: AtomicBool,
}

impl Simulation {
    /// Validates the inputs and fixes the seed for every trial up front.
    ///
    /// Fails when the pool is empty, when the roster doesn't hold exactly 16
    /// teams, or when the threshold exceeds what the best-placed team could
    /// reach even by taking the pool's best slot every round until the round
    /// ceiling.
    pub fn new(
        pool: Vec<Round>,
        teams: &[TeamStanding],
        settings: SimulationSettings,
    ) -> Result<Simulation, SimulationError> {
        if pool.is_empty() {
            return Err(SimulationError::new(
                SimulationErrorKind::EmptyPool,
                "No recorded rounds to sample from".to_string(),
            ));
        }
        if teams.len() != NUM_TEAMS {
            return Err(SimulationError::new(
                SimulationErrorKind::WrongTeamCount,
                format!(
                    "Got {} teams, the format needs exactly {}",
                    teams.len(),
                    NUM_TEAMS
                ),
            ));
        }

        let mut initial_standings = [0; NUM_TEAMS];
        for (standing, team) in initial_standings.iter_mut().zip(teams.iter()) {
            *standing = team.points;
        }

        let best_initial = initial_standings.iter().copied().max().unwrap_or(0);
        let best_round_points = pool
            .iter()
            .flat_map(|round| round.slots.iter())
            .map(|slot| slot.points)
            .max()
            .unwrap_or(0);
        let best_reachable =
            best_initial as i128 + best_round_points as i128 * settings.max_rounds as i128;
        if best_reachable < settings.threshold as i128 {
            return Err(SimulationError::new(
                SimulationErrorKind::ThresholdUnreachable,
                format!(
                    "No team can reach {} points within {} rounds, the best possible is {}",
                    settings.threshold, settings.max_rounds, best_reachable
                ),
            ));
        }

        let mut master_rng = ChaCha8Rng::seed_from_u64(settings.seed);
        let trial_seeds = (0..settings.num_trials).map(|_| master_rng.gen()).collect();

        Ok(Simulation {
            pool,
            initial_standings,
            settings,
            trial_seeds,
            next_trial: AtomicU64::new(0),
            threshold_missed: AtomicBool::new(false),
        })
    }

    /// Runs the configured number of trials across `concurrency` worker
    /// threads and reduces their per-worker matrices into one result.
    ///
    /// Every trial seed was drawn from the master rng before the workers
    /// start, and each trial runs on its own rng seeded from its slot in
    /// that list, so a given master seed produces the same matrix at any
    /// concurrency.
    ///
    /// When `is_shutting_down` gets set the workers stop picking up new
    /// trials. Trials already underway still finish and are counted.
    pub fn run(
        self,
        concurrency: usize,
        is_shutting_down: &'static AtomicBool,
    ) -> Result<SimulationResult, SimulationError> {
        let simulation = Arc::new(self);

        let workers: Vec<JoinHandle<(ResultMatrix, u64, u64)>> = (0..concurrency)
            .map(|id| {
                let worker_simulation = simulation.clone();
                Builder::new()
                    .name(format!("Trial worker #{}", id))
                    .spawn(move || worker_simulation.run_worker(is_shutting_down))
                    .unwrap()
            })
            .collect();

        let mut matrix = ResultMatrix::new();
        let mut trials_completed = 0;
        let mut total_rounds = 0;
        for worker in workers {
            let (worker_matrix, worker_trials, worker_rounds) = worker.join().unwrap();
            matrix.merge(&worker_matrix);
            trials_completed += worker_trials;
            total_rounds += worker_rounds;
        }

        if simulation.threshold_missed.load(Ordering::SeqCst) {
            return Err(SimulationError::new(
                SimulationErrorKind::ThresholdUnreachable,
                format!(
                    "A trial played {} rounds without crowning a champion at {} points",
                    simulation.settings.max_rounds, simulation.settings.threshold
                ),
            ));
        }

        Ok(SimulationResult {
            matrix,
            trials_completed,
            total_rounds,
        })
    }

    fn run_worker(&self, is_shutting_down: &AtomicBool) -> (ResultMatrix, u64, u64) {
        let mut matrix = ResultMatrix::new();
        let mut trials_completed = 0;
        let mut total_rounds = 0;

        while !is_shutting_down.load(Ordering::SeqCst)
            && !self.threshold_missed.load(Ordering::SeqCst)
        {
            let seed = match self.next_trial_seed() {
                Some(seed) => seed,
                None => break,
            };
            let mut rng = SmallRng::seed_from_u64(seed);
            match run_trial(
                &self.pool,
                &self.initial_standings,
                self.settings.threshold,
                self.settings.max_rounds,
                &mut rng,
            ) {
                Some(outcome) => {
                    matrix.record(&outcome.final_ranks);
                    trials_completed += 1;
                    total_rounds += outcome.rounds_played;
                }
                None => {
                    warn!(
                        "Trial with seed {} played {} rounds without crowning a champion, stopping the simulation",
                        seed, self.settings.max_rounds
                    );
                    self.threshold_missed.store(true, Ordering::SeqCst);
                    break;
                }
            }
        }

        (matrix, trials_completed, total_rounds)
    }

    /// Seed for the next trial no worker has claimed yet.
    fn next_trial_seed(&self) -> Option<u64> {
        let trial = self.next_trial.fetch_add(1, Ordering::SeqCst);
        self.trial_seeds.get(trial as usize).copied()
    }
}
