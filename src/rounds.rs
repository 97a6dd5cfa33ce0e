use std::error::Error;
use std::fmt;
use std::fs;
use std::io;

use crate::scoring;

/// Number of slots in every recorded round, and the number of teams in the
/// standings. The whole tournament format is built around it.
pub const NUM_TEAMS: usize = 16;

/// One slot's outcome in a recorded round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotResult {
    pub placement: u8,
    pub kills: u32,
    pub points: i64,
}

/// One full recorded game: an outcome for each of the 16 slots.
///
/// Slot indices carry no team identity. Which current team receives which
/// slot is decided by a fresh random permutation every time the round is
/// sampled in a simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Round {
    pub slots: [SlotResult; NUM_TEAMS],
}

#[derive(Debug)]
pub struct PoolError {
    kind: PoolErrorKind,
    desc: String,
    source: Option<Box<dyn Error>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoolErrorKind {
    ReadError,
    ShapeError,
    ValueError,
}

impl PoolError {
    pub fn new_root(kind: PoolErrorKind, desc: String) -> PoolError {
        PoolError {
            kind,
            desc,
            source: None,
        }
    }

    pub fn new_caused_by(kind: PoolErrorKind, desc: String, source: Box<dyn Error>) -> PoolError {
        PoolError {
            kind,
            desc,
            source: Some(source),
        }
    }

    pub fn kind(&self) -> PoolErrorKind {
        self.kind
    }
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            PoolErrorKind::ReadError => write!(f, "Couldn't open games file. {}", self.desc)?,
            PoolErrorKind::ShapeError => write!(f, "Malformed games file. {}", self.desc)?,
            PoolErrorKind::ValueError => write!(f, "Invalid games file. {}", self.desc)?,
        }
        if let Some(ref source) = self.source {
            write!(f, ". Caused by: {}", source)?
        }
        Ok(())
    }
}

/// Reads every games file and concatenates their rounds, in file order, into
/// one pool.
pub fn pool_from_files(paths: &[String]) -> Result<Vec<Round>, PoolError> {
    let mut pool = vec![];
    for path in paths {
        let file = fs::File::open(path).map_err(|err| {
            PoolError::new_caused_by(PoolErrorKind::ReadError, format!("\"{}\"", path), Box::new(err))
        })?;
        pool.append(&mut rounds_from_reader(file, path)?);
    }
    Ok(pool)
}

/// Parses one games file: 16 rows, one per slot, where the columns alternate
/// placements and kill counts, one pair per recorded round. The row `2,8,4,9`
/// holds two rounds, (placement 2, 8 kills) followed by (placement 4, 9
/// kills).
///
/// The pairs are transposed into [`Round`]s with points precomputed, and
/// every data invariant the simulation relies on is checked here: 16 rows, a
/// uniform and even column count, placements within the 16-slot range, and
/// exactly one first place per round.
pub fn rounds_from_reader(input: impl io::Read, file_name: &str) -> Result<Vec<Round>, PoolError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(input);

    let mut rows: Vec<Vec<(u8, u32)>> = vec![];

    for (row_index, record) in reader.records().enumerate() {
        let record = record.map_err(|err| {
            PoolError::new_caused_by(
                PoolErrorKind::ShapeError,
                format!("Row {} of \"{}\" could not be read", row_index + 1, file_name),
                Box::new(err),
            )
        })?;

        if record.len() % 2 != 0 {
            return Err(PoolError::new_root(
                PoolErrorKind::ShapeError,
                format!(
                    "Row {} of \"{}\" has {} columns, expected placement,kills pairs",
                    row_index + 1,
                    file_name,
                    record.len()
                ),
            ));
        }

        let mut row = Vec::with_capacity(record.len() / 2);
        for pair_index in 0..record.len() / 2 {
            let placement_field = &record[2 * pair_index];
            let placement = placement_field.trim().parse::<u8>().map_err(|err| {
                PoolError::new_caused_by(
                    PoolErrorKind::ValueError,
                    format!(
                        "Bad placement \"{}\" in row {} of \"{}\"",
                        placement_field,
                        row_index + 1,
                        file_name
                    ),
                    Box::new(err),
                )
            })?;
            if !(1..=NUM_TEAMS as u8).contains(&placement) {
                return Err(PoolError::new_root(
                    PoolErrorKind::ValueError,
                    format!(
                        "Placement {} in row {} of \"{}\" should be between 1 and {}",
                        placement,
                        row_index + 1,
                        file_name,
                        NUM_TEAMS
                    ),
                ));
            }
            let kills_field = &record[2 * pair_index + 1];
            let kills = kills_field.trim().parse::<u32>().map_err(|err| {
                PoolError::new_caused_by(
                    PoolErrorKind::ValueError,
                    format!(
                        "Bad kill count \"{}\" in row {} of \"{}\"",
                        kills_field,
                        row_index + 1,
                        file_name
                    ),
                    Box::new(err),
                )
            })?;
            row.push((placement, kills));
        }
        rows.push(row);
    }

    if rows.len() != NUM_TEAMS {
        return Err(PoolError::new_root(
            PoolErrorKind::ShapeError,
            format!(
                "\"{}\" should have {} rows, one per slot, found {}",
                file_name,
                NUM_TEAMS,
                rows.len()
            ),
        ));
    }

    let num_rounds = rows[0].len();
    let mut rounds = Vec::with_capacity(num_rounds);
    for round_index in 0..num_rounds {
        let mut slots = [SlotResult {
            placement: 0,
            kills: 0,
            points: 0,
        }; NUM_TEAMS];
        for (slot, row) in rows.iter().enumerate() {
            let (placement, kills) = row[round_index];
            slots[slot] = SlotResult {
                placement,
                kills,
                points: scoring::round_points(placement, kills),
            };
        }

        let first_places = slots.iter().filter(|slot| slot.placement == 1).count();
        if first_places != 1 {
            return Err(PoolError::new_root(
                PoolErrorKind::ValueError,
                format!(
                    "Round {} of \"{}\" has {} first-place slots, expected exactly one",
                    round_index + 1,
                    file_name,
                    first_places
                ),
            ));
        }
        rounds.push(Round { slots });
    }
    Ok(rounds)
}
