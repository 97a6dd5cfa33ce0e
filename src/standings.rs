use std::error::Error;
use std::fmt;
use std::fs;
use std::io;

use crate::rounds::NUM_TEAMS;

/// One roster entry: a team and its cumulative points going into the
/// simulated remainder of the tournament.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TeamStanding {
    pub name: String,
    pub points: i64,
}

#[derive(Debug)]
pub struct StandingsError {
    kind: StandingsErrorKind,
    desc: String,
    source: Option<Box<dyn Error>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StandingsErrorKind {
    ReadError,
    ShapeError,
    ValueError,
}

impl StandingsError {
    pub fn new_root(kind: StandingsErrorKind, desc: String) -> StandingsError {
        StandingsError {
            kind,
            desc,
            source: None,
        }
    }

    pub fn new_caused_by(
        kind: StandingsErrorKind,
        desc: String,
        source: Box<dyn Error>,
    ) -> StandingsError {
        StandingsError {
            kind,
            desc,
            source: Some(source),
        }
    }

    pub fn kind(&self) -> StandingsErrorKind {
        self.kind
    }
}

impl fmt::Display for StandingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            StandingsErrorKind::ReadError => {
                write!(f, "Couldn't open standings file. {}", self.desc)?
            }
            StandingsErrorKind::ShapeError => {
                write!(f, "Malformed standings file. {}", self.desc)?
            }
            StandingsErrorKind::ValueError => write!(f, "Invalid standings file. {}", self.desc)?,
        }
        if let Some(ref source) = self.source {
            write!(f, ". Caused by: {}", source)?
        }
        Ok(())
    }
}

pub fn standings_from_file(path: &str) -> Result<Vec<TeamStanding>, StandingsError> {
    let file = fs::File::open(path).map_err(|err| {
        StandingsError::new_caused_by(
            StandingsErrorKind::ReadError,
            format!("\"{}\"", path),
            Box::new(err),
        )
    })?;
    standings_from_reader(file, path)
}

/// Parses the current table, 16 rows of `team,points`, and returns it sorted
/// by points, highest first.
///
/// The sort is stable, so teams on equal points keep their file order. Index
/// 0 is the current leader, which also makes it the team favoured by the
/// lowest-index tie-break when final ranks are assigned.
pub fn standings_from_reader(
    input: impl io::Read,
    file_name: &str,
) -> Result<Vec<TeamStanding>, StandingsError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(input);

    let mut teams: Vec<TeamStanding> = vec![];
    for (row_index, record) in reader.records().enumerate() {
        let record = record.map_err(|err| {
            StandingsError::new_caused_by(
                StandingsErrorKind::ShapeError,
                format!("Row {} of \"{}\" could not be read", row_index + 1, file_name),
                Box::new(err),
            )
        })?;

        if record.len() != 2 {
            return Err(StandingsError::new_root(
                StandingsErrorKind::ShapeError,
                format!(
                    "Row {} of \"{}\" has {} columns, expected team,points",
                    row_index + 1,
                    file_name,
                    record.len()
                ),
            ));
        }

        let name = record[0].trim().to_string();
        let points_field = &record[1];
        let points = points_field.trim().parse::<i64>().map_err(|err| {
            StandingsError::new_caused_by(
                StandingsErrorKind::ValueError,
                format!(
                    "Bad points value \"{}\" for team \"{}\" in \"{}\"",
                    points_field, name, file_name
                ),
                Box::new(err),
            )
        })?;
        if points < 0 {
            return Err(StandingsError::new_root(
                StandingsErrorKind::ValueError,
                format!(
                    "Team \"{}\" in \"{}\" has negative points {}",
                    name, file_name, points
                ),
            ));
        }
        teams.push(TeamStanding { name, points });
    }

    if teams.len() != NUM_TEAMS {
        return Err(StandingsError::new_root(
            StandingsErrorKind::ShapeError,
            format!(
                "\"{}\" should have {} rows, one per team, found {}",
                file_name,
                NUM_TEAMS,
                teams.len()
            ),
        ));
    }

    for (index, team) in teams.iter().enumerate() {
        if teams[..index].iter().any(|other| other.name == team.name) {
            return Err(StandingsError::new_root(
                StandingsErrorKind::ValueError,
                format!(
                    "Team \"{}\" appears more than once in \"{}\"",
                    team.name, file_name
                ),
            ));
        }
    }

    teams.sort_by(|a, b| b.points.cmp(&a.points));
    Ok(teams)
}
