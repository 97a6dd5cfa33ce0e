/// Points awarded for a placement in a single round, before kills are added.
///
/// Only the top eight placements score, from 10 points for winning down to a
/// single point for 7th and 8th.
pub fn placement_points(placement: u8) -> i64 {
    match placement {
        1 => 10,
        2 => 6,
        3 => 5,
        4 => 4,
        5 => 3,
        6 => 2,
        7 | 8 => 1,
        _ => 0,
    }
}

/// Total points one team earns from one round: placement points plus one
/// point per kill.
pub fn round_points(placement: u8, kills: u32) -> i64 {
    placement_points(placement) + kills as i64
}
