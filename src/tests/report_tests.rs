use crate::report::{champion_interval, expected_placement};
use crate::rounds::NUM_TEAMS;

#[test]
fn champion_interval_brackets_the_sample_rate_test() {
    let (lower, upper) = champion_interval(50, 100);
    assert!(
        lower > 0.35 && lower < 0.5,
        "Lower bound was {:.1}% after 50 titles in 100 trials",
        100.0 * lower
    );
    assert!(
        upper > 0.5 && upper < 0.65,
        "Upper bound was {:.1}% after 50 titles in 100 trials",
        100.0 * upper
    );
}

#[test]
fn champion_interval_with_no_titles_test() {
    let (lower, upper) = champion_interval(0, 200);
    assert!(lower >= 0.0 && lower < 0.01);
    assert!(
        upper > 0.0 && upper < 0.05,
        "Upper bound was {:.1}% after 0 titles in 200 trials",
        100.0 * upper
    );
}

#[test]
fn expected_placement_of_concentrated_rows_test() {
    let mut row = [0u64; NUM_TEAMS];
    row[0] = 10;
    assert_eq!(expected_placement(&row), 1.0);

    let mut split = [0u64; NUM_TEAMS];
    split[0] = 5;
    split[15] = 5;
    assert_eq!(expected_placement(&split), 8.5);
}
