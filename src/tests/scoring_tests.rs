use crate::scoring::{placement_points, round_points};

#[test]
fn placement_points_table() {
    let cases = [
        (1, 10),
        (2, 6),
        (3, 5),
        (4, 4),
        (5, 3),
        (6, 2),
        (7, 1),
        (8, 1),
        (9, 0),
        (12, 0),
        (16, 0),
    ];
    for (placement, expected) in cases {
        assert_eq!(placement_points(placement), expected);
    }
}

#[test]
fn kills_count_verbatim_test() {
    assert_eq!(round_points(1, 0), 10);
    assert_eq!(round_points(1, 7), 17);
    assert_eq!(round_points(8, 3), 4);
    assert_eq!(round_points(16, 5), 5);
}
