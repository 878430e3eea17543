//! Badminton scoring constants.

/// Points needed to win a set, given a two point lead.
pub const SET_POINTS: u32 = 21;
/// Lead required once a set reaches [`SET_POINTS`].
pub const WINNING_MARGIN: u32 = 2;
/// A set ends at this score no matter the margin.
pub const POINT_CAP: u32 = 30;
pub const SETS_TO_WIN: usize = 2;
pub const MAX_SETS: usize = 3;
/// Leading score at which a rest interval is recommended.
pub const BREAK_POINTS: u32 = 11;

pub fn is_set_finished(points_a: u32, points_b: u32) -> bool {
    let max = points_a.max(points_b);
    (max >= SET_POINTS && points_a.abs_diff(points_b) >= WINNING_MARGIN) || max >= POINT_CAP
}
