//! Time management: turn clock parameters into a search [`Limit`].

use std::time::Duration;

use sable_core::Color;

use crate::search::Limit;

/// Time kept back for move transmission and thread start-up.
const MOVE_OVERHEAD: Duration = Duration::from_millis(15);
/// Share of the hard budget after which no new iteration starts, in percent.
const SOFT_PERCENT: u32 = 63;

/// Budget parameters of a `go` command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeControl {
    pub wtime: Option<Duration>,
    pub btime: Option<Duration>,
    pub winc: Option<Duration>,
    pub binc: Option<Duration>,
    pub movestogo: Option<u32>,
    pub movetime: Option<Duration>,
    pub nodes: Option<u64>,
    pub depth: Option<usize>,
    pub infinite: bool,
}

/// Soft and hard time for one move from the remaining clock.
///
/// Without `moves_to_go` the engine assumes 30 more moves in sudden death
/// and 20 when an increment is given, and adds half the increment. The soft
/// limit is 63% of that; the hard limit keeps [`MOVE_OVERHEAD`] in reserve.
/// Neither is ever below one millisecond.
pub fn compute_limits(remaining: Duration, increment: Duration, moves_to_go: Option<u32>) -> (Duration, Duration) {
    let share = match moves_to_go {
        Some(moves) => remaining / moves.max(1),
        None if increment.is_zero() => remaining / 30,
        None => remaining / 20,
    };
    let budget = (share + increment / 2).min(remaining);

    let floor = Duration::from_millis(1);
    let soft = (budget * SOFT_PERCENT / 100).max(floor);
    let hard = budget
        .min(remaining.saturating_sub(MOVE_OVERHEAD))
        .saturating_sub(MOVE_OVERHEAD)
        .max(floor);
    (soft.min(hard), hard)
}

/// Build the search limit for `side` from a `go` command.
///
/// `infinite` ignores every clock. `movetime` is a fixed hard limit; a
/// running clock yields soft and hard limits from [`compute_limits`].
/// Depth and node ceilings apply in every case.
pub fn limit_from_go(tc: &TimeControl, side: Color) -> Limit {
    let mut limit = match tc.depth {
        Some(depth) => Limit::depth(depth),
        None => Limit::infinite(),
    };
    if let Some(nodes) = tc.nodes {
        limit.hard_nodes = Some(nodes);
    }
    if tc.infinite {
        return limit;
    }

    let (remaining, increment) = match side {
        Color::White => (tc.wtime, tc.winc),
        Color::Black => (tc.btime, tc.binc),
    };

    if let Some(movetime) = tc.movetime {
        limit.hard_time = Some(movetime.max(Duration::from_millis(1)));
    } else if let Some(remaining) = remaining {
        let (soft, hard) = compute_limits(remaining, increment.unwrap_or_default(), tc.movestogo);
        limit.soft_time = Some(soft);
        limit.hard_time = Some(hard);
    }
    limit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::params::DEFAULT_DEPTH;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn sudden_death_uses_a_thirtieth() {
        let (soft, hard) = compute_limits(ms(300_000), Duration::ZERO, None);
        assert_eq!(hard, ms(10_000 - 15));
        assert_eq!(soft, ms(6_300));
    }

    #[test]
    fn increment_uses_a_twentieth_plus_half_the_increment() {
        let (soft, hard) = compute_limits(ms(60_000), ms(2_000), None);
        assert_eq!(hard, ms(4_000 - 15));
        assert_eq!(soft, ms(2_520));
    }

    #[test]
    fn moves_to_go_divides_the_clock() {
        let (_, hard) = compute_limits(ms(60_000), Duration::ZERO, Some(10));
        assert_eq!(hard, ms(6_000 - 15));
        let (_, hard) = compute_limits(ms(60_000), Duration::ZERO, Some(0));
        assert!(hard < ms(60_000));
    }

    #[test]
    fn nearly_flagged_still_gets_a_millisecond() {
        let (soft, hard) = compute_limits(ms(5), Duration::ZERO, None);
        assert_eq!(soft, ms(1));
        assert_eq!(hard, ms(1));
        let (soft, hard) = compute_limits(Duration::ZERO, ms(1_000), None);
        assert_eq!((soft, hard), (ms(1), ms(1)));
    }

    #[test]
    fn hard_never_exceeds_the_clock() {
        let (soft, hard) = compute_limits(ms(1_000), ms(10_000), None);
        assert!(hard < ms(1_000));
        assert!(soft <= hard);
    }

    #[test]
    fn go_picks_the_movers_clock() {
        let tc = TimeControl {
            wtime: Some(ms(300_000)),
            btime: Some(ms(30_000)),
            ..TimeControl::default()
        };
        let white = limit_from_go(&tc, Color::White);
        let black = limit_from_go(&tc, Color::Black);
        assert!(white.hard_time > black.hard_time);
        assert!(white.soft_time.is_some());
    }

    #[test]
    fn go_infinite_ignores_clocks() {
        let tc = TimeControl {
            wtime: Some(ms(1_000)),
            movetime: Some(ms(10)),
            infinite: true,
            ..TimeControl::default()
        };
        let limit = limit_from_go(&tc, Color::White);
        assert!(!limit.is_timed());
        assert_eq!(limit.depth, DEFAULT_DEPTH);
    }

    #[test]
    fn go_movetime_is_hard_only() {
        let tc = TimeControl { movetime: Some(ms(1_000)), ..TimeControl::default() };
        let limit = limit_from_go(&tc, Color::Black);
        assert_eq!(limit.hard_time, Some(ms(1_000)));
        assert_eq!(limit.soft_time, None);
    }

    #[test]
    fn go_depth_and_nodes() {
        let tc = TimeControl { depth: Some(7), nodes: Some(20_000), ..TimeControl::default() };
        let limit = limit_from_go(&tc, Color::White);
        assert_eq!(limit.depth, 7);
        assert_eq!(limit.hard_nodes, Some(20_000));
        assert!(!limit.is_timed());
    }
}
