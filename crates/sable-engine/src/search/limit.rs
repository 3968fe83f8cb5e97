//! Search budget: depth, node and wall-clock ceilings.

use std::time::{Duration, Instant};

use crate::search::params::DEFAULT_DEPTH;

/// What a search may spend.
///
/// Hard limits abort a search mid-iteration; soft limits are only checked
/// between iterations and stop the next one from starting. Node limits
/// apply to each thread's own count.
#[derive(Debug, Clone, Copy)]
pub struct Limit {
    pub depth: usize,
    pub hard_time: Option<Duration>,
    pub soft_time: Option<Duration>,
    pub hard_nodes: Option<u64>,
    pub soft_nodes: Option<u64>,
    started: Instant,
}

impl Limit {
    /// No ceiling other than the maximum depth; runs until stopped.
    pub fn infinite() -> Limit {
        Limit {
            depth: DEFAULT_DEPTH,
            hard_time: None,
            soft_time: None,
            hard_nodes: None,
            soft_nodes: None,
            started: Instant::now(),
        }
    }

    pub fn depth(depth: usize) -> Limit {
        Limit { depth: depth.clamp(1, DEFAULT_DEPTH), ..Limit::infinite() }
    }

    pub fn nodes(hard: u64) -> Limit {
        Limit { hard_nodes: Some(hard), ..Limit::infinite() }
    }

    pub fn movetime(time: Duration) -> Limit {
        Limit { hard_time: Some(time), ..Limit::infinite() }
    }

    pub fn with_soft_nodes(self, soft: u64) -> Limit {
        Limit { soft_nodes: Some(soft), ..self }
    }

    pub fn with_soft_time(self, soft: Duration) -> Limit {
        Limit { soft_time: Some(soft), ..self }
    }

    /// Restart the clock. Called when the search begins.
    pub fn start(&mut self) {
        self.started = Instant::now();
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Whether a clock is running at all.
    pub fn is_timed(&self) -> bool {
        self.hard_time.is_some() || self.soft_time.is_some()
    }

    pub fn out_of_time(&self) -> bool {
        self.hard_time.is_some_and(|hard| self.elapsed() >= hard)
    }

    pub fn out_of_time_soft(&self) -> bool {
        self.soft_time.is_some_and(|soft| self.elapsed() >= soft)
    }

    pub fn out_of_nodes(&self, nodes: u64) -> bool {
        self.hard_nodes.is_some_and(|hard| nodes >= hard)
    }

    pub fn out_of_nodes_soft(&self, nodes: u64) -> bool {
        self.soft_nodes.is_some_and(|soft| nodes >= soft)
    }
}

impl Default for Limit {
    fn default() -> Self {
        Self::infinite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infinite_never_trips() {
        let limit = Limit::infinite();
        assert!(!limit.out_of_time());
        assert!(!limit.out_of_time_soft());
        assert!(!limit.out_of_nodes(u64::MAX));
        assert!(!limit.is_timed());
        assert_eq!(limit.depth, DEFAULT_DEPTH);
    }

    #[test]
    fn node_ceilings() {
        let limit = Limit::nodes(100_000).with_soft_nodes(5_000);
        assert!(!limit.out_of_nodes_soft(4_999));
        assert!(limit.out_of_nodes_soft(5_000));
        assert!(!limit.out_of_nodes(99_999));
        assert!(limit.out_of_nodes(100_000));
    }

    #[test]
    fn expired_clock() {
        let limit = Limit::movetime(Duration::ZERO).with_soft_time(Duration::ZERO);
        assert!(limit.is_timed());
        assert!(limit.out_of_time());
        assert!(limit.out_of_time_soft());
    }

    #[test]
    fn depth_is_clamped() {
        assert_eq!(Limit::depth(0).depth, 1);
        assert_eq!(Limit::depth(1000).depth, DEFAULT_DEPTH);
        assert_eq!(Limit::depth(7).depth, 7);
    }
}
