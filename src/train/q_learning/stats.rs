//! Training statistics for Q-learning
//!
//! This module defines structures for tracking and aggregating
//! training metrics across Q-learning iterations.

use std::ops::AddAssign;

/// Statistics for one training iteration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingStats {
    /// Episodes that finished during the iteration
    pub episodes: usize,

    /// Sum of returns of finished episodes
    pub total_return: f64,

    /// Sum of absolute TD errors
    pub total_td_error: f64,

    /// Environment steps taken (summed over envs)
    pub steps: usize,

    /// Exploration rate at the end of the iteration
    pub epsilon: f64,
}

impl TrainingStats {
    /// Create zero-initialized statistics
    pub fn zeros() -> Self {
        Self::default()
    }

    /// Mean return of finished episodes, 0 if none finished
    pub fn mean_return(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.total_return / self.episodes as f64
        }
    }

    /// Mean absolute TD error per step
    pub fn mean_td_error(&self) -> f64 {
        if self.steps == 0 {
            0.0
        } else {
            self.total_td_error / self.steps as f64
        }
    }

    /// Add another statistics instance to this one
    ///
    /// Epsilon is taken from `other`, the later iteration.
    pub fn add(&mut self, other: &TrainingStats) {
        self.episodes += other.episodes;
        self.total_return += other.total_return;
        self.total_td_error += other.total_td_error;
        self.steps += other.steps;
        self.epsilon = other.epsilon;
    }

    /// Collapse accumulated totals into per-episode and per-step means
    ///
    /// The result holds at most one episode and one step, so its
    /// `mean_return` and `mean_td_error` equal the averages of `self`.
    pub fn average(&self) -> Self {
        Self {
            episodes: self.episodes.min(1),
            total_return: self.mean_return(),
            total_td_error: self.mean_td_error(),
            steps: self.steps.min(1),
            epsilon: self.epsilon,
        }
    }
}

impl AddAssign<&TrainingStats> for TrainingStats {
    fn add_assign(&mut self, other: &TrainingStats) {
        self.add(other);
    }
}

/// Aggregated training statistics across multiple iterations
///
/// Provides summary statistics and trends for monitoring training progress.
#[derive(Debug, Clone)]
pub struct AggregatedStats {
    /// Statistics from the latest iteration
    pub current: TrainingStats,

    /// Sum over all iterations
    pub total: TrainingStats,

    /// Exponential moving average of the mean episode return
    pub running_mean_return: f64,

    /// Best mean return of any iteration that finished an episode
    pub best_mean_return: f64,

    /// Number of iterations recorded
    pub iterations: usize,
}

impl Default for AggregatedStats {
    fn default() -> Self {
        Self::new()
    }
}

impl AggregatedStats {
    /// Create new aggregated statistics
    pub fn new() -> Self {
        Self {
            current: TrainingStats::zeros(),
            total: TrainingStats::zeros(),
            running_mean_return: 0.0,
            best_mean_return: f64::NEG_INFINITY,
            iterations: 0,
        }
    }

    /// Update with the statistics of a new iteration
    pub fn update(&mut self, stats: TrainingStats) {
        self.total += &stats;
        self.iterations += 1;

        if stats.episodes > 0 {
            let mean = stats.mean_return();
            // EMA with alpha=0.1, seeded by the first observation
            self.running_mean_return = if self.best_mean_return == f64::NEG_INFINITY {
                mean
            } else {
                0.1 * mean + 0.9 * self.running_mean_return
            };
            if mean > self.best_mean_return {
                self.best_mean_return = mean;
            }
        }

        self.current = stats;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(episodes: usize, total_return: f64, steps: usize) -> TrainingStats {
        TrainingStats { episodes, total_return, total_td_error: steps as f64, steps, epsilon: 0.5 }
    }

    #[test]
    fn test_means() {
        let s = stats(4, 40.0, 80);
        assert_eq!(s.mean_return(), 10.0);
        assert_eq!(s.mean_td_error(), 1.0);
        assert_eq!(TrainingStats::zeros().mean_return(), 0.0);
        assert_eq!(TrainingStats::zeros().mean_td_error(), 0.0);
    }

    #[test]
    fn test_add_assign() {
        let mut total = stats(1, 10.0, 20);
        let mut later = stats(3, 50.0, 60);
        later.epsilon = 0.1;
        total += &later;

        assert_eq!(total.episodes, 4);
        assert_eq!(total.total_return, 60.0);
        assert_eq!(total.steps, 80);
        assert_eq!(total.epsilon, 0.1);
    }

    #[test]
    fn test_average() {
        let mut total = stats(2, 30.0, 40);
        total += &stats(2, 10.0, 60);

        let avg = total.average();
        assert_eq!(avg.total_return, 10.0);
        assert_eq!(avg.total_td_error, 1.0);
        assert_eq!(avg.mean_return(), total.mean_return());
        assert_eq!(avg.mean_td_error(), total.mean_td_error());
        assert_eq!(avg.epsilon, 0.5);

        // No finished episodes and no steps
        let empty = TrainingStats::zeros().average();
        assert_eq!(empty, TrainingStats::zeros());

        let no_episodes = stats(0, 0.0, 10).average();
        assert_eq!(no_episodes.episodes, 0);
        assert_eq!(no_episodes.total_return, 0.0);
        assert_eq!(no_episodes.total_td_error, 1.0);
    }

    #[test]
    fn test_aggregated_best_and_running() {
        let mut agg = AggregatedStats::new();
        agg.update(stats(0, 0.0, 10));
        assert_eq!(agg.best_mean_return, f64::NEG_INFINITY);

        agg.update(stats(2, 20.0, 40));
        assert_eq!(agg.best_mean_return, 10.0);
        assert_eq!(agg.running_mean_return, 10.0);

        agg.update(stats(1, 0.0, 20));
        assert_eq!(agg.best_mean_return, 10.0);
        assert!((agg.running_mean_return - 9.0).abs() < 1e-12);

        assert_eq!(agg.iterations, 3);
        assert_eq!(agg.total.episodes, 3);
        assert_eq!(agg.current.episodes, 1);
    }
}
