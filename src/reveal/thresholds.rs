//! Reveal threshold curves
//!
//! Both curves use a quadratic ease-in, `((i + 1) / n)^2`: early steps show
//! very little and the last few steps show most of the picture.

use crate::consts::TOTAL_TILES;

#[inline]
fn ease_ratio(i: usize, step_count: usize) -> f64 {
    let t = (i + 1) as f64 / step_count as f64;
    t * t
}

/// Tiles revealed after each step (jigsaw mode)
///
/// Every step opens at least one new tile; the last step always opens the
/// whole grid.
pub fn compute_tile_thresholds(step_count: usize, total_tiles: usize) -> Vec<u32> {
    let total = total_tiles as u32;
    let mut counts: Vec<u32> = Vec::with_capacity(step_count);

    for i in 0..step_count {
        if i + 1 == step_count {
            counts.push(total);
            continue;
        }

        let mut count = ((total as f64 * ease_ratio(i, step_count)).round() as u32).max(1);
        if let Some(&prev) = counts.last() {
            if count <= prev {
                count = prev + 1;
            }
        }
        counts.push(count.min(total));
    }

    counts
}

/// Fraction of the image revealed after each step (curtain/blur modes)
///
/// Rounded to two decimals; the last step is always exactly 1.0.
pub fn compute_percent_thresholds(step_count: usize) -> Vec<f32> {
    (0..step_count)
        .map(|i| {
            if i + 1 == step_count {
                1.0
            } else {
                ((ease_ratio(i, step_count) * 100.0).round() / 100.0) as f32
            }
        })
        .collect()
}

/// Both threshold tables for one active step list
#[derive(Debug, Clone, PartialEq)]
pub struct RevealPlan {
    pub tiles: Vec<u32>,
    pub percents: Vec<f32>,
    pub total_tiles: usize,
}

impl RevealPlan {
    pub fn new(step_count: usize) -> Self {
        Self::with_tiles(step_count, TOTAL_TILES)
    }

    pub fn with_tiles(step_count: usize, total_tiles: usize) -> Self {
        Self {
            tiles: compute_tile_thresholds(step_count, total_tiles),
            percents: compute_percent_thresholds(step_count),
            total_tiles,
        }
    }

    pub fn step_count(&self) -> usize {
        self.tiles.len()
    }

    /// True once `step` is the last step (or beyond)
    pub fn is_terminal(&self, step: i32) -> bool {
        step >= 0 && step as usize + 1 >= self.step_count()
    }

    /// Revealed tile count after `step` (-1 = nothing)
    pub fn tiles_at(&self, step: i32) -> usize {
        if step < 0 {
            return 0;
        }
        if self.is_terminal(step) {
            return self.total_tiles;
        }
        self.tiles[step as usize] as usize
    }

    /// Revealed fraction after `step` (-1 = nothing)
    pub fn percent_at(&self, step: i32) -> f32 {
        if step < 0 {
            return 0.0;
        }
        if self.is_terminal(step) {
            return 1.0;
        }
        self.percents[step as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_tile_thresholds_five_steps() {
        assert_eq!(compute_tile_thresholds(5, 16), vec![1, 3, 6, 10, 16]);
    }

    #[test]
    fn test_tile_thresholds_short_lists() {
        assert_eq!(compute_tile_thresholds(2, 16), vec![4, 16]);
        assert_eq!(compute_tile_thresholds(3, 16), vec![2, 7, 16]);
        assert_eq!(compute_tile_thresholds(4, 16), vec![1, 4, 9, 16]);
    }

    #[test]
    fn test_tile_thresholds_single_step() {
        assert_eq!(compute_tile_thresholds(1, 16), vec![16]);
        assert_eq!(compute_percent_thresholds(1), vec![1.0]);
    }

    #[test]
    fn test_tile_thresholds_ten_steps_strictly_increase() {
        let counts = compute_tile_thresholds(10, 16);
        assert_eq!(counts, vec![1, 2, 3, 4, 5, 6, 8, 10, 13, 16]);
        assert!(counts.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_percent_thresholds_two_steps() {
        assert_eq!(compute_percent_thresholds(2), vec![0.25, 1.0]);
    }

    #[test]
    fn test_percent_thresholds_rounded() {
        // (1/3)^2 = 0.111.., (2/3)^2 = 0.444..
        assert_eq!(compute_percent_thresholds(3), vec![0.11, 0.44, 1.0]);
    }

    #[test]
    fn test_plan_lookups() {
        let plan = RevealPlan::new(5);
        assert_eq!(plan.step_count(), 5);
        assert_eq!(plan.tiles_at(-1), 0);
        assert_eq!(plan.tiles_at(0), 1);
        assert_eq!(plan.tiles_at(4), 16);
        assert_eq!(plan.tiles_at(9), 16);
        assert_eq!(plan.percent_at(-1), 0.0);
        assert_eq!(plan.percent_at(4), 1.0);
        assert!(!plan.is_terminal(3));
        assert!(plan.is_terminal(4));
        assert!(!plan.is_terminal(-1));
    }

    proptest! {
        #[test]
        fn prop_tile_thresholds_shape(n in 1usize..=10) {
            let counts = compute_tile_thresholds(n, 16);
            prop_assert_eq!(counts.len(), n);
            prop_assert_eq!(*counts.last().unwrap(), 16);
            prop_assert!(counts.iter().all(|&c| c >= 1));
            prop_assert!(counts.windows(2).all(|w| w[0] < w[1]));
        }

        #[test]
        fn prop_percent_thresholds_shape(n in 1usize..=10) {
            let percents = compute_percent_thresholds(n);
            prop_assert_eq!(percents.len(), n);
            prop_assert_eq!(*percents.last().unwrap(), 1.0);
            prop_assert!(percents.iter().all(|&p| p > 0.0 && p <= 1.0));
            prop_assert!(percents.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
