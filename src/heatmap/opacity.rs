//! Age to opacity mapping.
//!
//! A line's age is placed linearly within the band of ages observed in the
//! file: the youngest line gets the scale maximum, the oldest the minimum.
//! Opacities are rounded to hundredths and lines sharing a rounded value are
//! grouped into one batch, so a file needs at most 101 decorations.

use std::collections::BTreeMap;

use crate::git::LineTimestamps;
use crate::models::{LineRange, OpacityBatch};

pub const MIN_OPACITY: f64 = 0.3;
pub const MAX_OPACITY: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpacityScale {
    min: f64,
    max: f64,
}

impl OpacityScale {
    /// `None` unless `0 <= min <= max <= 1`.
    pub fn new(min: f64, max: f64) -> Option<Self> {
        ((0.0..=1.0).contains(&min) && (0.0..=1.0).contains(&max) && min <= max)
            .then_some(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Opacity at `normalized_age` (0 = youngest in the file, 1 = oldest).
    pub fn at(&self, normalized_age: f64) -> f64 {
        let opacity = self.min + (1.0 - normalized_age) * (self.max - self.min);
        opacity.clamp(self.min, self.max)
    }
}

impl Default for OpacityScale {
    fn default() -> Self {
        Self {
            min: MIN_OPACITY,
            max: MAX_OPACITY,
        }
    }
}

/// Batching key: opacity in whole hundredths.
fn hundredths(opacity: f64) -> u32 {
    (opacity * 100.0).round() as u32
}

/// Group every line of `lines` into batches by rounded opacity.
///
/// Ages are `now - timestamp` and may be negative when commits are dated in
/// the future; only their position within the observed band matters. Batches
/// come out most opaque first, ranges in line order.
pub fn opacity_batches(lines: &LineTimestamps, now: i64, scale: &OpacityScale) -> Vec<OpacityBatch> {
    let age = |timestamp: i64| i128::from(now) - i128::from(timestamp);

    let Some((min_age, max_age)) = lines.iter().map(|(_, ts)| age(ts)).fold(None, |band, a| match band {
        None => Some((a, a)),
        Some((lo, hi)) => Some((lo.min(a), hi.max(a))),
    }) else {
        return Vec::new();
    };
    let range = if max_age == min_age { 1 } else { max_age - min_age };

    let mut by_opacity: BTreeMap<u32, Vec<LineRange>> = BTreeMap::new();
    for (line, timestamp) in lines.iter() {
        let normalized = (age(timestamp) - min_age) as f64 / range as f64;
        by_opacity
            .entry(hundredths(scale.at(normalized)))
            .or_default()
            .push(LineRange::whole_line(line));
    }

    by_opacity
        .into_iter()
        .rev()
        .map(|(key, ranges)| OpacityBatch {
            opacity: f64::from(key) / 100.0,
            ranges,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opacity_of(batches: &[OpacityBatch], line: u32) -> Option<f64> {
        batches
            .iter()
            .find(|b| b.ranges.iter().any(|r| r.start_line == line))
            .map(|b| b.opacity)
    }

    fn sample() -> LineTimestamps {
        LineTimestamps::from_iter([
            (0, 1_000),
            (1, 250_000),
            (2, 999_000),
            (3, 42),
            (4, 500_500),
            (5, 999_000),
            (9, 700_000),
        ])
    }

    #[test]
    fn test_scenario_a() {
        let lines = LineTimestamps::from_iter([(0, 1000), (1, 2000)]);

        let batches = opacity_batches(&lines, 2000, &OpacityScale::default());

        assert_eq!(batches.len(), 2);
        assert_eq!(opacity_of(&batches, 1), Some(1.0));
        assert_eq!(opacity_of(&batches, 0), Some(0.3));
    }

    #[test]
    fn test_single_line_is_fully_opaque() {
        let lines = LineTimestamps::from_iter([(12, 1_500_000_000)]);

        let batches = opacity_batches(&lines, 1_700_000_000, &OpacityScale::default());

        assert_eq!(batches, vec![OpacityBatch { opacity: MAX_OPACITY, ranges: vec![LineRange::whole_line(12)] }]);
    }

    #[test]
    fn test_identical_ages_share_one_batch() {
        let lines: LineTimestamps = (0..10).map(|line| (line, 5_000)).collect();

        let batches = opacity_batches(&lines, 9_000, &OpacityScale::default());

        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].opacity, MAX_OPACITY);
        assert_eq!(batches[0].ranges.len(), 10);
    }

    #[test]
    fn test_opacities_within_bounds() {
        let batches = opacity_batches(&sample(), 1_000_000, &OpacityScale::default());

        for batch in &batches {
            assert!((MIN_OPACITY..=MAX_OPACITY).contains(&batch.opacity), "{}", batch.opacity);
        }
    }

    #[test]
    fn test_youngest_is_max_and_oldest_is_min() {
        let batches = opacity_batches(&sample(), 1_000_000, &OpacityScale::default());

        // Lines 2 and 5 are the most recent, line 3 the oldest.
        assert_eq!(opacity_of(&batches, 2), Some(MAX_OPACITY));
        assert_eq!(opacity_of(&batches, 5), Some(MAX_OPACITY));
        assert_eq!(opacity_of(&batches, 3), Some(MIN_OPACITY));
    }

    #[test]
    fn test_older_lines_never_brighter() {
        let lines = sample();
        let batches = opacity_batches(&lines, 1_000_000, &OpacityScale::default());

        for (a, ts_a) in lines.iter() {
            for (b, ts_b) in lines.iter() {
                if ts_a < ts_b {
                    assert!(opacity_of(&batches, a) <= opacity_of(&batches, b), "line {a} vs {b}");
                }
            }
        }
    }

    #[test]
    fn test_every_line_in_exactly_one_batch() {
        let lines = sample();
        let batches = opacity_batches(&lines, 1_000_000, &OpacityScale::default());

        let mut seen: Vec<u32> = batches
            .iter()
            .flat_map(|b| b.ranges.iter().map(|r| r.start_line))
            .collect();
        seen.sort_unstable();
        let expected: Vec<u32> = lines.iter().map(|(line, _)| line).collect();
        assert_eq!(seen, expected);

        let mut keys: Vec<f64> = batches.iter().map(|b| b.opacity).collect();
        keys.dedup();
        assert_eq!(keys.len(), batches.len(), "batch opacities must be distinct");
    }

    #[test]
    fn test_ranges_cover_whole_lines() {
        let batches = opacity_batches(&sample(), 1_000_000, &OpacityScale::default());

        for range in batches.iter().flat_map(|b| &b.ranges) {
            assert_eq!(range.start_character, 0);
            assert_eq!(range.end_line, range.start_line);
            assert_eq!(range.end_character, crate::models::LINE_END);
        }
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let lines = sample();
        let scale = OpacityScale::default();

        assert_eq!(opacity_batches(&lines, 1_000_000, &scale), opacity_batches(&lines, 1_000_000, &scale));
    }

    #[test]
    fn test_future_commits_stay_in_range() {
        // Clock behind every commit: all ages negative.
        let lines = LineTimestamps::from_iter([(0, 2_000), (1, 3_000), (2, 2_500)]);

        let batches = opacity_batches(&lines, 1_000, &OpacityScale::default());

        assert_eq!(opacity_of(&batches, 1), Some(1.0));
        assert_eq!(opacity_of(&batches, 0), Some(0.3));
        assert_eq!(opacity_of(&batches, 2), Some(0.65));
    }

    #[test]
    fn test_mixed_sign_ages() {
        let lines = LineTimestamps::from_iter([(0, 500), (1, 1_500)]);

        let batches = opacity_batches(&lines, 1_000, &OpacityScale::default());

        assert_eq!(opacity_of(&batches, 1), Some(1.0));
        assert_eq!(opacity_of(&batches, 0), Some(0.3));
    }

    #[test]
    fn test_nearby_opacities_merge() {
        // 0.3 + 0.7 * (1 - 1/999) rounds to 1.00, same as the youngest line.
        let lines = LineTimestamps::from_iter([(0, 1_000), (1, 999), (2, 1)]);

        let batches = opacity_batches(&lines, 1_000, &OpacityScale::default());

        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].opacity, 1.0);
        assert_eq!(batches[0].ranges, vec![LineRange::whole_line(0), LineRange::whole_line(1)]);
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(opacity_batches(&LineTimestamps::new(), 10, &OpacityScale::default()).is_empty());
    }

    #[test]
    fn test_custom_scale() {
        let scale = OpacityScale::new(0.5, 0.9).unwrap();
        let lines = LineTimestamps::from_iter([(0, 0), (1, 50), (2, 100)]);

        let batches = opacity_batches(&lines, 100, &scale);

        assert_eq!(opacity_of(&batches, 2), Some(0.9));
        assert_eq!(opacity_of(&batches, 1), Some(0.7));
        assert_eq!(opacity_of(&batches, 0), Some(0.5));
    }

    #[test]
    fn test_scale_rejects_bad_bounds() {
        assert!(OpacityScale::new(0.8, 0.2).is_none());
        assert!(OpacityScale::new(-0.1, 1.0).is_none());
        assert!(OpacityScale::new(0.0, 1.5).is_none());
        assert!(OpacityScale::new(f64::NAN, 1.0).is_none());
        assert_eq!(OpacityScale::new(MIN_OPACITY, MAX_OPACITY), Some(OpacityScale::default()));
    }
}
