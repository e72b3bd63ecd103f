use super::structures::Sample;
use crate::tree::tree::StandardSplit;
use crate::RandomGenerator;
use rand::{seq::SliceRandom, Rng};
use std::ops::Range;

/// Reorders `samples` so that every sample going left precedes every sample going right.
/// Returns the number of samples on the left.
pub fn split_samples(split: &StandardSplit, samples: &mut [Sample]) -> usize {
    let mut start = 0;
    let mut end = samples.len();

    while start < end {
        if split.split(&samples[start]) == 0 {
            start += 1;
        } else {
            samples.swap(start, end - 1);
            end -= 1;
        }
    }
    start
}

/// Uniform draw in `[min_feature, max_feature)` that stays finite even when the width overflows.
pub fn random_threshold(min_feature: f64, max_feature: f64, random_state: &mut RandomGenerator) -> f64 {
    let t: f64 = random_state.gen();
    let width = max_feature - min_feature;
    let threshold = if width.is_finite() {
        min_feature + t * width
    } else {
        min_feature * (1.0 - t) + max_feature * t
    };
    if threshold >= max_feature {
        min_feature
    } else {
        threshold.max(min_feature)
    }
}

/// Picks a random non-constant feature and a random threshold inside its range, then
/// partitions `samples` on it.
///
/// Features found constant on `samples` are dropped from `non_constant_features`, since they
/// stay constant on every subset. Returns `None` only when no feature varies.
pub fn get_random_split(
    samples: &mut [Sample],
    non_constant_features: &mut Vec<usize>,
    random_state: &mut RandomGenerator,
) -> Option<(Range<usize>, Range<usize>, StandardSplit)> {
    non_constant_features.shuffle(random_state);

    while let Some(feature) = non_constant_features.pop() {
        let (min_feature, max_feature) = samples.iter().map(|s| s.features[feature]).fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), v| (lo.min(v), hi.max(v)),
        );

        if min_feature >= max_feature {
            continue;
        }

        let threshold = random_threshold(min_feature, max_feature, random_state);
        let rand_split = StandardSplit { feature, threshold };
        let split_idx = split_samples(&rand_split, samples);

        non_constant_features.push(feature);

        return Some((0..split_idx, split_idx..samples.len(), rand_split));
    }
    None
}
