use crate::RandomGenerator;
use rand::seq::SliceRandom;

/// Draws `n_samples` distinct indices out of `0..n_population`, uniformly and without replacement.
///
/// Callers must ensure `n_samples <= n_population`; larger requests are clamped.
pub fn generate_indices(
    n_samples: usize,
    n_population: usize,
    random_state: &mut RandomGenerator,
) -> Vec<usize> {
    let mut population = (0..n_population).collect::<Vec<usize>>();
    let (chosen, _) = population.partial_shuffle(random_state, n_samples);
    chosen.to_vec()
}

/// Uniform random subset of `data` of size `n_samples`, without replacement.
pub fn sample<T: Clone>(data: &[T], n_samples: usize, random_state: &mut RandomGenerator) -> Vec<T> {
    generate_indices(n_samples, data.len(), random_state)
        .into_iter()
        .map(|idx| data[idx].clone())
        .collect()
}
