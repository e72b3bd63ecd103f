use crate::{
    error::{Error, Result},
    tree::tree::{IsolationTree, IsolationTreeConfig},
    utils::{
        sampling::sample,
        statistics::{argsort_desc, mean, transpose},
        structures::Sample,
    },
    RandomGenerator,
};
use hashbrown::HashSet;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const SUBSAMPLE_SIZE: usize = 256;
pub const EGAMMA: f64 = 0.577215664901532860606512090082402431_f64;
pub const SCORE_BASE: f64 = 2.0;
pub const ANOMALY_THRESHOLD: f64 = 0.5;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IsolationForestConfig {
    pub n_trees: usize,
    pub sample_size: usize,
    /// Seed for reproducible forests; `None` seeds from OS entropy.
    pub random_state: Option<u64>,
}
impl Default for IsolationForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            sample_size: SUBSAMPLE_SIZE,
            random_state: None,
        }
    }
}

/// One entry of an anomaly ranking.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub index: usize,
    pub score: f64,
    pub path_length: f64,
}

#[derive(Clone, Debug)]
pub struct IsolationForest {
    data: Vec<Sample>,
    config: IsolationForestConfig,
    height_limit: usize,
    trees: Vec<IsolationTree>,
}

impl IsolationForest {
    pub fn new(data: Vec<Vec<f64>>, n_trees: usize, sample_size: usize) -> Result<Self> {
        Self::from_config(
            data,
            &IsolationForestConfig {
                n_trees,
                sample_size,
                random_state: None,
            },
        )
    }

    pub fn from_config(data: Vec<Vec<f64>>, config: &IsolationForestConfig) -> Result<Self> {
        validate_data(&data)?;
        validate_config(config, data.len())?;

        let data = data.into_iter().map(Sample::new).collect::<Vec<_>>();
        let height_limit = height_limit(config.sample_size);

        let mut random_state = match config.random_state {
            Some(seed) => RandomGenerator::seed_from_u64(seed),
            None => RandomGenerator::from_entropy(),
        };
        let random_generators = (0..config.n_trees)
            .map(|_| RandomGenerator::seed_from_u64(random_state.gen()))
            .collect::<Vec<_>>();

        let trees = random_generators
            .into_par_iter()
            .enumerate()
            .map(|(i, mut random_state)| {
                let samples = sample(&data, config.sample_size, &mut random_state);
                let mut tree = IsolationTree::new(IsolationTreeConfig {
                    max_depth: height_limit,
                });
                tree.fit(&samples, &mut random_state);
                debug!(tree = i, nodes = tree.get_nodes().len(), "built isolation tree");
                tree
            })
            .collect::<Vec<_>>();

        info!(
            data_size = data.len(),
            n_features = data[0].len(),
            n_trees = config.n_trees,
            sample_size = config.sample_size,
            height_limit,
            "isolation forest created"
        );

        Ok(Self {
            data,
            config: config.clone(),
            height_limit,
            trees,
        })
    }

    pub fn get_data(&self) -> &[Sample] {
        &self.data
    }
    pub fn get_config(&self) -> &IsolationForestConfig {
        &self.config
    }
    pub fn get_n_trees(&self) -> usize {
        self.config.n_trees
    }
    pub fn get_sample_size(&self) -> usize {
        self.config.sample_size
    }
    pub fn get_n_features(&self) -> usize {
        self.data[0].len()
    }
    pub fn get_height_limit(&self) -> usize {
        self.height_limit
    }
    /// Trees in the order they were built.
    pub fn get_trees(&self) -> &[IsolationTree] {
        &self.trees
    }
    pub fn get_tree(&self, index: usize) -> Option<&IsolationTree> {
        self.trees.get(index)
    }

    /// Path lengths of every point in every tree, indexed `[point][tree]`.
    pub fn depth_samples<P: AsRef<[f64]> + Sync>(&self, data: &[P]) -> Vec<Vec<f64>> {
        let n_population = self.data.len();
        let depths = self
            .trees
            .par_iter()
            .map(|tree| {
                data.iter()
                    .map(|x| tree.depth_of(x.as_ref(), n_population))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();
        transpose(depths)
    }

    /// Mean path length across the forest for every point of the dataset, in dataset order.
    pub fn average_path_lengths(&self) -> Vec<f64> {
        self.mean_depths(&self.data)
    }

    /// Anomaly score in (0, 1] for every point of the dataset, in dataset order.
    pub fn anomaly_scores(&self) -> Vec<f64> {
        self.average_path_lengths()
            .into_iter()
            .map(|path_length| self.score(path_length))
            .collect()
    }

    /// The `k` highest scoring points of the dataset, best first.
    pub fn top_anomalies(&self, k: usize) -> Result<Vec<Anomaly>> {
        let path_lengths = self.average_path_lengths();
        let scores = path_lengths
            .iter()
            .map(|&path_length| self.score(path_length))
            .collect::<Vec<_>>();
        max_anomaly_scores(&scores, &path_lengths, k)
    }

    /// Mean path length of points that need not belong to the dataset.
    pub fn path_lengths_for(&self, points: &[Vec<f64>]) -> Result<Vec<f64>> {
        self.validate_points(points)?;
        Ok(self.mean_depths(points))
    }

    pub fn score_samples(&self, points: &[Vec<f64>]) -> Result<Vec<f64>> {
        Ok(self
            .path_lengths_for(points)?
            .into_iter()
            .map(|path_length| self.score(path_length))
            .collect())
    }

    /// `true` for every point whose score exceeds [`ANOMALY_THRESHOLD`].
    pub fn predict(&self, points: &[Vec<f64>]) -> Result<Vec<bool>> {
        Ok(self
            .score_samples(points)?
            .into_iter()
            .map(|score| score > ANOMALY_THRESHOLD)
            .collect())
    }

    /// c(n) with the dataset size as population.
    pub fn average_path_length(&self, n_samples: usize) -> f64 {
        average_path_length(n_samples, self.data.len())
    }

    fn score(&self, path_length: f64) -> f64 {
        let normalizer = self.average_path_length(self.config.sample_size);
        if normalizer <= 0.0 {
            return 1.0;
        }
        SCORE_BASE.powf(-path_length / normalizer)
    }

    fn mean_depths<P: AsRef<[f64]> + Sync>(&self, data: &[P]) -> Vec<f64> {
        self.depth_samples(data)
            .iter()
            .map(|depths| mean(depths))
            .collect()
    }

    fn validate_points(&self, points: &[Vec<f64>]) -> Result<()> {
        let n_features = self.get_n_features();
        for (i, point) in points.iter().enumerate() {
            if point.len() != n_features {
                return Err(Error::InvalidQueryArgument(format!(
                    "point {} has {} features, the forest was built on {}",
                    i,
                    point.len(),
                    n_features
                )));
            }
            if point.iter().any(|v| !v.is_finite()) {
                return Err(Error::InvalidQueryArgument(format!(
                    "point {} contains a non-finite value",
                    i
                )));
            }
        }
        Ok(())
    }
}

/// Expected path length of an unsuccessful search in a random binary search tree of
/// `n_samples` nodes, with `n_population` the size of the whole dataset.
pub fn average_path_length(n_samples: usize, n_population: usize) -> f64 {
    match n_samples {
        0 | 1 => 0.0,
        2 => 1.0,
        n => 2.0 * harmonic_number(n - 1) - 2.0 * (n as f64 - 1.0) / n_population as f64,
    }
}

#[inline]
fn harmonic_number(n: usize) -> f64 {
    (n as f64).ln() + EGAMMA
}

pub fn height_limit(sample_size: usize) -> usize {
    (sample_size as f64).log2().ceil() as usize
}

/// Ranks points by descending score. Equal scores keep the lower index first.
pub fn max_anomaly_scores(scores: &[f64], path_lengths: &[f64], k: usize) -> Result<Vec<Anomaly>> {
    if scores.len() != path_lengths.len() {
        return Err(Error::InvalidQueryArgument(format!(
            "{} scores but {} path lengths",
            scores.len(),
            path_lengths.len()
        )));
    }
    if k == 0 || k > scores.len() {
        return Err(Error::InvalidQueryArgument(format!(
            "number of anomalies must be between 1 and {}, got {}",
            scores.len(),
            k
        )));
    }
    Ok(argsort_desc(scores)
        .into_iter()
        .take(k)
        .map(|index| Anomaly {
            index,
            score: scores[index],
            path_length: path_lengths[index],
        })
        .inspect(|anomaly| {
            debug!(
                index = anomaly.index,
                score = anomaly.score,
                path_length = anomaly.path_length,
                "ranked anomaly"
            )
        })
        .collect())
}

fn validate_data(data: &[Vec<f64>]) -> Result<()> {
    if data.is_empty() || data[0].is_empty() {
        return Err(Error::InvalidDataset(
            "data must be a non-empty collection of non-empty points".to_string(),
        ));
    }

    let n_features = data[0].len();
    if let Some((i, point)) = data.iter().enumerate().find(|(_, p)| p.len() != n_features) {
        return Err(Error::InvalidDataset(format!(
            "all points must have {} features, point {} has {}",
            n_features,
            i,
            point.len()
        )));
    }

    if let Some(i) = data.iter().position(|p| p.iter().any(|v| !v.is_finite())) {
        return Err(Error::InvalidDataset(format!(
            "point {} contains a non-finite value",
            i
        )));
    }

    let mut seen = HashSet::with_capacity(data.len());
    for (i, point) in data.iter().enumerate() {
        // -0.0 and 0.0 are the same value
        let key = point
            .iter()
            .map(|&v| if v == 0.0 { 0u64 } else { v.to_bits() })
            .collect::<Vec<_>>();
        if !seen.insert(key) {
            return Err(Error::InvalidDataset(format!(
                "point {} duplicates an earlier point",
                i
            )));
        }
    }
    Ok(())
}

fn validate_config(config: &IsolationForestConfig, data_size: usize) -> Result<()> {
    if config.n_trees == 0 {
        return Err(Error::InvalidHyperparameter(
            "number of trees must be positive".to_string(),
        ));
    }
    if config.sample_size == 0 || config.sample_size > data_size {
        return Err(Error::InvalidHyperparameter(format!(
            "sample size must be between 1 and the data size {}, got {}",
            data_size, config.sample_size
        )));
    }
    Ok(())
}
