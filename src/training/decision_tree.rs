//! Decision tree classifier

use crate::error::{Result, SafeHeartError};
use ndarray::{Array1, Array2, ArrayView1};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Decision tree node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// Leaf node holding the class distribution of its training samples
    Leaf {
        distribution: Vec<f64>,
        n_samples: usize,
    },
    /// Internal node with split
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
        n_samples: usize,
        impurity: f64,
    },
}

/// Nodes smaller than this become leaves
const MIN_SAMPLES_SPLIT: usize = 2;
/// Smallest child a split may produce
const MIN_SAMPLES_LEAF: usize = 1;

fn gini(counts: &[usize], n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    1.0 - counts.iter().map(|&c| (c as f64 / n).powi(2)).sum::<f64>()
}

/// Decision tree classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    /// Tree root
    root: Option<TreeNode>,
    /// Maximum depth
    pub max_depth: Option<usize>,
    /// Number of candidate features per split (all when unset)
    pub max_features: Option<usize>,
    /// Number of features
    n_features: usize,
    /// Feature importances
    feature_importances: Option<Array1<f64>>,
    /// Classes seen during fit, sorted
    classes: Vec<f64>,
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Working state while growing one tree
struct Builder<'a> {
    x: &'a Array2<f64>,
    y: &'a [usize],
    n_classes: usize,
    rng: &'a mut ChaCha8Rng,
    importances: Vec<f64>,
    buffer: Vec<(f64, usize)>,
}

struct SplitCandidate {
    feature_idx: usize,
    threshold: f64,
    child_impurity: f64,
}

impl DecisionTree {
    /// Create a new classifier tree
    pub fn new() -> Self {
        Self {
            root: None,
            max_depth: None,
            max_features: None,
            n_features: 0,
            feature_importances: None,
            classes: Vec::new(),
        }
    }

    /// Set maximum depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Set number of candidate features per split
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = Some(max_features.max(1));
        self
    }

    /// Fit on a (possibly repeated) subset of rows with pre-encoded labels.
    ///
    /// `y` holds class codes into `classes`; the forest passes the full class
    /// list so every tree reports distributions of the same width.
    pub(crate) fn fit_sample(
        &mut self,
        x: &Array2<f64>,
        y: &[usize],
        classes: Vec<f64>,
        indices: &[usize],
        rng: &mut ChaCha8Rng,
    ) -> Result<()> {
        let n_samples = indices.len();
        if n_samples == 0 {
            return Err(SafeHeartError::TrainingError(
                "cannot fit a tree on zero samples".to_string(),
            ));
        }
        if classes.is_empty() {
            return Err(SafeHeartError::TrainingError("no classes to learn".to_string()));
        }

        let n_features = x.ncols();
        self.n_features = n_features;
        self.classes = classes;

        let mut builder = Builder {
            x,
            y,
            n_classes: self.classes.len(),
            rng,
            importances: vec![0.0; n_features],
            buffer: Vec::with_capacity(n_samples),
        };

        let mut indices = indices.to_vec();
        let root = self.build_tree(&mut builder, &mut indices, 0);

        let mut importances = builder.importances;
        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            for imp in &mut importances {
                *imp /= total;
            }
        }

        self.root = Some(root);
        self.feature_importances = Some(Array1::from_vec(importances));
        Ok(())
    }

    fn class_counts(builder: &Builder<'_>, indices: &[usize]) -> Vec<usize> {
        let mut counts = vec![0usize; builder.n_classes];
        for &i in indices {
            counts[builder.y[i]] += 1;
        }
        counts
    }

    fn build_tree(&self, builder: &mut Builder<'_>, indices: &mut [usize], depth: usize) -> TreeNode {
        let n_samples = indices.len();
        let counts = Self::class_counts(builder, indices);
        let impurity = gini(&counts, n_samples);

        let is_pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
        let should_stop = is_pure
            || n_samples < MIN_SAMPLES_SPLIT
            || n_samples < 2 * MIN_SAMPLES_LEAF
            || self.max_depth.map_or(false, |d| depth >= d);

        if should_stop {
            return leaf(&counts, n_samples);
        }

        let Some(split) = self.find_best_split(builder, indices, &counts) else {
            return leaf(&counts, n_samples);
        };

        builder.importances[split.feature_idx] +=
            n_samples as f64 * (impurity - split.child_impurity);

        let x = builder.x;
        let mid = partition(indices, |i| x[[i, split.feature_idx]] <= split.threshold);
        let (left_idx, right_idx) = indices.split_at_mut(mid);

        let left = Box::new(self.build_tree(builder, left_idx, depth + 1));
        let right = Box::new(self.build_tree(builder, right_idx, depth + 1));

        TreeNode::Split {
            feature_idx: split.feature_idx,
            threshold: split.threshold,
            left,
            right,
            n_samples,
            impurity,
        }
    }

    /// Sort-and-sweep search over a random subset of features.
    ///
    /// Features are visited in shuffled order until `max_features` of them
    /// turned out to be non-constant at this node.
    fn find_best_split(
        &self,
        builder: &mut Builder<'_>,
        indices: &[usize],
        parent_counts: &[usize],
    ) -> Option<SplitCandidate> {
        let n_features = builder.x.ncols();
        let budget = self.max_features.unwrap_or(n_features).min(n_features);
        let n = indices.len();

        let mut features: Vec<usize> = (0..n_features).collect();
        features.shuffle(&mut *builder.rng);

        let mut best: Option<SplitCandidate> = None;
        let mut visited = 0usize;

        for feature_idx in features {
            if visited >= budget {
                break;
            }

            builder.buffer.clear();
            builder
                .buffer
                .extend(indices.iter().map(|&i| (builder.x[[i, feature_idx]], builder.y[i])));
            builder
                .buffer
                .sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

            let first = builder.buffer[0].0;
            let last = builder.buffer[n - 1].0;
            if first == last {
                continue;
            }
            visited += 1;

            let mut left = vec![0usize; builder.n_classes];
            let mut right = parent_counts.to_vec();

            for k in 0..n - 1 {
                let (value, class) = builder.buffer[k];
                left[class] += 1;
                right[class] -= 1;

                let next = builder.buffer[k + 1].0;
                if value == next {
                    continue;
                }

                let n_left = k + 1;
                let n_right = n - n_left;
                if n_left < MIN_SAMPLES_LEAF || n_right < MIN_SAMPLES_LEAF {
                    continue;
                }

                let child_impurity = (n_left as f64 * gini(&left, n_left)
                    + n_right as f64 * gini(&right, n_right))
                    / n as f64;

                if best.as_ref().map_or(true, |b| child_impurity < b.child_impurity) {
                    let mut threshold = (value + next) / 2.0;
                    if threshold >= next {
                        threshold = value;
                    }
                    best = Some(SplitCandidate {
                        feature_idx,
                        threshold,
                        child_impurity,
                    });
                }
            }
        }

        best
    }

    fn leaf_for(&self, row: ArrayView1<'_, f64>) -> Result<&[f64]> {
        let mut node = self.root.as_ref().ok_or(SafeHeartError::ModelNotFitted)?;
        loop {
            match node {
                TreeNode::Leaf { distribution, .. } => return Ok(distribution.as_slice()),
                TreeNode::Split { feature_idx, threshold, left, right, .. } => {
                    node = if row[*feature_idx] <= *threshold { left } else { right };
                }
            }
        }
    }

    /// Class distribution of the leaf `row` falls into
    pub fn predict_row_proba(&self, row: ArrayView1<'_, f64>) -> Result<&[f64]> {
        if row.len() != self.n_features {
            return Err(SafeHeartError::ShapeError {
                expected: format!("{} features", self.n_features),
                actual: format!("{} features", row.len()),
            });
        }
        self.leaf_for(row)
    }

    /// Get feature importances
    pub fn feature_importances(&self) -> Option<&Array1<f64>> {
        self.feature_importances.as_ref()
    }

    pub fn classes(&self) -> &[f64] {
        &self.classes
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }
}

fn leaf(counts: &[usize], n_samples: usize) -> TreeNode {
    let n = n_samples.max(1) as f64;
    TreeNode::Leaf {
        distribution: counts.iter().map(|&c| c as f64 / n).collect(),
        n_samples,
    }
}

/// Reorder so rows satisfying `pred` come first; returns their count
fn partition(indices: &mut [usize], pred: impl Fn(usize) -> bool) -> usize {
    let mut mid = 0;
    for k in 0..indices.len() {
        if pred(indices[k]) {
            indices.swap(mid, k);
            mid += 1;
        }
    }
    mid
}

/// Index of the largest value; ties go to the lowest index
pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}

pub(crate) fn sorted_classes(y: &Array1<f64>) -> Vec<f64> {
    let mut classes: Vec<f64> = y.iter().copied().collect();
    classes.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    classes.dedup();
    classes
}

pub(crate) fn encode_labels(y: &Array1<f64>, classes: &[f64]) -> Vec<usize> {
    y.iter()
        .map(|v| classes.iter().position(|c| c == v).unwrap_or(0))
        .collect()
}
