//! Shuffled K-fold splitter

use crate::core::{Result, SVMError};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// K-Fold cross-validator
///
/// Splits `n` indices into `k` folds after an optional seeded shuffle. Each
/// fold is used once as the held-out set while the other `k - 1` form the
/// training set. When `n` is not a multiple of `k` the first `n % k` folds
/// get one extra index.
#[derive(Debug, Clone)]
pub struct KFold {
    n_splits: usize,
    random_state: Option<u64>,
}

impl KFold {
    /// `n_splits` must be at least 2
    pub fn new(n_splits: usize) -> Self {
        Self {
            n_splits,
            random_state: None,
        }
    }

    /// Shuffle indices with a seeded generator before splitting
    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = Some(random_state);
        self
    }

    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// Generate `(train_indices, test_indices)` for each fold
    pub fn split(&self, n_samples: usize) -> Result<Vec<(Vec<usize>, Vec<usize>)>> {
        if self.n_splits < 2 {
            return Err(SVMError::InvalidParameter(format!(
                "Number of folds must be at least 2, got: {}",
                self.n_splits
            )));
        }
        if self.n_splits > n_samples {
            return Err(SVMError::InvalidParameter(format!(
                "Cannot split {n_samples} samples into {} folds",
                self.n_splits
            )));
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        if let Some(seed) = self.random_state {
            let mut rng = StdRng::seed_from_u64(seed);
            indices.shuffle(&mut rng);
        }

        let fold_size = n_samples / self.n_splits;
        let remainder = n_samples % self.n_splits;

        let mut folds = Vec::with_capacity(self.n_splits);
        let mut start = 0;
        for i in 0..self.n_splits {
            let end = start + fold_size + usize::from(i < remainder);

            let test = indices[start..end].to_vec();
            let mut train = Vec::with_capacity(n_samples - test.len());
            train.extend_from_slice(&indices[..start]);
            train.extend_from_slice(&indices[end..]);

            folds.push((train, test));
            start = end;
        }

        Ok(folds)
    }
}
