//! Seeded train/test partitions shared across aligned tables
//!
//! The cancer and diabetes tables hold the same respondents in the same
//! row order, so one index draw partitions all of them. A partition
//! remembers the row count it was drawn for and refuses to index any
//! other table.

use crate::core::{Result, SVMError};
use crate::data::Dataset;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

/// Disjoint, sorted train/test row indices
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Partition {
    n_rows: usize,
    seed: u64,
    train: Vec<usize>,
    test: Vec<usize>,
}

impl Partition {
    /// Draw `floor(n_rows * train_fraction)` training rows with a seeded shuffle
    ///
    /// The same `(n_rows, train_fraction, seed)` always yields the same
    /// partition.
    pub fn draw(n_rows: usize, train_fraction: f64, seed: u64) -> Result<Self> {
        if n_rows == 0 {
            return Err(SVMError::EmptyDataset);
        }
        if !(train_fraction > 0.0 && train_fraction < 1.0) {
            return Err(SVMError::InvalidParameter(format!(
                "Train fraction must be between 0 and 1, got: {train_fraction}"
            )));
        }

        let n_train = (n_rows as f64 * train_fraction).floor() as usize;
        if n_train == 0 || n_train == n_rows {
            return Err(SVMError::InvalidParameter(format!(
                "Train fraction {train_fraction} leaves an empty partition for {n_rows} rows"
            )));
        }

        let mut indices: Vec<usize> = (0..n_rows).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let mut train = indices[..n_train].to_vec();
        let mut test = indices[n_train..].to_vec();
        train.sort_unstable();
        test.sort_unstable();

        Ok(Self {
            n_rows,
            seed,
            train,
            test,
        })
    }

    /// Verify that every table has the same number of rows
    ///
    /// Returns the shared row count.
    pub fn validate_aligned(datasets: &[&Dataset]) -> Result<usize> {
        let first = datasets.first().ok_or(SVMError::EmptyDataset)?;
        let n_rows = first.len();
        for dataset in &datasets[1..] {
            if dataset.len() != n_rows {
                return Err(SVMError::IndexMisalignment {
                    expected: n_rows,
                    actual: dataset.len(),
                });
            }
        }
        Ok(n_rows)
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn train_indices(&self) -> &[usize] {
        &self.train
    }

    pub fn test_indices(&self) -> &[usize] {
        &self.test
    }

    /// Split a table into its (train, test) rows
    pub fn apply(&self, dataset: &Dataset) -> Result<(Dataset, Dataset)> {
        if dataset.len() != self.n_rows {
            return Err(SVMError::IndexMisalignment {
                expected: self.n_rows,
                actual: dataset.len(),
            });
        }
        Ok((dataset.subset(&self.train), dataset.subset(&self.test)))
    }
}
