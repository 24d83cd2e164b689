//! Sequential Minimal Optimization (SMO) solver implementation
//!
//! Solves the cost-sensitive SVM dual
//!
//! ```text
//! max  Σ αᵢ − ½ Σᵢ Σⱼ αᵢ αⱼ yᵢ yⱼ K(xᵢ, xⱼ)
//! s.t. 0 ≤ αᵢ ≤ C · w(yᵢ),  Σ αᵢ yᵢ = 0
//! ```
//!
//! by repeatedly optimizing pairs of Lagrange multipliers. The class weight
//! w(y) only changes each sample's box constraint, which is how minority
//! samples buy a wider penalty budget than majority samples.

use crate::cache::KernelCache;
use crate::core::{OptimizationResult, OptimizerConfig, Result, SVMError, Sample};
use crate::kernel::Kernel;
use log::debug;
use std::sync::Arc;

/// Alphas closer than this to a bound are snapped onto it
const BOUND_EPS: f64 = 1e-12;

/// SMO solver for weighted SVM optimization
pub struct SMOSolver<K: Kernel> {
    kernel: Arc<K>,
    config: OptimizerConfig,
}

/// Mutable optimization state for one solve
struct SolverState {
    alpha: Vec<f64>,
    /// E_i = f(x_i) - y_i, with f including the bias
    errors: Vec<f64>,
    b: f64,
    y: Vec<f64>,
    upper: Vec<f64>,
}

impl SolverState {
    fn is_free(&self, i: usize) -> bool {
        self.alpha[i] > 0.0 && self.alpha[i] < self.upper[i]
    }
}

impl<K: Kernel> SMOSolver<K> {
    /// Create a new SMO solver with the given kernel and configuration
    pub fn new(kernel: Arc<K>, config: OptimizerConfig) -> Self {
        Self { kernel, config }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Solve the SVM optimization problem
    pub fn solve(&self, samples: &[Sample]) -> Result<OptimizationResult> {
        let mut cache = KernelCache::for_problem(samples.len(), self.config.cache_size);
        let result = self.solve_with_cache(samples, &mut cache)?;
        let stats = cache.stats();
        debug!(
            "SMO finished after {} passes, {} support vectors, cache hit rate {:.1}% ({} hits, {} misses, {}/{} entries)",
            result.iterations,
            result.support_vectors.len(),
            cache.hit_rate() * 100.0,
            stats.hits,
            stats.misses,
            stats.size,
            stats.capacity
        );
        Ok(result)
    }

    /// Solve with a caller-provided kernel cache indexed by sample position
    pub fn solve_with_cache(
        &self,
        samples: &[Sample],
        cache: &mut KernelCache,
    ) -> Result<OptimizationResult> {
        self.validate(samples)?;
        let n = samples.len();

        // A single-class problem has no margin; the model is the constant
        // decision for that class.
        let first = samples[0].label;
        if samples.iter().all(|s| s.label == first) {
            debug!("All {n} samples are {first}; fitting constant decision");
            return Ok(OptimizationResult {
                alpha: vec![0.0; n],
                b: first.sign(),
                support_vectors: Vec::new(),
                iterations: 0,
                converged: true,
            });
        }

        let y: Vec<f64> = samples.iter().map(|s| s.label.sign()).collect();
        let mut state = SolverState {
            alpha: vec![0.0; n],
            // All alphas start at zero, so f(x) = 0 and E_i = -y_i
            errors: y.iter().map(|&yi| -yi).collect(),
            b: 0.0,
            upper: samples
                .iter()
                .map(|s| self.config.upper_bound(s.label))
                .collect(),
            y,
        };

        let mut iterations = 0;
        let mut num_changed = 0;
        let mut examine_all = true;

        while (num_changed > 0 || examine_all) && iterations < self.config.max_iterations {
            num_changed = 0;

            for i in 0..n {
                if (examine_all || state.is_free(i))
                    && self.examine_example(i, samples, &mut state, cache)
                {
                    num_changed += 1;
                }
            }

            if examine_all {
                examine_all = false;
            } else if num_changed == 0 {
                examine_all = true;
            }

            iterations += 1;
        }

        let violations = (0..n).filter(|&i| self.violates_kkt(i, &state)).count();
        let converged = violations == 0;
        if !converged {
            let reason = if iterations >= self.config.max_iterations {
                "iteration cap reached"
            } else {
                "no pair made progress"
            };
            debug!(
                "SMO stopped after {iterations} passes ({reason}) with {violations} of {n} samples outside the KKT tolerance"
            );
        }

        let b = self.calculate_bias(&state);
        let support_vectors: Vec<usize> = state
            .alpha
            .iter()
            .enumerate()
            .filter_map(|(i, &a)| (a > 0.0).then_some(i))
            .collect();

        Ok(OptimizationResult {
            alpha: state.alpha,
            b,
            support_vectors,
            iterations,
            converged,
        })
    }

    fn validate(&self, samples: &[Sample]) -> Result<()> {
        if samples.is_empty() {
            return Err(SVMError::EmptyDataset);
        }
        if !(self.config.c.is_finite() && self.config.c > 0.0) {
            return Err(SVMError::InvalidParameter(format!(
                "C must be positive, got: {}",
                self.config.c
            )));
        }
        if !(self.config.epsilon > 0.0) {
            return Err(SVMError::InvalidParameter(format!(
                "Epsilon must be positive, got: {}",
                self.config.epsilon
            )));
        }
        let dim = samples[0].features.len();
        if let Some(bad) = samples.iter().find(|s| s.features.len() != dim) {
            return Err(SVMError::DimensionMismatch {
                expected: dim,
                actual: bad.features.len(),
            });
        }
        Ok(())
    }

    fn kernel_at(&self, cache: &mut KernelCache, samples: &[Sample], i: usize, j: usize) -> f64 {
        cache.get_or_compute(i, j, || {
            self.kernel
                .compute(&samples[i].features, &samples[j].features)
        })
    }

    /// Check sample i against the KKT conditions and try to pair it
    fn examine_example(
        &self,
        i: usize,
        samples: &[Sample],
        state: &mut SolverState,
        cache: &mut KernelCache,
    ) -> bool {
        if !self.violates_kkt(i, state) {
            return false;
        }

        // Second-choice heuristic: the free sample with the largest |E_i - E_j|
        if let Some(j) = self.select_second_variable(i, state) {
            if self.take_step(i, j, samples, state, cache) {
                return true;
            }
        }

        // Fall back to free samples, then bound ones, starting past i
        let n = samples.len();
        for pass_free in [true, false] {
            for offset in 1..n {
                let j = (i + offset) % n;
                if state.is_free(j) == pass_free && self.take_step(i, j, samples, state, cache) {
                    return true;
                }
            }
        }

        false
    }

    fn violates_kkt(&self, i: usize, state: &SolverState) -> bool {
        let tol = self.config.epsilon;
        let r_i = state.errors[i] * state.y[i];
        (r_i < -tol && state.alpha[i] < state.upper[i]) || (r_i > tol && state.alpha[i] > 0.0)
    }

    fn select_second_variable(&self, i: usize, state: &SolverState) -> Option<usize> {
        let e_i = state.errors[i];
        let mut best_j = None;
        let mut max_diff = 0.0;

        for j in (0..state.alpha.len()).filter(|&j| j != i && state.is_free(j)) {
            let diff = (e_i - state.errors[j]).abs();
            if diff > max_diff {
                max_diff = diff;
                best_j = Some(j);
            }
        }

        best_j
    }

    /// Jointly optimize alpha_i and alpha_j
    fn take_step(
        &self,
        i: usize,
        j: usize,
        samples: &[Sample],
        state: &mut SolverState,
        cache: &mut KernelCache,
    ) -> bool {
        if i == j {
            return false;
        }

        let (y_i, y_j) = (state.y[i], state.y[j]);
        let (alpha_i_old, alpha_j_old) = (state.alpha[i], state.alpha[j]);
        let (e_i, e_j) = (state.errors[i], state.errors[j]);
        let (c_i, c_j) = (state.upper[i], state.upper[j]);
        let s = y_i * y_j;

        let (low, high) = if y_i != y_j {
            let diff = alpha_j_old - alpha_i_old;
            (0.0_f64.max(diff), c_j.min(c_i + diff))
        } else {
            let sum = alpha_i_old + alpha_j_old;
            (0.0_f64.max(sum - c_i), c_j.min(sum))
        };

        if high <= low {
            return false;
        }

        let k_ii = self.kernel_at(cache, samples, i, i);
        let k_ij = self.kernel_at(cache, samples, i, j);
        let k_jj = self.kernel_at(cache, samples, j, j);

        let eta = k_ii + k_jj - 2.0 * k_ij;
        if eta <= 0.0 {
            // Not positive definite along this pair (duplicate points or a
            // non-Mercer polynomial setting); leave it to another pairing.
            return false;
        }

        let alpha_j_raw = alpha_j_old + y_j * (e_i - e_j) / eta;
        // Raw survey features push eta up to 1e13 and alphas down to 1e-13,
        // so bound snapping is relative to the magnitudes in play.
        let scale = alpha_i_old
            .max(alpha_j_old)
            .max((alpha_j_raw - alpha_j_old).abs());
        let alpha_j_new = snap(alpha_j_raw.clamp(low, high), c_j, scale);

        // Progress is measured by how far the step moves the pair's margins
        // (eta * |delta alpha_j|), which does not depend on the kernel scale.
        if eta * (alpha_j_new - alpha_j_old).abs() < self.config.epsilon * self.config.epsilon {
            return false;
        }

        let alpha_i_new = snap(alpha_i_old + s * (alpha_j_old - alpha_j_new), c_i, scale);

        let delta_i = y_i * (alpha_i_new - alpha_i_old);
        let delta_j = y_j * (alpha_j_new - alpha_j_old);

        let b_old = state.b;
        let b_i = b_old - e_i - delta_i * k_ii - delta_j * k_ij;
        let b_j = b_old - e_j - delta_i * k_ij - delta_j * k_jj;
        let b_new = if alpha_i_new > 0.0 && alpha_i_new < c_i {
            b_i
        } else if alpha_j_new > 0.0 && alpha_j_new < c_j {
            b_j
        } else {
            (b_i + b_j) / 2.0
        };

        state.alpha[i] = alpha_i_new;
        state.alpha[j] = alpha_j_new;
        state.b = b_new;

        let delta_b = b_new - b_old;
        for k in 0..samples.len() {
            let k_ik = self.kernel_at(cache, samples, i, k);
            let k_jk = self.kernel_at(cache, samples, j, k);
            state.errors[k] += delta_i * k_ik + delta_j * k_jk + delta_b;
        }

        true
    }

    /// Average the bias implied by every free support vector
    ///
    /// For a free sample, f(x_i) = y_i exactly, so b = b_current - E_i.
    /// Without free samples the incrementally maintained bias is kept.
    fn calculate_bias(&self, state: &SolverState) -> f64 {
        let free: Vec<f64> = (0..state.alpha.len())
            .filter(|&i| state.is_free(i))
            .map(|i| state.b - state.errors[i])
            .collect();

        if free.is_empty() {
            state.b
        } else {
            free.iter().sum::<f64>() / free.len() as f64
        }
    }
}

/// Clamp tiny numerical drift onto the box bounds [0, upper]
///
/// `scale` is the largest alpha magnitude involved in producing `alpha`;
/// values below `BOUND_EPS * scale` are cancellation residue.
fn snap(alpha: f64, upper: f64, scale: f64) -> f64 {
    if alpha < BOUND_EPS * scale {
        0.0
    } else if alpha > upper - BOUND_EPS * upper {
        upper
    } else {
        alpha
    }
}
