//! Candidate hyperparameter grids

use crate::core::{Result, SVMError};
use crate::kernel::{Hyperparameters, KernelKind};
use serde::Serialize;

/// Value lists whose cartesian product forms the tuning candidates
///
/// Only the lists a kernel reads are expanded; the others are pinned to
/// [`Hyperparameters::default`] so that a linear grid over four costs
/// yields four candidates, not four times the polynomial settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterGrid {
    pub costs: Vec<f64>,
    pub degrees: Vec<u32>,
    pub coef0s: Vec<f64>,
    pub gammas: Vec<f64>,
}

impl Default for ParameterGrid {
    fn default() -> Self {
        Self {
            costs: vec![0.1, 1.0, 10.0, 100.0],
            degrees: vec![2, 3],
            coef0s: vec![0.0, 1.0],
            gammas: vec![0.01, 0.1, 1.0],
        }
    }
}

impl ParameterGrid {
    /// A grid holding exactly one candidate
    pub fn single(params: Hyperparameters) -> Self {
        Self {
            costs: vec![params.cost],
            degrees: vec![params.degree],
            coef0s: vec![params.coef0],
            gammas: vec![params.gamma],
        }
    }

    pub fn with_costs(mut self, costs: Vec<f64>) -> Self {
        self.costs = costs;
        self
    }

    pub fn with_degrees(mut self, degrees: Vec<u32>) -> Self {
        self.degrees = degrees;
        self
    }

    pub fn with_coef0s(mut self, coef0s: Vec<f64>) -> Self {
        self.coef0s = coef0s;
        self
    }

    pub fn with_gammas(mut self, gammas: Vec<f64>) -> Self {
        self.gammas = gammas;
        self
    }

    /// Expand into validated candidates for `kind`, cost varying slowest
    pub fn candidates(&self, kind: KernelKind) -> Result<Vec<Hyperparameters>> {
        let defaults = Hyperparameters::default();
        let pick = |used: bool, values: &[f64], fallback: f64, name: &str| -> Result<Vec<f64>> {
            if !used {
                return Ok(vec![fallback]);
            }
            if values.is_empty() {
                return Err(SVMError::InvalidParameter(format!(
                    "{kind} grid needs at least one {name} value"
                )));
            }
            Ok(values.to_vec())
        };

        let costs = pick(true, &self.costs, defaults.cost, "cost")?;
        let coef0s = pick(kind.uses_coef0(), &self.coef0s, defaults.coef0, "coef0")?;
        let gammas = pick(kind.uses_gamma(), &self.gammas, defaults.gamma, "gamma")?;
        let degrees = if kind.uses_degree() {
            if self.degrees.is_empty() {
                return Err(SVMError::InvalidParameter(format!(
                    "{kind} grid needs at least one degree value"
                )));
            }
            self.degrees.clone()
        } else {
            vec![defaults.degree]
        };

        let mut candidates = Vec::with_capacity(costs.len() * degrees.len() * coef0s.len() * gammas.len());
        for &cost in &costs {
            for &degree in &degrees {
                for &coef0 in &coef0s {
                    for &gamma in &gammas {
                        let params = Hyperparameters {
                            cost,
                            degree,
                            coef0,
                            gamma,
                        };
                        params.validate(kind)?;
                        candidates.push(params);
                    }
                }
            }
        }
        Ok(candidates)
    }
}
