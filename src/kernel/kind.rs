//! Runtime kernel selection
//!
//! The tuner and the analysis pipeline pick kernels from configuration, so
//! the concrete kernel types are wrapped in an enum that dispatches at
//! runtime while the solver stays generic.

use crate::core::{Result, SVMError};
use crate::kernel::{Kernel, LinearKernel, PolynomialKernel, RBFKernel};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shape of the decision surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KernelKind {
    Linear,
    Polynomial,
    Radial,
}

impl KernelKind {
    pub const ALL: [KernelKind; 3] = [
        KernelKind::Linear,
        KernelKind::Polynomial,
        KernelKind::Radial,
    ];

    pub fn uses_degree(self) -> bool {
        matches!(self, KernelKind::Polynomial)
    }

    pub fn uses_coef0(self) -> bool {
        matches!(self, KernelKind::Polynomial)
    }

    pub fn uses_gamma(self) -> bool {
        matches!(self, KernelKind::Polynomial | KernelKind::Radial)
    }
}

impl fmt::Display for KernelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KernelKind::Linear => "linear",
            KernelKind::Polynomial => "polynomial",
            KernelKind::Radial => "radial",
        };
        write!(f, "{name}")
    }
}

/// One candidate point of the tuning grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameters {
    /// Margin penalty C
    pub cost: f64,
    /// Polynomial degree
    pub degree: u32,
    /// Polynomial offset
    pub coef0: f64,
    /// Kernel bandwidth / dot-product scale
    pub gamma: f64,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            cost: 1.0,
            degree: 3,
            coef0: 0.0,
            gamma: 1.0,
        }
    }
}

impl Hyperparameters {
    /// Defaults with gamma = 1 / n_features
    pub fn for_features(n_features: usize) -> Self {
        Self {
            gamma: 1.0 / n_features.max(1) as f64,
            ..Self::default()
        }
    }

    /// Check the parameters the kernel kind actually reads
    pub fn validate(&self, kind: KernelKind) -> Result<()> {
        if !(self.cost.is_finite() && self.cost > 0.0) {
            return Err(SVMError::InvalidParameter(format!(
                "Cost must be positive, got: {}",
                self.cost
            )));
        }
        if kind.uses_degree() && self.degree == 0 {
            return Err(SVMError::InvalidParameter(
                "Polynomial degree must be positive".to_string(),
            ));
        }
        if kind.uses_gamma() && !(self.gamma.is_finite() && self.gamma > 0.0) {
            return Err(SVMError::InvalidParameter(format!(
                "Gamma must be positive, got: {}",
                self.gamma
            )));
        }
        if kind.uses_coef0() && !self.coef0.is_finite() {
            return Err(SVMError::InvalidParameter(format!(
                "coef0 must be finite, got: {}",
                self.coef0
            )));
        }
        Ok(())
    }

    /// Human-readable form listing only the parameters the kernel reads
    pub fn describe(&self, kind: KernelKind) -> String {
        let mut parts = vec![format!("cost={}", self.cost)];
        if kind.uses_degree() {
            parts.push(format!("degree={}", self.degree));
        }
        if kind.uses_coef0() {
            parts.push(format!("coef0={}", self.coef0));
        }
        if kind.uses_gamma() {
            parts.push(format!("gamma={}", self.gamma));
        }
        parts.join(", ")
    }
}

/// Kernel chosen at runtime
#[derive(Debug, Clone, Copy)]
pub enum SvmKernel {
    Linear(LinearKernel),
    Polynomial(PolynomialKernel),
    Radial(RBFKernel),
}

impl SvmKernel {
    /// Build the kernel for `kind` after validating `params`
    pub fn build(kind: KernelKind, params: &Hyperparameters) -> Result<Self> {
        params.validate(kind)?;
        Ok(match kind {
            KernelKind::Linear => SvmKernel::Linear(LinearKernel::new()),
            KernelKind::Polynomial => SvmKernel::Polynomial(PolynomialKernel::new(
                params.degree,
                params.gamma,
                params.coef0,
            )),
            KernelKind::Radial => SvmKernel::Radial(RBFKernel::new(params.gamma)),
        })
    }

    pub fn kind(&self) -> KernelKind {
        match self {
            SvmKernel::Linear(_) => KernelKind::Linear,
            SvmKernel::Polynomial(_) => KernelKind::Polynomial,
            SvmKernel::Radial(_) => KernelKind::Radial,
        }
    }
}

impl Kernel for SvmKernel {
    fn compute(&self, x: &[f64], y: &[f64]) -> f64 {
        match self {
            SvmKernel::Linear(k) => k.compute(x, y),
            SvmKernel::Polynomial(k) => k.compute(x, y),
            SvmKernel::Radial(k) => k.compute(x, y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_matches_kind() {
        let params = Hyperparameters::default();
        for kind in KernelKind::ALL {
            let kernel = SvmKernel::build(kind, &params).unwrap();
            assert_eq!(kernel.kind(), kind);
        }
    }

    #[test]
    fn test_dispatch_matches_concrete_kernel() {
        let params = Hyperparameters {
            cost: 1.0,
            degree: 2,
            coef0: 1.0,
            gamma: 0.5,
        };
        let x = [1.0, 2.0];
        let y = [3.0, -1.0];

        let poly = SvmKernel::build(KernelKind::Polynomial, &params).unwrap();
        assert_eq!(
            poly.compute(&x, &y),
            PolynomialKernel::new(2, 0.5, 1.0).compute(&x, &y)
        );

        let radial = SvmKernel::build(KernelKind::Radial, &params).unwrap();
        assert_eq!(radial.compute(&x, &y), RBFKernel::new(0.5).compute(&x, &y));
    }

    #[test]
    fn test_validation_only_checks_used_parameters() {
        let params = Hyperparameters {
            cost: 1.0,
            degree: 0,
            coef0: 0.0,
            gamma: -1.0,
        };
        // Linear ignores degree and gamma
        assert!(params.validate(KernelKind::Linear).is_ok());
        assert!(params.validate(KernelKind::Radial).is_err());
        assert!(params.validate(KernelKind::Polynomial).is_err());

        let bad_cost = Hyperparameters {
            cost: 0.0,
            ..Hyperparameters::default()
        };
        assert!(matches!(
            SvmKernel::build(KernelKind::Linear, &bad_cost),
            Err(SVMError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_describe_lists_relevant_parameters() {
        let params = Hyperparameters::default();
        assert_eq!(params.describe(KernelKind::Linear), "cost=1");
        assert_eq!(params.describe(KernelKind::Radial), "cost=1, gamma=1");
        assert!(params
            .describe(KernelKind::Polynomial)
            .contains("degree=3"));
    }

    #[test]
    fn test_for_features_gamma() {
        assert_eq!(Hyperparameters::for_features(4).gamma, 0.25);
    }
}
