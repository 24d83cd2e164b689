//! SVM solver implementations
//!
//! Sequential Minimal Optimization with per-sample box constraints, which
//! is what class-weighted training reduces to.

pub mod smo;

pub use self::smo::*;
