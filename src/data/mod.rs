//! Survey data loading and partitioning

pub mod dataset;
pub mod partition;

pub use self::dataset::*;
pub use self::partition::*;
