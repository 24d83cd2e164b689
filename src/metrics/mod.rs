//! Classification metrics: confusion counts and ROC curves

pub mod confusion;
pub mod roc;

pub use self::confusion::*;
pub use self::roc::*;
