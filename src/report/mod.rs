//! Rendering and export of analysis results

pub mod boundary;
pub mod export;
pub mod json;
pub mod table;

pub use boundary::{BoundaryCell, DecisionBoundarySlice};
pub use export::{roc_file_name, save_run_roc, write_roc_csv};
pub use json::{AnalysisReport, ReportMetadata};
pub use table::{render_confusion, render_run, render_summary};
