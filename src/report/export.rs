//! CSV export of ROC curves for external plotting

use crate::core::Result;
use crate::metrics::RocCurve;
use crate::pipeline::ModelRun;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write ROC points as `false_positive_rate,true_positive_rate,threshold`
pub fn write_roc_csv<W: Write>(curve: &RocCurve, writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for point in curve.points() {
        writer.serialize(point)?;
    }
    writer.flush()?;
    Ok(())
}

/// `<dataset>_<kernel>_<subset>_roc.csv`
pub fn roc_file_name(run: &ModelRun, subset: &str) -> String {
    format!("{}_{}_{subset}_roc.csv", run.dataset, run.kind)
}

/// Write train and test ROC files for a run into `dir`
pub fn save_run_roc<P: AsRef<Path>>(run: &ModelRun, dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(2);
    for (subset, evaluation) in [("train", &run.evaluation.train), ("test", &run.evaluation.test)] {
        let path = dir.join(roc_file_name(run, subset));
        write_roc_csv(&evaluation.roc, File::create(&path)?)?;
        written.push(path);
    }
    Ok(written)
}
