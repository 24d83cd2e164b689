//! Two-feature slices through a decision surface
//!
//! A slice varies two features over their observed range and pins every
//! other feature to its median in the reference table, which shows the
//! shape of the surface near typical respondents.

use crate::core::{Label, Result, SVMError, SVMModel};
use crate::data::Dataset;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// One grid point of a slice
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundaryCell {
    pub x: f64,
    pub y: f64,
    pub decision_value: f64,
    pub label: Label,
}

/// Decision values over a `resolution x resolution` grid
#[derive(Debug, Clone, Serialize)]
pub struct DecisionBoundarySlice {
    pub x_feature: String,
    pub y_feature: String,
    /// Values held for every other feature, by name
    pub fixed: Vec<(String, f64)>,
    pub resolution: usize,
    /// Row-major, `y` outer and `x` inner
    pub cells: Vec<BoundaryCell>,
}

impl DecisionBoundarySlice {
    pub fn compute<M: SVMModel>(
        model: &M,
        dataset: &Dataset,
        x_feature: &str,
        y_feature: &str,
        resolution: usize,
    ) -> Result<Self> {
        if resolution < 2 {
            return Err(SVMError::InvalidParameter(format!(
                "Slice resolution must be at least 2, got: {resolution}"
            )));
        }
        if dataset.is_empty() {
            return Err(SVMError::EmptyDataset);
        }
        let column = |name: &str| {
            dataset.feature_index(name).ok_or_else(|| SVMError::MissingColumn {
                column: name.to_string(),
                available: dataset.schema().features.join(", "),
            })
        };
        let xi = column(x_feature)?;
        let yi = column(y_feature)?;
        if xi == yi {
            return Err(SVMError::InvalidParameter(
                "Slice features must differ".to_string(),
            ));
        }

        let mut base: Vec<f64> = (0..dataset.dim())
            .map(|i| median(dataset.feature_column(i)))
            .collect();
        let fixed = dataset
            .schema()
            .features
            .iter()
            .zip(&base)
            .enumerate()
            .filter(|&(i, _)| i != xi && i != yi)
            .map(|(_, (name, &value))| (name.clone(), value))
            .collect();

        let xs = linspace(dataset.feature_column(xi), resolution);
        let ys = linspace(dataset.feature_column(yi), resolution);

        let mut cells = Vec::with_capacity(resolution * resolution);
        for &y in &ys {
            for &x in &xs {
                base[xi] = x;
                base[yi] = y;
                let prediction = model.predict(&base);
                cells.push(BoundaryCell {
                    x,
                    y,
                    decision_value: prediction.decision_value,
                    label: prediction.label,
                });
            }
        }

        Ok(Self {
            x_feature: x_feature.to_string(),
            y_feature: y_feature.to_string(),
            fixed,
            resolution,
            cells,
        })
    }

    /// Write the cells as CSV with the feature names as column headers
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record([
            self.x_feature.as_str(),
            self.y_feature.as_str(),
            "decision_value",
            "label",
        ])?;
        for cell in &self.cells {
            writer.write_record([
                cell.x.to_string(),
                cell.y.to_string(),
                cell.decision_value.to_string(),
                cell.label.to_string(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn save_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.write_csv(File::create(path)?)
    }
}

fn median(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    let n = values.len();
    if n == 0 {
        0.0
    } else if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    }
}

/// Evenly spaced points spanning the observed range
fn linspace(values: Vec<f64>, n: usize) -> Vec<f64> {
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let step = (hi - lo) / (n - 1) as f64;
    (0..n).map(|i| lo + step * i as f64).collect()
}
