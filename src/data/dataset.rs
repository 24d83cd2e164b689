//! Survey dataset loading
//!
//! Each cleaned survey table is a CSV file with a header row: the numeric
//! feature columns plus one label column named for the condition. The
//! loader checks the header against a [`Schema`] before reading any rows,
//! so a table from a different cleaning step fails up front instead of
//! producing silently misaligned features.

use crate::core::{Label, Result, SVMError, Sample};
use serde::Serialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Expected columns of a survey table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    /// Feature column names, in model order
    pub features: Vec<String>,
    /// Outcome column name
    pub label: String,
}

impl Schema {
    /// Continuous variables shared by every cleaned survey table
    pub const SURVEY_FEATURES: [&'static str; 6] = [
        "bmi",
        "weight",
        "height",
        "age",
        "hours_worked",
        "alcohol_days",
    ];

    pub fn new<S: Into<String>>(features: Vec<String>, label: S) -> Self {
        Self {
            features,
            label: label.into(),
        }
    }

    /// Standard survey schema with the label column named for `condition`
    pub fn survey(condition: &str) -> Self {
        Self::new(
            Self::SURVEY_FEATURES.iter().map(|s| s.to_string()).collect(),
            condition,
        )
    }

    /// Total number of columns a conforming file has
    pub fn n_columns(&self) -> usize {
        self.features.len() + 1
    }
}

/// Number of records per label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LabelCounts {
    pub present: usize,
    pub absent: usize,
}

impl LabelCounts {
    pub fn get(&self, label: Label) -> usize {
        match label {
            Label::Present => self.present,
            Label::Absent => self.absent,
        }
    }

    pub fn total(&self) -> usize {
        self.present + self.absent
    }
}

/// Ordered records sharing one schema
#[derive(Debug, Clone)]
pub struct Dataset {
    name: String,
    schema: Schema,
    samples: Vec<Sample>,
}

impl Dataset {
    /// Build a dataset from samples, checking every row has one value per feature
    pub fn new<S: Into<String>>(name: S, schema: Schema, samples: Vec<Sample>) -> Result<Self> {
        let dim = schema.features.len();
        if let Some(bad) = samples.iter().find(|s| s.features.len() != dim) {
            return Err(SVMError::DimensionMismatch {
                expected: dim,
                actual: bad.features.len(),
            });
        }
        Ok(Self {
            name: name.into(),
            schema,
            samples,
        })
    }

    /// Load a dataset from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P, schema: &Schema) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| schema.label.clone());
        Self::from_reader(file, schema, name)
    }

    /// Load a dataset from any CSV byte stream
    pub fn from_reader<R: Read, S: Into<String>>(reader: R, schema: &Schema, name: S) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        if headers.len() != schema.n_columns() {
            return Err(SVMError::SchemaMismatch {
                expected: schema.n_columns(),
                actual: headers.len(),
            });
        }

        let position = |column: &str| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| SVMError::MissingColumn {
                    column: column.to_string(),
                    available: headers.iter().collect::<Vec<_>>().join(", "),
                })
        };
        let feature_cols = schema
            .features
            .iter()
            .map(|f| position(f.as_str()))
            .collect::<Result<Vec<_>>>()?;
        let label_col = position(schema.label.as_str())?;

        let mut samples = Vec::new();
        for record in reader.records() {
            let record = record?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();

            let features = feature_cols
                .iter()
                .zip(&schema.features)
                .map(|(&col, name)| {
                    let cell = &record[col];
                    cell.parse::<f64>().map_err(|_| {
                        SVMError::ParseError(format!(
                            "line {line}: column '{name}' has non-numeric value '{cell}'"
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            let cell = &record[label_col];
            let label = Label::parse(cell).ok_or_else(|| {
                SVMError::ParseError(format!(
                    "line {line}: column '{}' has unrecognised label '{cell}'",
                    schema.label
                ))
            })?;

            samples.push(Sample::new(features, label));
        }

        if samples.is_empty() {
            return Err(SVMError::EmptyDataset);
        }

        Self::new(name, schema.clone(), samples)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of features (dimensionality)
    pub fn dim(&self) -> usize {
        self.schema.features.len()
    }

    pub fn labels(&self) -> Vec<Label> {
        self.samples.iter().map(|s| s.label).collect()
    }

    pub fn label_counts(&self) -> LabelCounts {
        self.samples
            .iter()
            .fold(LabelCounts::default(), |mut counts, s| {
                match s.label {
                    Label::Present => counts.present += 1,
                    Label::Absent => counts.absent += 1,
                }
                counts
            })
    }

    /// The rarer label; ties go to `Present`
    pub fn minority_label(&self) -> Label {
        let counts = self.label_counts();
        if counts.absent < counts.present {
            Label::Absent
        } else {
            Label::Present
        }
    }

    pub fn majority_label(&self) -> Label {
        self.minority_label().other()
    }

    /// Position of a feature column by name
    pub fn feature_index(&self, name: &str) -> Option<usize> {
        self.schema.features.iter().position(|f| f == name)
    }

    /// All values of one feature column
    pub fn feature_column(&self, index: usize) -> Vec<f64> {
        self.samples.iter().map(|s| s.features[index]).collect()
    }

    /// Rows at `indices`, in the given order
    ///
    /// # Panics
    /// Panics if an index is out of bounds
    pub fn subset(&self, indices: &[usize]) -> Dataset {
        Dataset {
            name: self.name.clone(),
            schema: self.schema.clone(),
            samples: indices.iter().map(|&i| self.samples[i].clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "bmi,weight,height,age,hours_worked,alcohol_days,diabetes";

    fn load(body: &str) -> Result<Dataset> {
        let data = format!("{HEADER}\n{body}");
        Dataset::from_reader(Cursor::new(data), &Schema::survey("diabetes"), "diabetes")
    }

    #[test]
    fn test_load_basic() {
        let dataset = load("27.1,180,70,45,40,12,1\n22.0,140,65,30,35,0,0\n").unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.dim(), 6);
        assert_eq!(dataset.name(), "diabetes");
        assert_eq!(
            dataset.samples()[0].features,
            vec![27.1, 180.0, 70.0, 45.0, 40.0, 12.0]
        );
        assert_eq!(dataset.labels(), vec![Label::Present, Label::Absent]);
    }

    #[test]
    fn test_columns_matched_by_name() {
        let data = "diabetes,alcohol_days,hours_worked,age,height,weight,bmi\nyes,12,40,45,70,180,27.1\n";
        let dataset =
            Dataset::from_reader(Cursor::new(data), &Schema::survey("diabetes"), "d").unwrap();
        assert_eq!(
            dataset.samples()[0].features,
            vec![27.1, 180.0, 70.0, 45.0, 40.0, 12.0]
        );
        assert_eq!(dataset.samples()[0].label, Label::Present);
    }

    #[test]
    fn test_schema_mismatch() {
        let data = "bmi,weight,diabetes\n1,2,0\n";
        let result = Dataset::from_reader(Cursor::new(data), &Schema::survey("diabetes"), "d");
        assert!(matches!(
            result,
            Err(SVMError::SchemaMismatch {
                expected: 7,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_missing_label_column() {
        let data = format!("{HEADER}\n1,2,3,4,5,6,0\n");
        let result = Dataset::from_reader(Cursor::new(data), &Schema::survey("cancer"), "c");
        match result {
            Err(SVMError::MissingColumn { column, .. }) => assert_eq!(column, "cancer"),
            other => panic!("expected missing column, got {other:?}"),
        }
    }

    #[test]
    fn test_ragged_row_is_rejected() {
        let result = load("27.1,180,70,45,40,12,1\n22.0,140,65\n");
        assert!(matches!(result, Err(SVMError::Csv(_))));
    }

    #[test]
    fn test_bad_values() {
        let result = load("27.1,abc,70,45,40,12,1\n");
        match result {
            Err(SVMError::ParseError(msg)) => assert!(msg.contains("weight"), "{msg}"),
            other => panic!("expected parse error, got {other:?}"),
        }

        assert!(matches!(
            load("27.1,180,70,45,40,12,maybe\n"),
            Err(SVMError::ParseError(_))
        ));
    }

    #[test]
    fn test_empty_body() {
        assert!(matches!(load(""), Err(SVMError::EmptyDataset)));
    }

    #[test]
    fn test_missing_file() {
        let result = Dataset::from_csv("/nonexistent/cancer.csv", &Schema::survey("cancer"));
        assert!(matches!(result, Err(SVMError::IoError(_))));
    }

    #[test]
    fn test_label_counts_and_minority() {
        let dataset = load("1,1,1,1,1,1,0\n2,2,2,2,2,2,0\n3,3,3,3,3,3,1\n").unwrap();
        let counts = dataset.label_counts();
        assert_eq!(counts.absent, 2);
        assert_eq!(counts.present, 1);
        assert_eq!(counts.total(), 3);
        assert_eq!(dataset.minority_label(), Label::Present);
        assert_eq!(dataset.majority_label(), Label::Absent);
    }

    #[test]
    fn test_subset_and_columns() {
        let dataset = load("1,1,1,1,1,1,0\n2,2,2,2,2,2,0\n3,3,3,3,3,3,1\n").unwrap();
        let sub = dataset.subset(&[2, 0]);
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.samples()[0].features[0], 3.0);
        assert_eq!(sub.samples()[1].features[0], 1.0);

        assert_eq!(dataset.feature_index("age"), Some(3));
        assert_eq!(dataset.feature_column(0), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_new_checks_dimensions() {
        let schema = Schema::new(vec!["x".into(), "y".into()], "cancer");
        let result = Dataset::new("c", schema, vec![Sample::new(vec![1.0], Label::Absent)]);
        assert!(matches!(result, Err(SVMError::DimensionMismatch { .. })));
    }
}
