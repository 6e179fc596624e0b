//! Run configuration
//!
//! Both programs start from their own defaults ([`PipelineConfig::decision_tree`] and
//! [`PipelineConfig::ensemble`]). A TOML file may override any subset of the fields:
//!
//! ```toml
//! input = "data/data_random_forests.txt"
//! class_names = ["Class-0", "Class-1", "Class-2"]
//! plot_dir = "plots"
//! confidence_points = [[5.0, 5.0], [3.0, 6.0]]
//!
//! [split]
//! test_fraction = 0.25
//! seed = 5
//!
//! [classifier]
//! max_depth = 4
//! n_estimators = 100
//! seed = 0
//! subsample = 0.7
//! feature_subsample = 1.0
//! ```
use std::path::{Path, PathBuf};

use ndarray::Array2;
use serde::Deserialize;

use crate::classifier::ClassifierParams;
use crate::error::{Error, Result};

/// Parameters of the train/test split
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitParams {
    /// Fraction of the records held out for testing, strictly between zero and one
    pub test_fraction: f64,
    /// Seed of the shuffle assigning records to the two sets
    pub seed: u64,
}

impl Default for SplitParams {
    fn default() -> Self {
        SplitParams {
            test_fraction: 0.25,
            seed: 5,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PipelineConfig {
    /// Labeled input data
    pub input: PathBuf,
    /// Display names of the classes, label `i` is shown as `class_names[i]`.
    /// Derived as `Class-<label>` from the data if missing.
    pub class_names: Option<Vec<String>>,
    pub split: SplitParams,
    pub classifier: ClassifierParams,
    /// Synthetic points whose class probabilities are reported after training
    pub confidence_points: Vec<Vec<f64>>,
    /// Directory receiving the figures, `None` disables plotting
    pub plot_dir: Option<PathBuf>,
}

impl PipelineConfig {
    /// Single decision tree of depth 4, 20% of the data held out
    pub fn decision_tree() -> Self {
        PipelineConfig {
            input: PathBuf::from("data/data_decision_trees.txt"),
            class_names: None,
            split: SplitParams {
                test_fraction: 0.2,
                seed: 5,
            },
            classifier: ClassifierParams::new().max_depth(Some(4)).seed(0),
            confidence_points: Vec::new(),
            plot_dir: Some(PathBuf::from("plots")),
        }
    }

    /// 100 trees of depth 4, 25% of the data held out and six confidence query points
    pub fn ensemble() -> Self {
        PipelineConfig {
            input: PathBuf::from("data/data_random_forests.txt"),
            class_names: None,
            split: SplitParams {
                test_fraction: 0.25,
                seed: 5,
            },
            classifier: ClassifierParams::new()
                .n_estimators(100)
                .max_depth(Some(4))
                .seed(0),
            confidence_points: vec![
                vec![5., 5.],
                vec![3., 6.],
                vec![6., 4.],
                vec![7., 2.],
                vec![4., 4.],
                vec![5., 2.],
            ],
            plot_dir: Some(PathBuf::from("plots")),
        }
    }

    /// Override fields with the ones set in the TOML file at `path`
    pub fn with_file<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("applying configuration from {}", path.display());

        self.with_toml(&content)
    }

    /// Override fields with the ones set in a TOML document
    pub fn with_toml(mut self, content: &str) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|err| Error::Config(err.to_string()))?;

        if let Some(input) = file.input {
            self.input = input;
        }
        if let Some(class_names) = file.class_names {
            self.class_names = Some(class_names);
        }
        if let Some(points) = file.confidence_points {
            self.confidence_points = points;
        }
        if let Some(plot_dir) = file.plot_dir {
            self.plot_dir = Some(plot_dir);
        }
        if let Some(split) = file.split {
            self.split.test_fraction = split.test_fraction.unwrap_or(self.split.test_fraction);
            self.split.seed = split.seed.unwrap_or(self.split.seed);
        }
        if let Some(section) = file.classifier {
            self.classifier = section.apply(self.classifier);
        }

        Ok(self)
    }

    /// Confidence query points as a matrix with one row per point
    pub fn confidence_matrix(&self) -> Result<Array2<f64>> {
        let nfeatures = self.confidence_points.first().map_or(0, Vec::len);
        if let Some(point) = self
            .confidence_points
            .iter()
            .find(|point| point.len() != nfeatures)
        {
            return Err(Error::Config(format!(
                "confidence point {:?} does not have {} coordinates",
                point, nfeatures
            )));
        }

        let values = self.confidence_points.iter().flatten().copied().collect();
        Ok(
            Array2::from_shape_vec((self.confidence_points.len(), nfeatures), values)
                .map_err(linfa::error::Error::from)?,
        )
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    input: Option<PathBuf>,
    class_names: Option<Vec<String>>,
    confidence_points: Option<Vec<Vec<f64>>>,
    plot_dir: Option<PathBuf>,
    split: Option<SplitSection>,
    classifier: Option<ClassifierSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SplitSection {
    test_fraction: Option<f64>,
    seed: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ClassifierSection {
    max_depth: Option<usize>,
    n_estimators: Option<usize>,
    seed: Option<u64>,
    subsample: Option<f64>,
    feature_subsample: Option<f32>,
}

impl ClassifierSection {
    fn apply(self, mut params: ClassifierParams) -> ClassifierParams {
        if let Some(max_depth) = self.max_depth {
            params = params.max_depth(Some(max_depth));
        }
        if let Some(n_estimators) = self.n_estimators {
            params = params.n_estimators(n_estimators);
        }
        if let Some(seed) = self.seed {
            params = params.seed(seed);
        }
        if let Some(subsample) = self.subsample {
            params = params.subsample(subsample);
        }
        if let Some(feature_subsample) = self.feature_subsample {
            params = params.feature_subsample(feature_subsample);
        }
        params
    }
}
