use linfa::ParamGuard;

use crate::error::{Error, Result};

/// How the training rows of every member tree are drawn from the training set
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Sampling {
    /// As many rows as the training set holds, drawn with replacement
    Bootstrap,
    /// The given proportion of rows, drawn without replacement
    Subsample(f64),
}

/// The set of hyperparameters that can be specified for fitting a [forest](crate::ensemble::Forest).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForestValidParams {
    n_trees: usize,
    max_depth: Option<usize>,
    feature_subsample: f32,
    sampling: Sampling,
    seed: u64,
}

impl ForestValidParams {
    pub fn n_trees(&self) -> usize {
        self.n_trees
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    pub fn feature_subsample(&self) -> f32 {
        self.feature_subsample
    }

    pub fn sampling(&self) -> Sampling {
        self.sampling
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForestParams(ForestValidParams);

impl ForestParams {
    /// Defaults are provided if the optional parameters are not specified:
    /// * `max_depth = None`
    /// * `feature_subsample = 1.0`
    /// * `sampling = Sampling::Bootstrap`
    /// * `seed = 0`
    pub fn new(n_trees: usize) -> Self {
        Self(ForestValidParams {
            n_trees,
            max_depth: None,
            feature_subsample: 1.0,
            sampling: Sampling::Bootstrap,
            seed: 0,
        })
    }

    /// Sets the optional depth limit shared by all member trees
    pub fn max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.0.max_depth = max_depth;
        self
    }

    /// Sets the proportion of features every member tree is trained on
    pub fn feature_subsample(mut self, ratio: f32) -> Self {
        self.0.feature_subsample = ratio;
        self
    }

    /// Sets the way training rows are drawn for every member tree
    pub fn sampling(mut self, sampling: Sampling) -> Self {
        self.0.sampling = sampling;
        self
    }

    /// Sets the seed of the generator driving row and feature sampling
    pub fn seed(mut self, seed: u64) -> Self {
        self.0.seed = seed;
        self
    }
}

impl ParamGuard for ForestParams {
    type Checked = ForestValidParams;
    type Error = Error;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if self.0.n_trees == 0 {
            Err(Error::Parameters(
                "number of trees should be at least one, but was 0".into(),
            ))
        } else if !(self.0.feature_subsample > 0.0 && self.0.feature_subsample <= 1.0) {
            Err(Error::Parameters(format!(
                "feature subsample should be greater than zero and at most one, but was {}",
                self.0.feature_subsample
            )))
        } else if let Sampling::Subsample(ratio) = self.0.sampling {
            if ratio > 0.0 && ratio <= 1.0 {
                Ok(&self.0)
            } else {
                Err(Error::Parameters(format!(
                    "row subsample should be greater than zero and at most one, but was {}",
                    ratio
                )))
            }
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}
