use linfa::ParamGuard;

use crate::ensemble::{Forest, ForestParams, Sampling};
use crate::error::{Error, Result};

/// Hyperparameters shared by every classifier the [factory](crate::classifier::ClassifierFactory)
/// builds.
///
/// The decision tree only uses `max_depth`; the ensembles use all of them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassifierValidParams {
    max_depth: Option<usize>,
    n_estimators: usize,
    seed: u64,
    subsample: f64,
    feature_subsample: f32,
}

impl ClassifierValidParams {
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    pub fn n_estimators(&self) -> usize {
        self.n_estimators
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn subsample(&self) -> f64 {
        self.subsample
    }

    pub fn feature_subsample(&self) -> f32 {
        self.feature_subsample
    }

    pub(crate) fn forest(&self, sampling: Sampling) -> ForestParams {
        Forest::params(self.n_estimators)
            .max_depth(self.max_depth)
            .feature_subsample(self.feature_subsample)
            .sampling(sampling)
            .seed(self.seed)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassifierParams(ClassifierValidParams);

impl ClassifierParams {
    /// Defaults are provided if the optional parameters are not specified:
    /// * `max_depth = Some(4)`
    /// * `n_estimators = 100`
    /// * `seed = 0`
    /// * `subsample = 0.7`
    /// * `feature_subsample = 1.0`
    pub fn new() -> Self {
        Self(ClassifierValidParams {
            max_depth: Some(4),
            n_estimators: 100,
            seed: 0,
            subsample: 0.7,
            feature_subsample: 1.0,
        })
    }

    /// Sets the optional depth limit of every tree
    pub fn max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.0.max_depth = max_depth;
        self
    }

    /// Sets the number of trees grown by the ensembles
    pub fn n_estimators(mut self, n_estimators: usize) -> Self {
        self.0.n_estimators = n_estimators;
        self
    }

    /// Sets the seed of the ensembles' random generator
    pub fn seed(mut self, seed: u64) -> Self {
        self.0.seed = seed;
        self
    }

    /// Sets the proportion of training rows each extra-trees member is fitted on
    pub fn subsample(mut self, subsample: f64) -> Self {
        self.0.subsample = subsample;
        self
    }

    /// Sets the proportion of features each ensemble member is fitted on
    pub fn feature_subsample(mut self, feature_subsample: f32) -> Self {
        self.0.feature_subsample = feature_subsample;
        self
    }
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self::new()
    }
}

impl ParamGuard for ClassifierParams {
    type Checked = ClassifierValidParams;
    type Error = Error;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if self.0.max_depth == Some(0) {
            Err(Error::Parameters(
                "maximum depth should be at least one".into(),
            ))
        } else if self.0.n_estimators == 0 {
            Err(Error::Parameters(
                "number of estimators should be at least one, but was 0".into(),
            ))
        } else if !(self.0.subsample > 0.0 && self.0.subsample <= 1.0) {
            Err(Error::Parameters(format!(
                "subsample should be greater than zero and at most one, but was {}",
                self.0.subsample
            )))
        } else if !(self.0.feature_subsample > 0.0 && self.0.feature_subsample <= 1.0) {
            Err(Error::Parameters(format!(
                "feature subsample should be greater than zero and at most one, but was {}",
                self.0.feature_subsample
            )))
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}
