//! Classifier construction
//!
//! Every classifier implements the [`Classifier`] capability set: it is fitted exactly once and
//! then queried for predictions. Probability estimates are optional, only the ensembles
//! provide them. The [`ClassifierFactory`] turns a kind selector and a validated set of
//! hyperparameters into an unfit classifier.
use std::fmt;
use std::str::FromStr;

use linfa::{Dataset, ParamGuard};
use ndarray::{Array1, Array2, Ix1};

use crate::error::{Error, Result};

mod hyperparams;
mod models;

pub use hyperparams::*;
pub use models::*;

/// The classifiers the factory knows how to build
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClassifierKind {
    DecisionTree,
    RandomForest,
    ExtraTrees,
}

impl ClassifierKind {
    /// Short selector used on the command line
    pub fn selector(&self) -> &'static str {
        match self {
            ClassifierKind::DecisionTree => "dt",
            ClassifierKind::RandomForest => "rf",
            ClassifierKind::ExtraTrees => "erf",
        }
    }

    pub fn supports_probabilities(&self) -> bool {
        !matches!(self, ClassifierKind::DecisionTree)
    }
}

impl fmt::Display for ClassifierKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ClassifierKind::DecisionTree => "decision tree",
            ClassifierKind::RandomForest => "random forest",
            ClassifierKind::ExtraTrees => "extra trees",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ClassifierKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dt" | "decision-tree" => Ok(ClassifierKind::DecisionTree),
            "rf" | "random-forest" => Ok(ClassifierKind::RandomForest),
            "erf" | "extra-trees" => Ok(ClassifierKind::ExtraTrees),
            other => Err(Error::InvalidArgument(format!(
                "unknown classifier `{}`, expected one of dt, rf, erf",
                other
            ))),
        }
    }
}

/// A trainable predictor
///
/// The lifecycle is strict: `fit` succeeds once, a second call returns
/// [`Error::AlreadyFitted`], and queries before fitting return [`Error::NotFitted`].
pub trait Classifier {
    fn kind(&self) -> ClassifierKind;

    fn is_fitted(&self) -> bool;

    fn fit(&mut self, dataset: &Dataset<f64, usize, Ix1>) -> Result<()>;

    /// One predicted label per row of `records`
    fn predict(&self, records: &Array2<f64>) -> Result<Array1<usize>>;

    /// Probability of every class for each row of `records`
    ///
    /// Optional capability, the default implementation reports that it is missing.
    fn predict_proba(&self, records: &Array2<f64>) -> Result<Array2<f64>> {
        let _ = records;
        Err(Error::ProbabilitiesUnsupported(self.kind()))
    }
}

/// Builds unfit classifiers sharing one set of hyperparameters
#[derive(Clone, Copy, Debug)]
pub struct ClassifierFactory {
    params: ClassifierValidParams,
}

impl ClassifierFactory {
    pub fn new(params: ClassifierParams) -> Result<Self> {
        Ok(ClassifierFactory {
            params: params.check()?,
        })
    }

    pub fn params(&self) -> &ClassifierValidParams {
        &self.params
    }

    pub fn build(&self, kind: ClassifierKind) -> Result<Box<dyn Classifier>> {
        log::debug!("building {} with {:?}", kind, self.params);

        Ok(match kind {
            ClassifierKind::DecisionTree => Box::new(TreeClassifier::new(&self.params)),
            ClassifierKind::RandomForest | ClassifierKind::ExtraTrees => {
                Box::new(EnsembleClassifier::new(kind, &self.params)?)
            }
        })
    }

    /// Build from a textual selector, unknown selectors are an [`Error::InvalidArgument`]
    pub fn from_selector(&self, selector: &str) -> Result<Box<dyn Classifier>> {
        self.build(selector.parse()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ensemble::Sampling;
    use ndarray::array;

    fn separable() -> Dataset<f64, usize, Ix1> {
        Dataset::new(
            array![[1., 1.], [1., 2.], [1., 3.], [5., 5.], [5., 6.], [5., 7.]],
            array![0, 0, 0, 1, 1, 1],
        )
    }

    #[test]
    fn selectors_round_trip() -> Result<()> {
        for kind in &[
            ClassifierKind::DecisionTree,
            ClassifierKind::RandomForest,
            ClassifierKind::ExtraTrees,
        ] {
            assert_eq!(kind.selector().parse::<ClassifierKind>()?, *kind);
        }
        assert_eq!(
            "extra-trees".parse::<ClassifierKind>()?,
            ClassifierKind::ExtraTrees
        );

        Ok(())
    }

    #[test]
    fn unknown_selector_is_rejected() -> Result<()> {
        let factory = ClassifierFactory::new(ClassifierParams::default())?;
        assert!(matches!(
            factory.from_selector("svm"),
            Err(Error::InvalidArgument(_))
        ));

        Ok(())
    }

    #[test]
    fn invalid_hyperparameters_are_rejected() {
        for params in &[
            ClassifierParams::new().max_depth(Some(0)),
            ClassifierParams::new().n_estimators(0),
            ClassifierParams::new().subsample(0.0),
            ClassifierParams::new().subsample(1.2),
            ClassifierParams::new().feature_subsample(0.0),
        ] {
            assert!(matches!(
                ClassifierFactory::new(*params),
                Err(Error::Parameters(_))
            ));
        }
    }

    #[test]
    fn ensembles_share_hyperparameters() -> Result<()> {
        let factory = ClassifierFactory::new(ClassifierParams::new().n_estimators(7).seed(3))?;

        let rf = factory.from_selector("rf")?;
        let erf = factory.from_selector("erf")?;
        assert_eq!(rf.kind(), ClassifierKind::RandomForest);
        assert_eq!(erf.kind(), ClassifierKind::ExtraTrees);
        assert_ne!(rf.kind(), erf.kind());

        let rf = EnsembleClassifier::new(ClassifierKind::RandomForest, factory.params())?;
        let erf = EnsembleClassifier::new(ClassifierKind::ExtraTrees, factory.params())?;
        for params in &[rf.params(), erf.params()] {
            assert_eq!(params.n_trees(), 7);
            assert_eq!(params.max_depth(), Some(4));
            assert_eq!(params.seed(), 3);
        }
        assert_eq!(rf.params().sampling(), Sampling::Bootstrap);
        assert_eq!(erf.params().sampling(), Sampling::Subsample(0.7));

        Ok(())
    }

    #[test]
    fn decision_tree_is_not_an_ensemble() {
        let params = ClassifierParams::new().check_unwrap();
        assert!(EnsembleClassifier::new(ClassifierKind::DecisionTree, &params).is_err());
    }

    #[test]
    fn lifecycle_is_enforced() -> Result<()> {
        let factory = ClassifierFactory::new(ClassifierParams::new().n_estimators(5))?;
        let dataset = separable();

        for kind in &[
            ClassifierKind::DecisionTree,
            ClassifierKind::RandomForest,
            ClassifierKind::ExtraTrees,
        ] {
            let mut classifier = factory.build(*kind)?;
            assert!(!classifier.is_fitted());
            assert!(matches!(
                classifier.predict(&dataset.records),
                Err(Error::NotFitted)
            ));

            classifier.fit(&dataset)?;
            assert!(classifier.is_fitted());
            assert!(matches!(
                classifier.fit(&dataset),
                Err(Error::AlreadyFitted)
            ));

            assert!(matches!(
                classifier.predict(&array![[1., 2., 3.]]),
                Err(Error::Parameters(_))
            ));
        }

        Ok(())
    }

    #[test]
    fn decision_tree_has_no_probabilities() -> Result<()> {
        let factory = ClassifierFactory::new(ClassifierParams::default())?;
        let mut tree = factory.build(ClassifierKind::DecisionTree)?;
        tree.fit(&separable())?;

        assert!(!tree.kind().supports_probabilities());
        assert!(matches!(
            tree.predict_proba(&array![[1., 1.]]),
            Err(Error::ProbabilitiesUnsupported(ClassifierKind::DecisionTree))
        ));
        assert_eq!(tree.predict(&array![[1., 1.5], [5., 6.5]])?, array![0, 1]);

        Ok(())
    }
}
