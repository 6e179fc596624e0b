use linfa::{
    traits::{Fit, Predict},
    Dataset, ParamGuard,
};
use linfa_trees::{DecisionTree, DecisionTreeParams};
use ndarray::{Array1, Array2, Ix1};

use super::{Classifier, ClassifierKind, ClassifierValidParams};
use crate::ensemble::{Forest, ForestValidParams, Sampling};
use crate::error::{Error, Result};

fn check_nfeatures(expected: usize, records: &Array2<f64>) -> Result<()> {
    if records.ncols() == expected {
        Ok(())
    } else {
        Err(Error::Parameters(format!(
            "points have {} features, but the classifier was trained on {}",
            records.ncols(),
            expected
        )))
    }
}

fn check_not_empty(dataset: &Dataset<f64, usize, Ix1>) -> Result<()> {
    if dataset.records.nrows() == 0 {
        Err(Error::Parameters(
            "cannot fit a classifier on an empty training set".into(),
        ))
    } else {
        Ok(())
    }
}

/// A single decision tree, the tree itself is grown by `linfa-trees`
#[derive(Debug)]
pub struct TreeClassifier {
    params: DecisionTreeParams<f64, usize>,
    model: Option<(DecisionTree<f64, usize>, usize)>,
}

impl TreeClassifier {
    pub fn new(params: &ClassifierValidParams) -> Self {
        TreeClassifier {
            params: DecisionTree::params().max_depth(params.max_depth()),
            model: None,
        }
    }
}

impl Classifier for TreeClassifier {
    fn kind(&self) -> ClassifierKind {
        ClassifierKind::DecisionTree
    }

    fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    fn fit(&mut self, dataset: &Dataset<f64, usize, Ix1>) -> Result<()> {
        if self.model.is_some() {
            return Err(Error::AlreadyFitted);
        }
        check_not_empty(dataset)?;

        let tree = self.params.fit(dataset)?;
        log::info!(
            "fitted decision tree of depth {} with {} leaves",
            tree.max_depth(),
            tree.num_leaves()
        );
        log::debug!("feature importance {:?}", tree.feature_importance());

        self.model = Some((tree, dataset.records.ncols()));
        Ok(())
    }

    fn predict(&self, records: &Array2<f64>) -> Result<Array1<usize>> {
        let (tree, nfeatures) = self.model.as_ref().ok_or(Error::NotFitted)?;
        check_nfeatures(*nfeatures, records)?;

        Ok(tree.predict(records))
    }
}

/// Random forest or extra trees, see [`Forest`] for the voting scheme
///
/// Both kinds grow ordinary `linfa-trees` decision trees with best-threshold splits. Random
/// forest members are fitted on bootstrap samples, extra trees members on a subsample drawn
/// without replacement (70% of the rows by default). This is not the random-threshold
/// splitting of scikit-learn's `ExtraTreesClassifier`, which grows every tree on the full
/// sample.
#[derive(Debug)]
pub struct EnsembleClassifier {
    kind: ClassifierKind,
    params: ForestValidParams,
    model: Option<Forest>,
}

impl EnsembleClassifier {
    pub fn new(kind: ClassifierKind, params: &ClassifierValidParams) -> Result<Self> {
        let sampling = match kind {
            ClassifierKind::RandomForest => Sampling::Bootstrap,
            ClassifierKind::ExtraTrees => Sampling::Subsample(params.subsample()),
            ClassifierKind::DecisionTree => {
                return Err(Error::InvalidArgument(format!(
                    "{} is not an ensemble classifier",
                    kind
                )))
            }
        };

        Ok(EnsembleClassifier {
            kind,
            params: params.forest(sampling).check()?,
            model: None,
        })
    }

    pub fn params(&self) -> &ForestValidParams {
        &self.params
    }

    fn fitted(&self, records: &Array2<f64>) -> Result<&Forest> {
        let forest = self.model.as_ref().ok_or(Error::NotFitted)?;
        check_nfeatures(forest.nfeatures(), records)?;

        Ok(forest)
    }
}

impl Classifier for EnsembleClassifier {
    fn kind(&self) -> ClassifierKind {
        self.kind
    }

    fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    fn fit(&mut self, dataset: &Dataset<f64, usize, Ix1>) -> Result<()> {
        if self.model.is_some() {
            return Err(Error::AlreadyFitted);
        }
        check_not_empty(dataset)?;

        let forest = self.params.fit(dataset)?;
        log::info!(
            "fitted {} with {} trees over {} classes",
            self.kind,
            forest.n_trees(),
            forest.nclasses()
        );

        self.model = Some(forest);
        Ok(())
    }

    fn predict(&self, records: &Array2<f64>) -> Result<Array1<usize>> {
        Ok(self.fitted(records)?.predict(records))
    }

    fn predict_proba(&self, records: &Array2<f64>) -> Result<Array2<f64>> {
        Ok(self.fitted(records)?.predict_proba(records))
    }
}
