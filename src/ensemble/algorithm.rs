use linfa::{
    traits::{Fit, Predict, PredictInplace},
    Dataset, DatasetBase,
};
use linfa_trees::DecisionTree;
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, Axis, Data, Ix2};
use rand::{rngs::StdRng, seq::index::sample, Rng, SeedableRng};

use super::{ForestParams, ForestValidParams, Sampling};
use crate::data::class_count;
use crate::error::{Error, Result};

/// A voting ensemble of decision trees
///
/// Every member is a [`DecisionTree`] fitted on its own sample of the training rows and,
/// optionally, on a subset of the features. Predictions are the majority vote of the members
/// and probability estimates are the vote fractions.
#[derive(Debug)]
pub struct Forest {
    trees: Vec<DecisionTree<f64, usize>>,
    feature_indices: Vec<Vec<usize>>,
    nfeatures: usize,
    nclasses: usize,
}

impl Forest {
    #[allow(clippy::new_ret_no_self)]
    pub fn params(n_trees: usize) -> ForestParams {
        ForestParams::new(n_trees)
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Number of features the forest was trained on
    pub fn nfeatures(&self) -> usize {
        self.nfeatures
    }

    /// Number of classes, one more than the largest label seen during training
    pub fn nclasses(&self) -> usize {
        self.nclasses
    }

    /// Count the votes of all members, one row per observation and one column per class
    pub fn votes<D: Data<Elem = f64>>(&self, x: &ArrayBase<D, Ix2>) -> Array2<usize> {
        let mut votes = Array2::zeros((x.nrows(), self.nclasses));

        for (tree, features) in self.trees.iter().zip(&self.feature_indices) {
            let sub_x = x.select(Axis(1), features);
            let predictions: Array1<usize> = tree.predict(&sub_x);
            for (mut row, &label) in votes.rows_mut().into_iter().zip(predictions.iter()) {
                row[label] += 1;
            }
        }

        votes
    }

    /// Fraction of members voting for each class, every row sums to one
    pub fn predict_proba<D: Data<Elem = f64>>(&self, x: &ArrayBase<D, Ix2>) -> Array2<f64> {
        let ntrees = self.trees.len() as f64;
        self.votes(x).mapv(|count| count as f64 / ntrees)
    }
}

fn majority(votes: ArrayView1<usize>) -> usize {
    // first maximum wins, so ties go to the lowest label
    votes
        .iter()
        .enumerate()
        .fold((0, 0), |best, (label, &count)| {
            if count > best.1 {
                (label, count)
            } else {
                best
            }
        })
        .0
}

fn sample_rows(sampling: Sampling, nsamples: usize, rng: &mut impl Rng) -> Vec<usize> {
    match sampling {
        Sampling::Bootstrap => (0..nsamples).map(|_| rng.gen_range(0..nsamples)).collect(),
        Sampling::Subsample(ratio) => {
            let amount = ((nsamples as f64) * ratio).ceil() as usize;
            sample(rng, nsamples, amount.clamp(1, nsamples)).into_vec()
        }
    }
}

impl Fit<Array2<f64>, Array1<usize>, Error> for ForestValidParams {
    type Object = Forest;

    fn fit(&self, dataset: &DatasetBase<Array2<f64>, Array1<usize>>) -> Result<Self::Object> {
        let (nsamples, nfeatures) = dataset.records.dim();
        if nsamples == 0 {
            return Err(Error::Parameters(
                "cannot fit a forest on an empty dataset".into(),
            ));
        }

        let nclasses = class_count(&dataset.targets)?;
        let nselected = (((nfeatures as f32) * self.feature_subsample()).ceil() as usize)
            .clamp(1, nfeatures.max(1));

        let mut rng = StdRng::seed_from_u64(self.seed());
        let mut trees = Vec::with_capacity(self.n_trees());
        let mut feature_indices = Vec::with_capacity(self.n_trees());

        for idx in 0..self.n_trees() {
            let rows = sample_rows(self.sampling(), nsamples, &mut rng);
            let mut features = sample(&mut rng, nfeatures, nselected).into_vec();
            features.sort_unstable();

            let records = dataset
                .records
                .select(Axis(0), &rows)
                .select(Axis(1), &features);
            let targets = dataset.targets.select(Axis(0), &rows);

            let tree = DecisionTree::<f64, usize>::params()
                .max_depth(self.max_depth())
                .fit(&Dataset::new(records, targets))?;
            log::debug!(
                "tree {} fitted on {} rows using features {:?}, depth {}",
                idx,
                rows.len(),
                features,
                tree.max_depth()
            );

            trees.push(tree);
            feature_indices.push(features);
        }

        Ok(Forest {
            trees,
            feature_indices,
            nfeatures,
            nclasses,
        })
    }
}

impl<D: Data<Elem = f64>> PredictInplace<ArrayBase<D, Ix2>, Array1<usize>> for Forest {
    fn predict_inplace(&self, x: &ArrayBase<D, Ix2>, y: &mut Array1<usize>) {
        assert_eq!(
            x.nrows(),
            y.len(),
            "The number of data points must match the number of output targets."
        );

        let votes = self.votes(x);
        for (target, row) in y.iter_mut().zip(votes.rows()) {
            *target = majority(row);
        }
    }

    fn default_target(&self, x: &ArrayBase<D, Ix2>) -> Array1<usize> {
        Array1::zeros(x.nrows())
    }
}
