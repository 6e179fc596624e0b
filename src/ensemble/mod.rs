//! Voting ensembles of decision trees
//!
//! A [`Forest`] combines many [`linfa_trees::DecisionTree`]s, each trained on a different
//! sample of the training set. Two sampling schemes are provided:
//!
//! * [`Sampling::Bootstrap`] draws as many rows as the training set holds with replacement,
//!   which gives the classic random forest.
//! * [`Sampling::Subsample`] draws a fixed proportion of rows without replacement. This is
//!   used for the extra-trees classifier, whose members additionally see every row at most once.
//!
//! Both schemes can be combined with a random feature subspace per member.
//!
//! ## Example
//!
//! ```no_run
//! use linfa::prelude::{Fit, Predict};
//! use tree_classify::ensemble::{Forest, Sampling};
//!
//! let dataset = tree_classify::data::load_dataset("data/data_random_forests.txt").unwrap();
//! let forest = Forest::params(100)
//!     .max_depth(Some(4))
//!     .sampling(Sampling::Bootstrap)
//!     .fit(&dataset)
//!     .unwrap();
//!
//! let predictions: ndarray::Array1<usize> = forest.predict(&dataset.records);
//! let confidence = forest.predict_proba(&dataset.records);
//! ```
mod algorithm;
mod hyperparams;

pub use algorithm::*;
pub use hyperparams::*;
