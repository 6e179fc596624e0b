//! `tree-classify` trains tree classifiers on small labeled datasets and reports how well they
//! do.
//!
//! The crate is built on top of [`linfa`](https://crates.io/crates/linfa): the trees
//! themselves are grown by `linfa-trees`, while this crate adds the workflow around them.
//!
//! * [`data`] loads comma separated records into a [`linfa::Dataset`], groups rows by label and
//!   performs a seeded train/test split.
//! * [`classifier`] builds a decision tree, a random forest or an extra-trees ensemble from a
//!   kind selector and one set of hyperparameters.
//! * [`ensemble`] implements the voting forests on top of `linfa-trees`.
//! * [`report`] computes per-class precision, recall and F1 score.
//! * [`plot`] renders the data and the decision regions of a classifier.
//! * [`pipeline`] ties everything together behind explicit stages.
//!
//! ## Example
//!
//! ```no_run
//! use tree_classify::prelude::*;
//!
//! let config = PipelineConfig::ensemble();
//! let outcome = tree_classify::pipeline::run(
//!     &config,
//!     ClassifierKind::RandomForest,
//!     &mut NoopVisualizer,
//!     &mut std::io::stdout(),
//! )?;
//! println!("test accuracy {:.2}", outcome.test_report.accuracy);
//! # Ok::<(), tree_classify::Error>(())
//! ```

pub mod classifier;
pub mod cli;
pub mod config;
pub mod data;
pub mod ensemble;
pub mod error;
pub mod pipeline;
pub mod plot;
pub mod prelude;
pub mod report;

pub use error::{Error, Result};
