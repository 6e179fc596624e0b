//! Tree-classify prelude.
//!
//! This module contains the most used types, type aliases, traits and functions that you can
//! import easily as a group.

pub use crate::classifier::{Classifier, ClassifierFactory, ClassifierKind, ClassifierParams};
pub use crate::config::{PipelineConfig, SplitParams};
pub use crate::data::{distinct_labels, group_by_label, load_dataset, train_test_split};
pub use crate::error::{Error, Result};
pub use crate::pipeline::{Confidence, Outcome, Pipeline, Stage};
pub use crate::plot::{NoopVisualizer, SvgVisualizer, Visualizer};
pub use crate::report::{evaluate, ClassificationReport};
