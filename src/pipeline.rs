//! Train, evaluate and report
//!
//! [`Pipeline`] wraps a classifier in an explicit state machine
//! (`Unfit` → `Fitted` → `Evaluated`) and [`run`] chains all stages of a program: loading,
//! plotting the input, splitting, training, evaluating both splits and, when query points are
//! configured, reporting class probabilities for them.
use std::io::Write;

use linfa::Dataset;
use ndarray::{Array1, Array2, Ix1};

use crate::classifier::{Classifier, ClassifierFactory, ClassifierKind};
use crate::config::PipelineConfig;
use crate::data::{class_count, load_dataset, train_test_split};
use crate::error::{Error, Result};
use crate::plot::Visualizer;
use crate::report::{evaluate, ClassificationReport};

const BANNER: &str = "########################################";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Unfit,
    Fitted,
    Evaluated,
}

/// Predicted class and class probabilities of one query point
#[derive(Clone, Debug, PartialEq)]
pub struct Confidence {
    pub point: Array1<f64>,
    pub label: usize,
    pub probabilities: Array1<f64>,
}

pub struct Pipeline {
    classifier: Box<dyn Classifier>,
    class_names: Vec<String>,
    stage: Stage,
}

impl Pipeline {
    /// The classifier has to be unfit, label `i` is reported as `class_names[i]`
    pub fn new(classifier: Box<dyn Classifier>, class_names: Vec<String>) -> Result<Self> {
        if classifier.is_fitted() {
            return Err(Error::AlreadyFitted);
        }

        Ok(Pipeline {
            classifier,
            class_names,
            stage: Stage::Unfit,
        })
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn class_names(&self) -> &[String] {
        &self.class_names
    }

    pub fn fit(&mut self, train: &Dataset<f64, usize, Ix1>) -> Result<()> {
        if self.stage != Stage::Unfit {
            return Err(Error::AlreadyFitted);
        }

        self.classifier.fit(train)?;
        self.stage = Stage::Fitted;
        Ok(())
    }

    pub fn predict(&self, records: &Array2<f64>) -> Result<Array1<usize>> {
        if self.stage == Stage::Unfit {
            return Err(Error::NotFitted);
        }

        self.classifier.predict(records)
    }

    /// Predict the records of `dataset` and compare against its targets
    pub fn evaluate(
        &mut self,
        dataset: &Dataset<f64, usize, Ix1>,
    ) -> Result<ClassificationReport> {
        let predicted = self.predict(&dataset.records)?;
        let report = evaluate(&dataset.targets, &predicted, &self.class_names)?;
        log::info!(
            "accuracy {:.3} on {} records",
            report.accuracy,
            report.support()
        );

        self.stage = Stage::Evaluated;
        Ok(report)
    }

    /// Predicted label and full probability vector for every row of `points`
    pub fn query_confidence(&self, points: &Array2<f64>) -> Result<Vec<Confidence>> {
        if self.stage == Stage::Unfit {
            return Err(Error::NotFitted);
        }
        let kind = self.classifier.kind();
        if !kind.supports_probabilities() {
            return Err(Error::ProbabilitiesUnsupported(kind));
        }

        let probabilities = self.classifier.predict_proba(points)?;
        Ok(points
            .outer_iter()
            .zip(probabilities.outer_iter())
            .map(|(point, proba)| Confidence {
                point: point.to_owned(),
                label: argmax(proba.iter().copied()),
                probabilities: proba.to_owned(),
            })
            .collect())
    }

    /// Display name of `label`
    pub fn class_name(&self, label: usize) -> String {
        self.class_names
            .get(label)
            .cloned()
            .unwrap_or_else(|| default_class_name(label))
    }
}

fn argmax(values: impl Iterator<Item = f64>) -> usize {
    values
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (idx, value)| {
            if value > best.1 {
                (idx, value)
            } else {
                best
            }
        })
        .0
}

pub fn default_class_name(label: usize) -> String {
    format!("Class-{}", label)
}

fn format_values(values: impl Iterator<Item = f64>, separator: &str) -> String {
    let values = values.map(|v| v.to_string()).collect::<Vec<_>>();
    format!("[{}]", values.join(separator))
}

/// Write one report between two banners
pub fn write_report<W: Write>(
    out: &mut W,
    split: &str,
    report: &ClassificationReport,
) -> Result<()> {
    writeln!(out, "\n{}", BANNER)?;
    writeln!(out, "\nClassifier performance on {} dataset\n", split)?;
    writeln!(out, "{}", report)?;
    writeln!(out, "{}\n", BANNER)?;

    Ok(())
}

/// Write the predicted class and probabilities of every query point
pub fn write_confidences<W: Write>(
    out: &mut W,
    pipeline: &Pipeline,
    confidences: &[Confidence],
) -> Result<()> {
    writeln!(out, "\nConfidence measure:")?;
    for confidence in confidences {
        writeln!(
            out,
            "\nDatapoint: {}",
            format_values(confidence.point.iter().copied(), " ")
        )?;
        writeln!(out, "Predicted class: {}", pipeline.class_name(confidence.label))?;
        writeln!(
            out,
            "Probabilities: {}",
            format_values(confidence.probabilities.iter().map(|p| (p * 1e3).round() / 1e3), ", ")
        )?;
    }

    Ok(())
}

/// Everything a run computed
#[derive(Debug)]
pub struct Outcome {
    pub train_report: ClassificationReport,
    pub test_report: ClassificationReport,
    pub confidences: Vec<Confidence>,
}

/// Run a whole program: load, split, train, evaluate and report
///
/// Console output goes to `out`, figures to `visualizer`.
pub fn run<W: Write>(
    config: &PipelineConfig,
    kind: ClassifierKind,
    visualizer: &mut dyn Visualizer,
    out: &mut W,
) -> Result<Outcome> {
    let dataset = load_dataset(&config.input)?;
    visualizer.scatter_dataset("Input data", &dataset)?;

    let class_names = match &config.class_names {
        Some(names) => names.clone(),
        None => {
            (0..class_count(&dataset.targets)?)
                .map(default_class_name)
                .collect()
        }
    };

    let (train, test) =
        train_test_split(&dataset, config.split.test_fraction, config.split.seed)?;

    let classifier = ClassifierFactory::new(config.classifier)?.build(kind)?;
    let mut pipeline = Pipeline::new(classifier, class_names)?;

    pipeline.fit(&train)?;
    visualizer.decision_regions("Training dataset", pipeline.classifier(), &train)?;

    let test_report = pipeline.evaluate(&test)?;
    visualizer.decision_regions("Test dataset", pipeline.classifier(), &test)?;

    let train_report = pipeline.evaluate(&train)?;
    write_report(out, "training", &train_report)?;
    write_report(out, "test", &test_report)?;

    let confidences = if config.confidence_points.is_empty() {
        Vec::new()
    } else {
        let points = config.confidence_matrix()?;
        let confidences = pipeline.query_confidence(&points)?;
        write_confidences(out, &pipeline, &confidences)?;

        // the labels only pick the marker of every query point
        let labels = confidences.iter().map(|c| c.label).collect::<Array1<_>>();
        visualizer.decision_regions(
            "Query points",
            pipeline.classifier(),
            &Dataset::new(points, labels),
        )?;

        confidences
    };

    out.flush()?;
    Ok(Outcome {
        train_report,
        test_report,
        confidences,
    })
}
