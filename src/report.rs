//! Classification reports
//!
//! A report compares ground truth labels with predicted labels and lists precision, recall,
//! F1 score and support for every class followed by the aggregates. Its `Display`
//! implementation renders the familiar fixed-width text table.
use std::fmt;

use ndarray::{Array2, ArrayBase, Axis, Data, Ix1};

use crate::error::{Error, Result};

/// Scores of a single class or of an average over classes
#[derive(Clone, Debug, PartialEq)]
pub struct Scores {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClassScores {
    pub name: String,
    pub scores: Scores,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClassificationReport {
    pub classes: Vec<ClassScores>,
    pub accuracy: f64,
    pub micro_avg: Scores,
    pub macro_avg: Scores,
    pub weighted_avg: Scores,
    confusion: Array2<usize>,
}

fn ratio(numerator: usize, denominator: usize, metric: &str, class: &str) -> f64 {
    if denominator == 0 {
        log::warn!(
            "{} is ill-defined for {} and set to 0.0, there are no samples",
            metric,
            class
        );
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

/// Compute the report for `predicted` labels against `truth`
///
/// Label `i` is reported under `class_names[i]`. Every class gets a row, including classes
/// without any true or predicted sample.
///
/// ### Returns
///
/// The report, or [`Error::LabelMismatch`] if the label arrays differ in length or contain a
/// label without a class name.
pub fn evaluate<S, T>(
    truth: &ArrayBase<S, Ix1>,
    predicted: &ArrayBase<T, Ix1>,
    class_names: &[String],
) -> Result<ClassificationReport>
where
    S: Data<Elem = usize>,
    T: Data<Elem = usize>,
{
    if truth.len() != predicted.len() {
        return Err(Error::LabelMismatch(format!(
            "{} true labels but {} predicted labels",
            truth.len(),
            predicted.len()
        )));
    }

    let nclasses = class_names.len();
    if let Some(label) = truth
        .iter()
        .chain(predicted.iter())
        .find(|&&label| label >= nclasses)
    {
        return Err(Error::LabelMismatch(format!(
            "label {} has no class name, only {} names given",
            label, nclasses
        )));
    }

    // rows are true labels, columns predicted labels
    let mut confusion = Array2::zeros((nclasses, nclasses));
    for (&t, &p) in truth.iter().zip(predicted.iter()) {
        confusion[(t, p)] += 1;
    }

    let actual = confusion.sum_axis(Axis(1));
    let claimed = confusion.sum_axis(Axis(0));
    let total = truth.len();

    let classes = class_names
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let tp = confusion[(idx, idx)];
            let precision = ratio(tp, claimed[idx], "precision", name);
            let recall = ratio(tp, actual[idx], "recall", name);
            ClassScores {
                name: name.clone(),
                scores: Scores {
                    precision,
                    recall,
                    f1: f1(precision, recall),
                    support: actual[idx],
                },
            }
        })
        .collect::<Vec<_>>();

    let correct = confusion.diag().sum();
    let accuracy = ratio(correct, total, "accuracy", "the report");

    // every sample carries exactly one true and one predicted label, so the pooled
    // precision and recall both equal the accuracy
    let micro_avg = Scores {
        precision: accuracy,
        recall: accuracy,
        f1: accuracy,
        support: total,
    };

    let macro_avg = average(&classes, |_| 1.0, nclasses as f64, total);
    let weighted_avg = average(&classes, |s| s.support as f64, total as f64, total);

    Ok(ClassificationReport {
        classes,
        accuracy,
        micro_avg,
        macro_avg,
        weighted_avg,
        confusion,
    })
}

fn average(
    classes: &[ClassScores],
    weight: impl Fn(&Scores) -> f64,
    norm: f64,
    support: usize,
) -> Scores {
    let mean = |metric: fn(&Scores) -> f64| {
        if norm == 0.0 {
            0.0
        } else {
            classes
                .iter()
                .map(|c| weight(&c.scores) * metric(&c.scores))
                .sum::<f64>()
                / norm
        }
    };

    Scores {
        precision: mean(|s| s.precision),
        recall: mean(|s| s.recall),
        f1: mean(|s| s.f1),
        support,
    }
}

impl ClassificationReport {
    /// Confusion matrix with true labels along the rows and predictions along the columns
    pub fn confusion_matrix(&self) -> &Array2<usize> {
        &self.confusion
    }

    pub fn support(&self) -> usize {
        self.micro_avg.support
    }
}

const HEADINGS: [&str; 4] = ["precision", "recall", "f1-score", "support"];
const LONGEST_AGGREGATE: &str = "weighted avg";

fn write_row(f: &mut fmt::Formatter, width: usize, name: &str, s: &Scores) -> fmt::Result {
    writeln!(
        f,
        "{:>width$}  {:>9.2} {:>9.2} {:>9.2} {:>9}",
        name,
        s.precision,
        s.recall,
        s.f1,
        s.support,
        width = width
    )
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let width = self
            .classes
            .iter()
            .map(|c| c.name.len())
            .chain(std::iter::once(LONGEST_AGGREGATE.len()))
            .max()
            .unwrap_or(0);

        write!(f, "{:>width$} ", "", width = width)?;
        for heading in &HEADINGS {
            write!(f, " {:>9}", heading)?;
        }
        writeln!(f)?;
        writeln!(f)?;

        for class in &self.classes {
            write_row(f, width, &class.name, &class.scores)?;
        }
        writeln!(f)?;

        writeln!(
            f,
            "{:>width$}  {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy",
            "",
            "",
            self.accuracy,
            self.support(),
            width = width
        )?;
        write_row(f, width, "macro avg", &self.macro_avg)?;
        write_row(f, width, LONGEST_AGGREGATE, &self.weighted_avg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("Class-{}", i)).collect()
    }

    #[test]
    fn perfect_predictions_score_one() -> Result<()> {
        let truth = array![0usize, 1, 2, 2, 1, 0, 0];
        let report = evaluate(&truth, &truth, &names(3))?;

        for class in &report.classes {
            assert_abs_diff_eq!(class.scores.precision, 1.0);
            assert_abs_diff_eq!(class.scores.recall, 1.0);
            assert_abs_diff_eq!(class.scores.f1, 1.0);
        }
        assert_abs_diff_eq!(report.accuracy, 1.0);
        assert_eq!(report.support(), 7);

        Ok(())
    }

    #[test]
    fn scores_match_hand_computation() -> Result<()> {
        let truth = array![0usize, 0, 0, 1, 1, 2];
        let predicted = array![0usize, 1, 0, 1, 2, 2];
        let report = evaluate(&truth, &predicted, &names(3))?;

        let class0 = &report.classes[0].scores;
        assert_abs_diff_eq!(class0.precision, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(class0.recall, 2.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(class0.f1, 0.8, epsilon = 1e-12);
        assert_eq!(class0.support, 3);

        let class1 = &report.classes[1].scores;
        assert_abs_diff_eq!(class1.precision, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(class1.recall, 0.5, epsilon = 1e-12);

        let class2 = &report.classes[2].scores;
        assert_abs_diff_eq!(class2.precision, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(class2.recall, 1.0, epsilon = 1e-12);

        assert_abs_diff_eq!(report.accuracy, 4.0 / 6.0, epsilon = 1e-12);
        assert_abs_diff_eq!(report.micro_avg.f1, 4.0 / 6.0, epsilon = 1e-12);
        assert_abs_diff_eq!(report.macro_avg.precision, 2.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(
            report.weighted_avg.recall,
            (3.0 * 2.0 / 3.0 + 2.0 * 0.5 + 1.0) / 6.0,
            epsilon = 1e-12
        );
        assert_eq!(report.confusion_matrix()[(0, 1)], 1);

        Ok(())
    }

    #[test]
    fn scores_are_bounded_and_supports_add_up() -> Result<()> {
        let truth = array![0usize, 1, 1, 2, 2, 2, 0, 1];
        let predicted = array![2usize, 2, 1, 0, 0, 2, 1, 1];
        let report = evaluate(&truth, &predicted, &names(4))?;

        let support: usize = report.classes.iter().map(|c| c.scores.support).sum();
        assert_eq!(support, truth.len());

        for scores in report
            .classes
            .iter()
            .map(|c| &c.scores)
            .chain(vec![&report.macro_avg, &report.weighted_avg, &report.micro_avg])
        {
            for value in &[scores.precision, scores.recall, scores.f1] {
                assert!((0.0..=1.0).contains(value));
            }
        }

        // the fourth class never occurs
        assert_eq!(report.classes[3].scores.support, 0);
        assert_abs_diff_eq!(report.classes[3].scores.f1, 0.0);

        Ok(())
    }

    #[test]
    fn mismatched_labels_are_rejected() {
        assert!(matches!(
            evaluate(&array![0usize, 1], &array![0usize], &names(2)),
            Err(Error::LabelMismatch(_))
        ));
        assert!(matches!(
            evaluate(&array![0usize, 2], &array![0usize, 1], &names(2)),
            Err(Error::LabelMismatch(_))
        ));
        assert!(matches!(
            evaluate(&array![0usize, 1], &array![0usize, 5], &names(2)),
            Err(Error::LabelMismatch(_))
        ));
    }

    #[test]
    fn renders_fixed_width_table() -> Result<()> {
        let truth = array![0usize, 0, 1, 1];
        let predicted = array![0usize, 1, 1, 1];
        let report = evaluate(&truth, &predicted, &names(2))?;

        let expected = [
            "              precision    recall  f1-score   support",
            "",
            "     Class-0       1.00      0.50      0.67         2",
            "     Class-1       0.67      1.00      0.80         2",
            "",
            "    accuracy                           0.75         4",
            "   macro avg       0.83      0.75      0.73         4",
            "weighted avg       0.83      0.75      0.73         4",
            "",
        ]
        .join("\n");
        assert_eq!(report.to_string(), expected);

        Ok(())
    }
}
