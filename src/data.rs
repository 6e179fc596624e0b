//! Loading, grouping and splitting of labeled datasets
//!
//! Input files hold one record per line with comma separated numeric fields. The last field is
//! the integer class label, all preceding fields are the features of the record. There is no
//! header row; blank lines and lines starting with `#` are skipped.
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use linfa::Dataset;
use ndarray::{Array1, Array2, Axis, Ix1};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::error::{Error, Result};

/// Read a labeled dataset from the file at `path`
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset<f64, usize, Ix1>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let dataset = read_dataset(file)?;
    log::info!(
        "loaded {} records with {} features from {}",
        dataset.records.nrows(),
        dataset.records.ncols(),
        path.display()
    );

    Ok(dataset)
}

/// Parse a labeled dataset from any reader
///
/// Every row must have the same number of fields as the first one, all fields have to be
/// numeric and the label has to be a non-negative integer smaller than the number of records.
pub fn read_dataset<R: Read>(reader: R) -> Result<Dataset<f64, usize, Ix1>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut width = None;
    let mut features = Vec::new();
    let mut labels = Vec::new();
    let mut largest: Option<(usize, u64)> = None;

    for record in reader.records() {
        let record = record?;
        if record.len() == 1 && record[0].is_empty() {
            continue;
        }
        let line = record
            .position()
            .map(|pos| pos.line())
            .unwrap_or(labels.len() as u64 + 1);

        let expected = *width.get_or_insert(record.len());
        if expected < 2 {
            return Err(Error::Parse {
                line,
                reason: "expected at least one feature and a label".into(),
            });
        }
        if record.len() != expected {
            return Err(Error::Parse {
                line,
                reason: format!("expected {} fields, found {}", expected, record.len()),
            });
        }

        for field in record.iter().take(expected - 1) {
            features.push(parse_field(field, line)?);
        }
        let label = parse_label(&record[expected - 1], line)?;
        if largest.map_or(true, |(max, _)| label > max) {
            largest = Some((label, line));
        }
        labels.push(label);
    }

    let width = width.ok_or_else(|| Error::Parse {
        line: 0,
        reason: "input contains no records".into(),
    })?;

    // labels number the classes densely from zero, so each class needs at least one record
    if let Some((label, line)) = largest.filter(|&(label, _)| label >= labels.len()) {
        return Err(Error::Parse {
            line,
            reason: format!(
                "label {} is out of range for {} records",
                label,
                labels.len()
            ),
        });
    }

    let records = Array2::from_shape_vec((labels.len(), width - 1), features)
        .map_err(linfa::error::Error::from)?;

    Ok(Dataset::new(records, Array1::from(labels)))
}

fn parse_field(field: &str, line: u64) -> Result<f64> {
    field.parse::<f64>().map_err(|_| Error::Parse {
        line,
        reason: format!("field `{}` is not numeric", field),
    })
}

const MAX_LABEL: usize = u32::MAX as usize;

fn parse_label(field: &str, line: u64) -> Result<usize> {
    let value = parse_field(field, line)?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= MAX_LABEL as f64 {
        Ok(value as usize)
    } else {
        Err(Error::Parse {
            line,
            reason: format!(
                "label `{}` is not an integer between 0 and {}",
                field, MAX_LABEL
            ),
        })
    }
}

/// Number of classes implied by `targets`, one more than the largest label
pub fn class_count(targets: &Array1<usize>) -> Result<usize> {
    match targets.iter().max() {
        Some(max) => max.checked_add(1).ok_or_else(|| {
            Error::LabelMismatch(format!("label {} is too large to count classes", max))
        }),
        None => Ok(0),
    }
}

/// Sorted list of the label values present in `dataset`
pub fn distinct_labels(dataset: &Dataset<f64, usize, Ix1>) -> Vec<usize> {
    dataset
        .targets
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Rows of the feature matrix whose label equals `label`, in their original order
pub fn group_by_label(dataset: &Dataset<f64, usize, Ix1>, label: usize) -> Array2<f64> {
    let indices = dataset
        .targets
        .iter()
        .enumerate()
        .filter(|(_, &target)| target == label)
        .map(|(idx, _)| idx)
        .collect::<Vec<_>>();

    dataset.records.select(Axis(0), &indices)
}

/// Split a dataset into a training and a test set
///
/// The rows are shuffled with a generator seeded by `seed` and the first
/// `round(test_fraction * n)` rows of the permutation form the test set, the remaining rows
/// the training set. Calling this twice with the same arguments yields the same partition.
///
/// ### Returns
///
/// The pair `(train, test)`, or an error if `test_fraction` is not inside `(0, 1)` or the
/// dataset is empty.
pub fn train_test_split(
    dataset: &Dataset<f64, usize, Ix1>,
    test_fraction: f64,
    seed: u64,
) -> Result<(Dataset<f64, usize, Ix1>, Dataset<f64, usize, Ix1>)> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(Error::Parameters(format!(
            "test fraction should be strictly between zero and one, but was {}",
            test_fraction
        )));
    }

    let nsamples = dataset.records.nrows();
    if nsamples == 0 {
        return Err(Error::Parameters("cannot split an empty dataset".into()));
    }

    let ntest = (test_fraction * nsamples as f64).round() as usize;
    let mut indices = (0..nsamples).collect::<Vec<_>>();
    indices.shuffle(&mut StdRng::seed_from_u64(seed));

    let (test_idx, train_idx) = indices.split_at(ntest);
    log::info!(
        "split {} records into {} training and {} test records",
        nsamples,
        train_idx.len(),
        test_idx.len()
    );

    Ok((subset(dataset, train_idx), subset(dataset, test_idx)))
}

fn subset(dataset: &Dataset<f64, usize, Ix1>, indices: &[usize]) -> Dataset<f64, usize, Ix1> {
    Dataset::new(
        dataset.records.select(Axis(0), indices),
        dataset.targets.select(Axis(0), indices),
    )
}
