use std::io::Write;
use std::path::PathBuf;

use approx::assert_abs_diff_eq;
use ndarray::array;
use tree_classify::prelude::*;

const SEPARABLE: &str = "1,1,0\n1,2,0\n1,3,0\n5,5,1\n5,6,1\n5,7,1\n";

fn data_file(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join(name)
}

fn write_input(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn nearest_centroid(point: &[f64], centroids: &[[f64; 2]]) -> usize {
    let dist = |c: &[f64; 2]| (point[0] - c[0]).powi(2) + (point[1] - c[1]).powi(2);
    (0..centroids.len())
        .min_by(|&a, &b| dist(&centroids[a]).partial_cmp(&dist(&centroids[b])).unwrap())
        .unwrap()
}

#[test]
fn loader_matches_line_count() -> Result<()> {
    let dataset = load_dataset(data_file("data_decision_trees.txt"))?;
    assert_eq!(dataset.records.dim(), (360, 2));
    assert_eq!(dataset.targets.len(), 360);
    assert_eq!(distinct_labels(&dataset), vec![0, 1]);

    let dataset = load_dataset(data_file("data_random_forests.txt"))?;
    assert_eq!(dataset.records.dim(), (900, 2));
    assert_eq!(distinct_labels(&dataset), vec![0, 1, 2]);

    Ok(())
}

#[test]
fn held_out_points_follow_the_nearer_centroid() -> Result<()> {
    let input = write_input(SEPARABLE);
    let dataset = load_dataset(input.path())?;

    let (train, test) = train_test_split(&dataset, 1.0 / 3.0, 5)?;
    assert_eq!(test.records.nrows(), 2);
    assert_eq!(train.records.nrows(), 4);

    let factory = ClassifierFactory::new(ClassifierParams::new().max_depth(Some(2)))?;
    let mut pipeline = Pipeline::new(
        factory.build(ClassifierKind::DecisionTree)?,
        vec!["Class-0".into(), "Class-1".into()],
    )?;
    pipeline.fit(&train)?;

    let predicted = pipeline.predict(&test.records)?;
    let centroids = [[1.0, 2.0], [5.0, 6.0]];
    for (point, label) in test.records.outer_iter().zip(predicted.iter()) {
        assert_eq!(*label, nearest_centroid(point.as_slice().unwrap(), &centroids));
    }
    assert_eq!(predicted, test.targets);

    Ok(())
}

#[test]
fn far_away_queries_still_get_a_distribution() -> Result<()> {
    let input = write_input(SEPARABLE);
    let dataset = load_dataset(input.path())?;

    for kind in &[ClassifierKind::RandomForest, ClassifierKind::ExtraTrees] {
        let factory = ClassifierFactory::new(ClassifierParams::new().n_estimators(20))?;
        let mut pipeline = Pipeline::new(factory.build(*kind)?, Vec::new())?;
        pipeline.fit(&dataset)?;

        let confidences = pipeline.query_confidence(&array![[1000.0, -1000.0], [-3.0, 50.0]])?;
        for confidence in confidences {
            assert_eq!(confidence.probabilities.len(), 2);
            assert_abs_diff_eq!(confidence.probabilities.sum(), 1.0, epsilon = 1e-9);
            assert!(confidence.label < 2);
        }
    }

    Ok(())
}

#[test]
fn ensemble_run_prints_reports_and_confidences() -> Result<()> {
    let mut config = PipelineConfig::ensemble().with_toml("[classifier]\nn_estimators = 25\n")?;
    config.input = data_file("data_random_forests.txt");

    for kind in &[ClassifierKind::RandomForest, ClassifierKind::ExtraTrees] {
        let mut out = Vec::new();
        let outcome = tree_classify::pipeline::run(&config, *kind, &mut NoopVisualizer, &mut out)?;
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.matches(&"#".repeat(40)).count(), 4);
        assert!(text.contains("Classifier performance on training dataset"));
        assert!(text.contains("Classifier performance on test dataset"));
        assert!(text.contains("weighted avg"));
        assert!(text.contains("Confidence measure:"));
        assert_eq!(text.matches("Datapoint: ").count(), 6);
        assert!(text.contains("Datapoint: [5 5]"));

        assert_eq!(outcome.train_report.support(), 675);
        assert_eq!(outcome.test_report.support(), 225);
        assert_eq!(outcome.test_report.classes.len(), 3);
        assert!(
            outcome.test_report.accuracy > 0.75,
            "{} accuracy {}",
            kind,
            outcome.test_report.accuracy
        );

        assert_eq!(outcome.confidences.len(), 6);
        for confidence in &outcome.confidences {
            assert_abs_diff_eq!(confidence.probabilities.sum(), 1.0, epsilon = 1e-9);
        }
    }

    Ok(())
}

#[test]
fn decision_tree_run_reports_both_splits() -> Result<()> {
    let mut config = PipelineConfig::decision_tree();
    config.input = data_file("data_decision_trees.txt");

    let mut out = Vec::new();
    let outcome = tree_classify::pipeline::run(
        &config,
        ClassifierKind::DecisionTree,
        &mut NoopVisualizer,
        &mut out,
    )?;
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("Class-0"));
    assert!(text.contains("Class-1"));
    assert!(!text.contains("Confidence measure:"));
    assert!(outcome.confidences.is_empty());
    assert_eq!(outcome.test_report.support(), 72);
    assert_eq!(outcome.train_report.support(), 288);
    assert!(outcome.test_report.accuracy > 0.75);

    Ok(())
}

#[test]
fn decision_tree_cannot_answer_confidence_queries() {
    let mut config = PipelineConfig::ensemble();
    config.input = data_file("data_decision_trees.txt");

    let err = tree_classify::pipeline::run(
        &config,
        ClassifierKind::DecisionTree,
        &mut NoopVisualizer,
        &mut Vec::new(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        Error::ProbabilitiesUnsupported(ClassifierKind::DecisionTree)
    ));
}

#[test]
fn malformed_input_stops_the_run() {
    let input = write_input("1,2,0\n3,x,1\n");
    let mut config = PipelineConfig::decision_tree();
    config.input = input.path().to_path_buf();

    let err = tree_classify::pipeline::run(
        &config,
        ClassifierKind::DecisionTree,
        &mut NoopVisualizer,
        &mut Vec::new(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Parse { line: 2, .. }));
}

#[test]
fn oversized_label_is_a_parse_error() {
    for content in &[
        "1,1,0\n1,2,0\n5,5,1e30\n5,6,0\n5,7,0\n",
        "1,1,0\n1,2,0\n5,5,1000000000\n5,6,0\n5,7,0\n",
    ] {
        let input = write_input(content);
        let mut config = PipelineConfig::ensemble();
        config.input = input.path().to_path_buf();

        let err = tree_classify::pipeline::run(
            &config,
            ClassifierKind::RandomForest,
            &mut NoopVisualizer,
            &mut Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Parse { line: 3, .. }), "{:?}", err);
    }
}

#[test]
fn missing_class_names_are_a_label_mismatch() {
    let mut config = PipelineConfig::decision_tree();
    config.input = data_file("data_random_forests.txt");
    config.class_names = Some(vec!["only".into(), "two".into()]);

    let err = tree_classify::pipeline::run(
        &config,
        ClassifierKind::DecisionTree,
        &mut NoopVisualizer,
        &mut Vec::new(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::LabelMismatch(_)));
}

#[test]
fn svg_figures_are_written_per_stage() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let mut config =
        PipelineConfig::ensemble().with_toml("[classifier]\nn_estimators = 5\n")?;
    config.input = data_file("data_random_forests.txt");

    let mut visualizer = SvgVisualizer::new(dir.path())?.with_size(320, 240);
    tree_classify::pipeline::run(
        &config,
        ClassifierKind::RandomForest,
        &mut visualizer,
        &mut Vec::new(),
    )?;

    assert_eq!(visualizer.figures(), 4);
    let mut names = std::fs::read_dir(dir.path())?
        .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<std::io::Result<Vec<_>>>()?;
    names.sort();
    assert_eq!(
        names,
        vec![
            "01-input-data.svg",
            "02-training-dataset.svg",
            "03-test-dataset.svg",
            "04-query-points.svg"
        ]
    );

    Ok(())
}

#[test]
fn grouping_partitions_the_dataset() -> Result<()> {
    let dataset = load_dataset(data_file("data_random_forests.txt"))?;
    let mut seen = 0;
    for label in distinct_labels(&dataset) {
        let group = group_by_label(&dataset, label);
        let expected = dataset.targets.iter().filter(|&&t| t == label).count();
        assert_eq!(group.nrows(), expected);
        seen += group.nrows();
    }
    assert_eq!(seen, dataset.records.nrows());

    Ok(())
}
