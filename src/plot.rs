//! Visualization of labeled points and decision regions
//!
//! Rendering is behind the [`Visualizer`] trait. Visualizers only get shared references to the
//! classifier and the data, so plotting can never change either of them. [`SvgVisualizer`]
//! writes one SVG file per figure, [`NoopVisualizer`] discards all figures for headless runs.
use std::path::{Path, PathBuf};

use linfa::Dataset;
use ndarray::{Array2, ArrayView1, Axis, Ix1};
use plotters::coord::{types::RangedCoordf64, Shift};
use plotters::prelude::*;

use crate::classifier::Classifier;
use crate::data::{distinct_labels, group_by_label};
use crate::error::{Error, Result};

/// Largest number of grid cells along one axis of a decision region plot
const GRID_CELLS: usize = 200;
/// Padding added around the data range of decision region plots
const PADDING: f64 = 1.0;

const COLORS: [RGBColor; 6] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
];

pub trait Visualizer {
    /// Scatter plot of point groups, one group per label
    fn scatter(&mut self, title: &str, groups: &[(usize, Array2<f64>)]) -> Result<()>;

    /// Decision regions of a fitted classifier overlaid with the labeled points of `dataset`
    fn decision_regions(
        &mut self,
        title: &str,
        classifier: &dyn Classifier,
        dataset: &Dataset<f64, usize, Ix1>,
    ) -> Result<()>;

    /// Scatter plot of a whole dataset, grouped by label
    fn scatter_dataset(&mut self, title: &str, dataset: &Dataset<f64, usize, Ix1>) -> Result<()> {
        let groups = distinct_labels(dataset)
            .into_iter()
            .map(|label| (label, group_by_label(dataset, label)))
            .collect::<Vec<_>>();

        self.scatter(title, &groups)
    }
}

/// Discards every figure
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopVisualizer;

impl Visualizer for NoopVisualizer {
    fn scatter(&mut self, title: &str, _groups: &[(usize, Array2<f64>)]) -> Result<()> {
        log::debug!("skipping plot `{}`", title);
        Ok(())
    }

    fn decision_regions(
        &mut self,
        title: &str,
        _classifier: &dyn Classifier,
        _dataset: &Dataset<f64, usize, Ix1>,
    ) -> Result<()> {
        log::debug!("skipping plot `{}`", title);
        Ok(())
    }
}

/// Writes every figure to `<dir>/<nn>-<title>.svg`, numbered in call order
#[derive(Debug)]
pub struct SvgVisualizer {
    dir: PathBuf,
    size: (u32, u32),
    figures: usize,
}

impl SvgVisualizer {
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        std::fs::create_dir_all(dir.as_ref())?;

        Ok(SvgVisualizer {
            dir: dir.as_ref().to_path_buf(),
            size: (800, 600),
            figures: 0,
        })
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    /// Number of figures written so far
    pub fn figures(&self) -> usize {
        self.figures
    }

    fn next_path(&mut self, title: &str) -> PathBuf {
        let slug = title
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '-'
                }
            })
            .collect::<String>();
        self.figures += 1;

        self.dir.join(format!("{:02}-{}.svg", self.figures, slug))
    }
}

fn plot_err<E: std::fmt::Display>(err: E) -> Error {
    Error::Plot(err.to_string())
}

fn color(label: usize) -> RGBColor {
    COLORS[label % COLORS.len()]
}

/// Bounds of one column padded on both sides, or `None` without any finite value
fn bounds(column: ArrayView1<f64>) -> Option<(f64, f64)> {
    let (min, max) = column
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    if min <= max {
        Some((min - PADDING, max + PADDING))
    } else {
        None
    }
}

fn require_2d(records: &Array2<f64>) -> Result<()> {
    if records.ncols() == 2 {
        Ok(())
    } else {
        Err(Error::Parameters(format!(
            "plots need two features, but the data has {}",
            records.ncols()
        )))
    }
}

/// Draws the points of one label, the marker shape cycles through cross, circle and triangle
fn draw_points<DB: DrawingBackend>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    label: usize,
    points: &Array2<f64>,
) -> Result<()> {
    let style = color(label).stroke_width(2);
    let coords = points.rows().into_iter().map(|row| (row[0], row[1]));

    match label % 3 {
        0 => chart
            .draw_series(coords.map(|c| Cross::new(c, 5, style)))
            .map(|_| ()),
        1 => chart
            .draw_series(coords.map(|c| Circle::new(c, 5, style)))
            .map(|_| ()),
        _ => chart
            .draw_series(coords.map(|c| TriangleMarker::new(c, 6, style)))
            .map(|_| ()),
    }
    .map_err(plot_err)
}

fn blank<'a>(path: &'a Path, size: (u32, u32)) -> Result<DrawingArea<SVGBackend<'a>, Shift>> {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    Ok(root)
}

impl Visualizer for SvgVisualizer {
    fn scatter(&mut self, title: &str, groups: &[(usize, Array2<f64>)]) -> Result<()> {
        let points = groups.iter().map(|(_, points)| points.view()).collect::<Vec<_>>();
        let all = ndarray::concatenate(Axis(0), &points).map_err(linfa::error::Error::from)?;
        require_2d(&all)?;

        let (x_range, y_range) = match (bounds(all.column(0)), bounds(all.column(1))) {
            (Some(x), Some(y)) => (x, y),
            _ => return Err(Error::Plot(format!("nothing to plot in `{}`", title))),
        };

        let path = self.next_path(title);
        let root = blank(&path, self.size)?;
        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)
            .map_err(plot_err)?;

        for (label, points) in groups {
            draw_points(&mut chart, *label, points)?;
        }

        root.present().map_err(plot_err)?;
        log::info!("wrote `{}` to {}", title, path.display());

        Ok(())
    }

    fn decision_regions(
        &mut self,
        title: &str,
        classifier: &dyn Classifier,
        dataset: &Dataset<f64, usize, Ix1>,
    ) -> Result<()> {
        let records = &dataset.records;
        require_2d(records)?;

        let ((x_min, x_max), (y_min, y_max)) =
            match (bounds(records.column(0)), bounds(records.column(1))) {
                (Some(x), Some(y)) => (x, y),
                _ => return Err(Error::Plot(format!("nothing to plot in `{}`", title))),
            };

        let step_x = (x_max - x_min) / GRID_CELLS as f64;
        let step_y = (y_max - y_min) / GRID_CELLS as f64;
        let grid = Array2::from_shape_fn((GRID_CELLS * GRID_CELLS, 2), |(idx, axis)| {
            let (row, col) = (idx / GRID_CELLS, idx % GRID_CELLS);
            if axis == 0 {
                x_min + (col as f64 + 0.5) * step_x
            } else {
                y_min + (row as f64 + 0.5) * step_y
            }
        });
        let regions = classifier.predict(&grid)?;

        let path = self.next_path(title);
        let root = blank(&path, self.size)?;
        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(plot_err)?;

        chart
            .draw_series(grid.rows().into_iter().zip(regions.iter()).map(|(cell, &label)| {
                let (x, y) = (cell[0] - step_x / 2.0, cell[1] - step_y / 2.0);
                Rectangle::new(
                    [(x, y), (x + step_x, y + step_y)],
                    color(label).mix(0.25).filled(),
                )
            }))
            .map_err(plot_err)?;

        for label in distinct_labels(dataset) {
            draw_points(&mut chart, label, &group_by_label(dataset, label))?;
        }

        root.present().map_err(plot_err)?;
        log::info!("wrote `{}` to {}", title, path.display());

        Ok(())
    }
}
