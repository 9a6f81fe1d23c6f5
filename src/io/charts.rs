//! Bar charts of the aggregated study, rendered to SVG with [`plotters`].
//!
//! Every bar carries its value as a label just above it. The SVG backend
//! emits text as `<text>` elements, so no system fonts are needed.

use crate::analysis::StudySummary;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const SIZE: (u32, u32) = (800, 500);
const BAR_COLOR: RGBColor = RGBColor(59, 130, 246);
/// Room left above the tallest bar for its value label.
const HEADROOM: f64 = 1.15;

/// Errors that can occur while drawing a chart
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Failed to save chart: {0}")]
    FileSave(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

type Result<T> = core::result::Result<T, ChartError>;

/// A titled series of labelled values.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub y_label: String,
    pub bars: Vec<(String, f64)>,
}

impl BarChart {
    pub fn new(title: impl Into<String>, y_label: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            y_label: y_label.into(),
            bars: Vec::new(),
        }
    }

    pub fn bar(mut self, label: impl Into<String>, value: f64) -> Self {
        self.bars.push((label.into(), value));
        self
    }

    /// Upper bound of the value axis.
    fn y_max(&self) -> f64 {
        let max = self
            .bars
            .iter()
            .map(|(_, value)| *value)
            .filter(|value| value.is_finite())
            .fold(0.0, f64::max);
        if max > 0.0 {
            max * HEADROOM
        } else {
            1.0
        }
    }

    /// Render the chart as a standalone SVG document.
    pub fn to_svg(&self) -> Result<String> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
            self.draw(&root)?;
            root.present()
                .map_err(|e| ChartError::Drawing(e.to_string()))?;
        }
        Ok(svg)
    }

    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, plotters::coord::Shift>,
    ) -> Result<()> {
        if self.bars.is_empty() {
            return Err(ChartError::InvalidData(format!(
                "chart '{}' has no bars",
                self.title
            )));
        }

        root.fill(&WHITE)
            .map_err(|e| ChartError::DrawingArea(e.to_string()))?;

        let mut chart = ChartBuilder::on(root)
            .caption(&self.title, ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(70)
            .y_label_area_size(70)
            .build_cartesian_2d((0..self.bars.len()).into_segmented(), 0.0..self.y_max())
            .map_err(|e| ChartError::ChartConfig(e.to_string()))?;

        let label_of = |value: &SegmentValue<usize>| match value {
            SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => self
                .bars
                .get(*i)
                .map(|(label, _)| label.clone())
                .unwrap_or_default(),
            SegmentValue::Last => String::new(),
        };

        let mut mesh = chart.configure_mesh();
        mesh.disable_x_mesh()
            .x_labels(self.bars.len())
            .x_label_formatter(&label_of)
            .y_desc(self.y_label.as_str())
            .label_style(("sans-serif", 12));
        mesh.draw().map_err(|e| ChartError::Drawing(e.to_string()))?;

        let values: Vec<f64> = self
            .bars
            .iter()
            .map(|(_, value)| if value.is_finite() { *value } else { 0.0 })
            .collect();

        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style(BAR_COLOR.filled())
                    .margin(12)
                    .data(values.iter().enumerate().map(|(i, value)| (i, *value))),
            )
            .map_err(|e| ChartError::Drawing(e.to_string()))?;

        let value_style = ("sans-serif", 12)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        chart
            .draw_series(values.iter().enumerate().map(|(i, value)| {
                Text::new(
                    format_value(*value),
                    (SegmentValue::CenterOf(i), *value),
                    value_style.clone(),
                )
            }))
            .map_err(|e| ChartError::Drawing(e.to_string()))?;

        Ok(())
    }
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

/// Total occurrences of each design smell across all projects.
pub fn design_smell_totals(summary: &StudySummary) -> BarChart {
    summary.smell_totals.iter().fold(
        BarChart::new("Design Smell Occurrences", "Occurrences"),
        |chart, (smell, count)| chart.bar(smell.to_string(), count as f64),
    )
}

/// Mean occurrences of each smell over the vulnerability categories.
pub fn mean_code_smell_occurrences(summary: &StudySummary) -> BarChart {
    summary.mean_occurrences.iter().fold(
        BarChart::new("Mean Design Smell Occurrences per Category", "Mean occurrences"),
        |chart, (smell, mean)| chart.bar(smell.to_string(), *mean),
    )
}

/// Classes analyzed against scan findings.
pub fn class_vulnerability_totals(summary: &StudySummary) -> BarChart {
    BarChart::new("Classes and Vulnerabilities", "Count")
        .bar("Classes", summary.class_total as f64)
        .bar("Vulnerabilities", summary.vulnerability_total as f64)
}

/// Write the three study charts into `dir`, creating it when needed.
pub fn write_charts(summary: &StudySummary, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let charts = [
        ("design_smell_totals.svg", design_smell_totals(summary)),
        (
            "mean_code_smell_occurrences.svg",
            mean_code_smell_occurrences(summary),
        ),
        (
            "class_vulnerability_totals.svg",
            class_vulnerability_totals(summary),
        ),
    ];

    let mut written = Vec::with_capacity(charts.len());
    for (file_name, chart) in charts {
        let path = dir.join(file_name);
        fs::write(&path, chart.to_svg()?)?;
        log::info!("Wrote chart {}", path.display());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_svg_labels_every_bar_with_its_value() {
        let svg = BarChart::new("Totals", "Count")
            .bar("Classes", 7.5)
            .bar("Vulnerabilities", 3.25)
            .to_svg()
            .unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Totals"));
        assert!(svg.contains("Classes"));
        assert!(svg.contains("Vulnerabilities"));
        assert!(svg.contains("7.50"));
        assert!(svg.contains("3.25"));
    }

    #[test]
    fn test_y_axis_leaves_room_for_labels() {
        let chart = BarChart::new("t", "y").bar("a", 10.0).bar("b", 5.0);
        assert!(chart.y_max() > 10.0);
    }

    #[test]
    fn test_all_zero_values_still_render() {
        let chart = BarChart::new("t", "y").bar("a", 0.0);
        assert_eq!(chart.y_max(), 1.0);
        assert!(chart.to_svg().is_ok());
    }

    #[test]
    fn test_empty_chart_is_invalid_data() {
        let result = BarChart::new("Empty", "y").to_svg();
        assert!(matches!(result, Err(ChartError::InvalidData(_))));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(4.0), "4");
        assert_eq!(format_value(0.1666), "0.17");
    }
}
