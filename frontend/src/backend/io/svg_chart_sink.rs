//! SVG chart sink.
//!
//! Draws each dashboard chart as a bar chart into `<output_dir>/<chart>.svg`
//! with plotters. Disposing a chart deletes its file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, warn};
use plotters::prelude::*;
use shared::ChartSeries;

use crate::backend::domain::chart_service::{BarOrientation, ChartHandle, ChartId, ChartSink};
use crate::backend::domain::money_format::MoneyFormatter;

const CHART_SIZE: (u32, u32) = (900, 420);
const MONTHLY_BAR_COLOR: RGBColor = RGBColor(156, 106, 222);
const PERSON_BAR_COLOR: RGBColor = RGBColor(79, 209, 197);

pub struct SvgChartSink {
    output_dir: PathBuf,
    formatter: MoneyFormatter,
}

impl SvgChartSink {
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            formatter: MoneyFormatter::new(),
        }
    }

    pub fn chart_path(&self, chart: ChartId) -> PathBuf {
        self.output_dir.join(format!("{}.svg", chart.name()))
    }

    fn draw(&self, path: &Path, chart: ChartId, series: &ChartSeries) -> Result<()> {
        let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        if series.is_empty() {
            root.titled(&series.series_label, ("sans-serif", 20))?;
            root.draw_text(
                "ไม่พบข้อมูล",
                &TextStyle::from(("sans-serif", 16).into_font()).color(&BLACK),
                (CHART_SIZE.0 as i32 / 2 - 40, CHART_SIZE.1 as i32 / 2),
            )?;
            root.present()?;
            return Ok(());
        }

        let count = series.labels.len();
        let max_value = series.values.iter().cloned().fold(0.0_f64, f64::max);
        let value_max = if max_value > 0.0 { max_value * 1.1 } else { 1.0 };
        let unit_label = |v: &f64| format!("{} บาท", self.formatter.format(*v, false));
        let category_label = |v: &SegmentValue<usize>| match v {
            SegmentValue::CenterOf(i) => series.labels.get(*i).cloned().unwrap_or_default(),
            _ => String::new(),
        };

        match chart.orientation() {
            BarOrientation::Vertical => {
                let mut ctx = ChartBuilder::on(&root)
                    .caption(&series.series_label, ("sans-serif", 20))
                    .margin(15)
                    .x_label_area_size(45)
                    .y_label_area_size(110)
                    .build_cartesian_2d((0..count).into_segmented(), 0.0..value_max)?;

                ctx.configure_mesh()
                    .disable_x_mesh()
                    .x_labels(count)
                    .x_label_formatter(&category_label)
                    .y_label_formatter(&unit_label)
                    .label_style(("sans-serif", 12))
                    .draw()?;

                ctx.draw_series(series.values.iter().enumerate().map(|(i, v)| {
                    let mut bar = Rectangle::new(
                        [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), *v)],
                        MONTHLY_BAR_COLOR.mix(0.6).filled(),
                    );
                    bar.set_margin(0, 0, 6, 6);
                    bar
                }))?;
            }
            BarOrientation::Horizontal => {
                let mut ctx = ChartBuilder::on(&root)
                    .caption(&series.series_label, ("sans-serif", 20))
                    .margin(15)
                    .x_label_area_size(45)
                    .y_label_area_size(160)
                    .build_cartesian_2d(0.0..value_max, (0..count).into_segmented())?;

                ctx.configure_mesh()
                    .disable_y_mesh()
                    .y_labels(count)
                    .y_label_formatter(&category_label)
                    .x_label_formatter(&unit_label)
                    .label_style(("sans-serif", 12))
                    .draw()?;

                ctx.draw_series(series.values.iter().enumerate().map(|(i, v)| {
                    let mut bar = Rectangle::new(
                        [(0.0, SegmentValue::Exact(i)), (*v, SegmentValue::Exact(i + 1))],
                        PERSON_BAR_COLOR.mix(0.6).filled(),
                    );
                    bar.set_margin(6, 6, 0, 0);
                    bar
                }))?;
            }
        }

        root.present()?;
        Ok(())
    }
}

impl ChartSink for SvgChartSink {
    fn create(&mut self, chart: ChartId, generation: u64, series: &ChartSeries) -> Result<ChartHandle> {
        fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("Failed to create chart directory {:?}", self.output_dir))?;

        let path = self.chart_path(chart);
        self.draw(&path, chart, series)
            .with_context(|| format!("Failed to draw {} into {:?}", chart.name(), path))?;
        debug!("📈 CHART: Wrote {:?}", path);

        Ok(ChartHandle {
            chart,
            generation,
            location: Some(path),
        })
    }

    fn dispose(&mut self, handle: ChartHandle) -> Result<()> {
        if let Some(path) = handle.location {
            if path.exists() {
                fs::remove_file(&path).with_context(|| format!("Failed to remove {:?}", path))?;
            } else {
                warn!("📈 CHART: {:?} already gone", path);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::chart_service::{monthly_series, person_series, ChartAdapter};
    use shared::{MonthlyTotal, PersonTotal};
    use tempfile::TempDir;

    #[test]
    fn test_monthly_chart_written_and_replaced() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut adapter = ChartAdapter::new(SvgChartSink::new(temp_dir.path()));

        let totals = vec![
            MonthlyTotal {
                label: "มกราคม".to_string(),
                total: 150.0,
            },
            MonthlyTotal {
                label: "กุมภาพันธ์".to_string(),
                total: 0.0,
            },
        ];
        let handle = adapter
            .render(ChartId::MonthlySavings, &monthly_series(&totals, 2567))
            .unwrap();

        let path = handle.location.clone().unwrap();
        assert!(path.exists());
        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));

        let again = adapter
            .render(ChartId::MonthlySavings, &monthly_series(&totals, 2567))
            .unwrap();
        assert_eq!(again.location, Some(path.clone()));
        assert!(path.exists());
    }

    #[test]
    fn test_person_chart_and_dispose() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut adapter = ChartAdapter::new(SvgChartSink::new(temp_dir.path()));

        let top = vec![PersonTotal {
            person_no: "1".to_string(),
            person_name: "สมชาย".to_string(),
            total: 500.0,
        }];
        let handle = adapter
            .render(ChartId::PersonSavings, &person_series(&top))
            .unwrap();
        let path = handle.location.unwrap();
        assert!(path.exists());

        adapter.dispose_all().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_empty_series_still_renders() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut sink = SvgChartSink::new(temp_dir.path());

        let handle = sink
            .create(ChartId::PersonSavings, 1, &person_series(&[]))
            .unwrap();
        assert!(handle.location.unwrap().exists());
    }
}
