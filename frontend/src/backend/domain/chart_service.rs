//! Dashboard chart shaping and chart lifecycle.
//!
//! Aggregates become `ChartSeries` (labels, values, series label) and are handed
//! to a `ChartSink`. The adapter owns one handle per chart. Every update
//! disposes the existing chart before a new one is created; charts are never
//! patched in place.

use std::path::PathBuf;

use anyhow::Result;
use log::{debug, info, warn};
use shared::{ChartSeries, DashboardMetrics, MonthlyTotal, PersonTotal};

/// Longest person name shown on the contributor chart before it is cut
pub const MAX_PERSON_LABEL_CHARS: usize = 15;

/// Series label of the contributor chart
pub const PERSON_SERIES_LABEL: &str = "ยอดเงินออมรวม";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartId {
    MonthlySavings,
    PersonSavings,
}

impl ChartId {
    pub fn name(&self) -> &'static str {
        match self {
            ChartId::MonthlySavings => "monthly-savings-chart",
            ChartId::PersonSavings => "person-savings-chart",
        }
    }

    /// Monthly bars stand up; contributor bars lie along the value axis
    pub fn orientation(&self) -> BarOrientation {
        match self {
            ChartId::MonthlySavings => BarOrientation::Vertical,
            ChartId::PersonSavings => BarOrientation::Horizontal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarOrientation {
    Vertical,
    Horizontal,
}

/// A chart currently alive in a sink
#[derive(Debug, Clone, PartialEq)]
pub struct ChartHandle {
    pub chart: ChartId,
    /// Increases with every chart the adapter creates
    pub generation: u64,
    /// Where the sink put the rendered chart, if it produces a file
    pub location: Option<PathBuf>,
}

/// Something that can draw a bar chart and later tear it down
pub trait ChartSink: Send {
    fn create(&mut self, chart: ChartId, generation: u64, series: &ChartSeries) -> Result<ChartHandle>;

    fn dispose(&mut self, handle: ChartHandle) -> Result<()>;
}

impl<S: ChartSink + ?Sized> ChartSink for Box<S> {
    fn create(&mut self, chart: ChartId, generation: u64, series: &ChartSeries) -> Result<ChartHandle> {
        (**self).create(chart, generation, series)
    }

    fn dispose(&mut self, handle: ChartHandle) -> Result<()> {
        (**self).dispose(handle)
    }
}

/// Twelve monthly buckets as a chart series for the given Buddhist-era year
pub fn monthly_series(totals: &[MonthlyTotal], year: i32) -> ChartSeries {
    ChartSeries {
        labels: totals.iter().map(|t| t.label.clone()).collect(),
        values: totals.iter().map(|t| t.total).collect(),
        series_label: format!("ยอดเงินออมรายเดือน ปี {}", year),
    }
}

/// Top contributors as a chart series, names cut to fit the axis
pub fn person_series(top: &[PersonTotal]) -> ChartSeries {
    ChartSeries {
        labels: top.iter().map(|t| truncate_label(&t.person_name)).collect(),
        values: top.iter().map(|t| t.total).collect(),
        series_label: PERSON_SERIES_LABEL.to_string(),
    }
}

/// First 15 characters followed by "..." when the name is longer
pub fn truncate_label(name: &str) -> String {
    if name.chars().count() > MAX_PERSON_LABEL_CHARS {
        let head: String = name.chars().take(MAX_PERSON_LABEL_CHARS).collect();
        format!("{}...", head)
    } else {
        name.to_string()
    }
}

pub struct ChartAdapter<S: ChartSink> {
    sink: S,
    monthly: Option<ChartHandle>,
    person: Option<ChartHandle>,
    generation: u64,
}

impl<S: ChartSink> ChartAdapter<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            monthly: None,
            person: None,
            generation: 0,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn handle(&self, chart: ChartId) -> Option<&ChartHandle> {
        match chart {
            ChartId::MonthlySavings => self.monthly.as_ref(),
            ChartId::PersonSavings => self.person.as_ref(),
        }
    }

    /// Replace `chart` with a new one drawn from `series`
    pub fn render(&mut self, chart: ChartId, series: &ChartSeries) -> Result<ChartHandle> {
        let slot = match chart {
            ChartId::MonthlySavings => &mut self.monthly,
            ChartId::PersonSavings => &mut self.person,
        };

        if let Some(previous) = slot.take() {
            debug!(
                "📈 CHART: Disposing {} generation {}",
                chart.name(),
                previous.generation
            );
            if let Err(e) = self.sink.dispose(previous.clone()) {
                *slot = Some(previous);
                return Err(e);
            }
        }

        self.generation += 1;
        let handle = self.sink.create(chart, self.generation, series)?;
        debug!(
            "📈 CHART: Created {} generation {} with {} bars",
            chart.name(),
            handle.generation,
            series.values.len()
        );
        *slot = Some(handle.clone());
        Ok(handle)
    }

    /// Redraw both dashboard charts from fresh metrics
    pub fn render_dashboard(&mut self, metrics: &DashboardMetrics) -> Result<Vec<ChartHandle>> {
        let monthly = self.render(
            ChartId::MonthlySavings,
            &monthly_series(&metrics.monthly_totals, metrics.year),
        )?;
        let person = self.render(ChartId::PersonSavings, &person_series(&metrics.top_persons))?;
        info!("📈 CHART: Dashboard charts updated for year {}", metrics.year);
        Ok(vec![monthly, person])
    }

    /// Tear down every live chart
    ///
    /// Every chart is attempted. A chart whose dispose fails stays owned by the
    /// adapter and the first error is returned.
    pub fn dispose_all(&mut self) -> Result<()> {
        let mut first_error = None;
        for slot in [&mut self.monthly, &mut self.person] {
            if let Some(handle) = slot.take() {
                if let Err(e) = self.sink.dispose(handle.clone()) {
                    warn!("⚠️ CHART: Failed to dispose {}: {}", handle.chart.name(), e);
                    *slot = Some(handle);
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
