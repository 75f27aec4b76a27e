//! # Backend Module
//!
//! The `Backend` is the single coordinator of the client. It owns the record
//! store, the next record numbers, the live dashboard charts and the domain
//! services, and it is the only place that talks to the sheets API and the
//! local cache.
//!
//! Loading a collection paints it from the cache first, then replaces it with
//! the remote result. Each load holds a ticket from the record store, so when
//! two loads of the same collection overlap the older one cannot overwrite the
//! newer one. The store lock is never held across a network call.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use log::{debug, error, info, warn};
use serde::de::DeserializeOwned;
use shared::{Personnel, PersonnelRow, ReportFilter, Saving, Sheet};
use tokio::sync::Mutex;

pub mod domain;
pub mod io;
pub mod storage;

use domain::aggregator::AggregatorConfig;
use domain::buddhist_calendar::current_buddhist_year;
use domain::chart_service::{ChartAdapter, ChartHandle, ChartSink};
use domain::commands::loading::LoadOutcome;
use domain::commands::personnel::{CreatePersonnelCommand, CreatePersonnelResult};
use domain::commands::reports::{DashboardResult, ReportResult};
use domain::commands::savings::{CreateSavingCommand, CreateSavingResult};
use domain::errors::ClientError;
use domain::export_service::{ExportConfig, ExportService};
use domain::notices;
use domain::record_store::{RecordSource, RecordStore};
use domain::report_filter::{apply_filter, distinct_persons, distinct_years, reconcile_filter};
use domain::{PersonnelService, ReportTableService, SavingsAggregator, SavingsService};
use io::{SvgPageSink, TextPageSink};
use storage::cache::decode_collection;
use storage::{RecordCache, SheetsApi};

/// Output format of a report export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// One text file, form feed between pages
    Text,
    /// One SVG per page
    Svg,
    /// The filtered rows as CSV
    Csv,
}

/// Settings the coordinator needs beyond its collaborators
#[derive(Debug, Clone)]
pub struct BackendOptions {
    pub top_persons: usize,
    pub export: ExportConfig,
    /// Where exported reports are written
    pub output_dir: PathBuf,
}

impl Default for BackendOptions {
    fn default() -> Self {
        Self {
            top_persons: AggregatorConfig::default().top_persons,
            export: ExportConfig::default(),
            output_dir: std::env::temp_dir().join("savings-tracker"),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct NextNumbers {
    personnel: Option<i64>,
    savings: Option<i64>,
}

/// Main backend struct that orchestrates all services
pub struct Backend {
    api: Arc<dyn SheetsApi>,
    cache: Arc<dyn RecordCache>,
    store: Mutex<RecordStore>,
    next_numbers: Mutex<NextNumbers>,
    charts: Mutex<ChartAdapter<Box<dyn ChartSink>>>,
    output_dir: PathBuf,
    pub personnel_service: PersonnelService,
    pub savings_service: SavingsService,
    pub aggregator: SavingsAggregator,
    pub report_table: ReportTableService,
    pub export_service: ExportService,
}

impl Backend {
    pub fn new(
        api: Arc<dyn SheetsApi>,
        cache: Arc<dyn RecordCache>,
        chart_sink: Box<dyn ChartSink>,
        options: BackendOptions,
    ) -> Self {
        Self {
            personnel_service: PersonnelService::new(api.clone()),
            savings_service: SavingsService::new(api.clone()),
            aggregator: SavingsAggregator::with_config(AggregatorConfig {
                top_persons: options.top_persons,
            }),
            report_table: ReportTableService::new(),
            export_service: ExportService::with_config(options.export),
            api,
            cache,
            store: Mutex::new(RecordStore::new()),
            next_numbers: Mutex::new(NextNumbers::default()),
            charts: Mutex::new(ChartAdapter::new(chart_sink)),
            output_dir: options.output_dir,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Startup sequence: make sure both sheets exist, load both collections,
    /// then work out the next record numbers
    pub async fn initialize(&self) -> (LoadOutcome, LoadOutcome) {
        info!("🚀 Initializing savings tracker backend");
        self.initialize_sheets().await;
        let outcomes = self.load_all().await;
        self.refresh_next_number(Sheet::Personnel).await;
        self.refresh_next_number(Sheet::Savings).await;
        outcomes
    }

    /// Ask the API to create both sheets if missing. Failures are only logged.
    pub async fn initialize_sheets(&self) {
        let (personnel, savings) = tokio::join!(
            self.api.initialize_sheet(Sheet::Personnel),
            self.api.initialize_sheet(Sheet::Savings)
        );
        for (sheet, result) in [(Sheet::Personnel, personnel), (Sheet::Savings, savings)] {
            match result {
                Ok(ack) => debug!("🌐 API: Initialize {} answered {}", sheet, ack),
                Err(e) => error!("❌ API: Failed to initialize {}: {}", sheet, e),
            }
        }
    }

    /// Reload both collections concurrently
    pub async fn load_all(&self) -> (LoadOutcome, LoadOutcome) {
        tokio::join!(self.load_personnel(), self.load_savings())
    }

    pub async fn load_personnel(&self) -> LoadOutcome {
        let sheet = Sheet::Personnel;
        let ticket = self.store.lock().await.begin_load(sheet);

        let cached_count = match self.read_cache::<Personnel>(sheet) {
            Some(records) => {
                let count = records.len();
                self.store
                    .lock()
                    .await
                    .apply_personnel(ticket, records, RecordSource::Cache);
                Some(count)
            }
            None => None,
        };

        match self.api.fetch_personnel().await {
            Ok(records) => {
                let count = records.len();
                let serialized = serde_json::to_string(&records);
                let applied = self
                    .store
                    .lock()
                    .await
                    .apply_personnel(ticket, records, RecordSource::Remote);
                if applied {
                    self.write_cache(sheet, serialized);
                }
                LoadOutcome {
                    sheet,
                    cached_count,
                    fetched: Ok(count),
                    applied,
                }
            }
            Err(e) => {
                error!("❌ API: Failed to load {}: {}", sheet, e);
                LoadOutcome {
                    sheet,
                    cached_count,
                    fetched: Err(e),
                    applied: false,
                }
            }
        }
    }

    pub async fn load_savings(&self) -> LoadOutcome {
        let sheet = Sheet::Savings;
        let ticket = self.store.lock().await.begin_load(sheet);

        let cached_count = match self.read_cache::<Saving>(sheet) {
            Some(records) => {
                let count = records.len();
                self.store
                    .lock()
                    .await
                    .apply_savings(ticket, records, RecordSource::Cache);
                Some(count)
            }
            None => None,
        };

        match self.api.fetch_savings().await {
            Ok(records) => {
                let count = records.len();
                let serialized = serde_json::to_string(&records);
                let applied = self
                    .store
                    .lock()
                    .await
                    .apply_savings(ticket, records, RecordSource::Remote);
                if applied {
                    self.write_cache(sheet, serialized);
                }
                LoadOutcome {
                    sheet,
                    cached_count,
                    fetched: Ok(count),
                    applied,
                }
            }
            Err(e) => {
                error!("❌ API: Failed to load {}: {}", sheet, e);
                LoadOutcome {
                    sheet,
                    cached_count,
                    fetched: Err(e),
                    applied: false,
                }
            }
        }
    }

    fn read_cache<T: DeserializeOwned>(&self, sheet: Sheet) -> Option<Vec<T>> {
        let key = sheet.cache_key();
        match self.cache.get(key) {
            Ok(Some(raw)) => decode_collection(key, &raw),
            Ok(None) => {
                debug!("💾 CACHE: No entry for {}", key);
                None
            }
            Err(e) => {
                warn!("💾 CACHE: Failed to read {}: {:#}", key, e);
                None
            }
        }
    }

    fn write_cache(&self, sheet: Sheet, serialized: serde_json::Result<String>) {
        let key = sheet.cache_key();
        let result = serialized
            .map_err(anyhow::Error::from)
            .and_then(|value| self.cache.set(key, &value));
        if let Err(e) = result {
            warn!("💾 CACHE: Failed to update {}: {:#}", key, e);
        }
    }

    /// Number the next record of `sheet` will get
    pub async fn next_number(&self, sheet: Sheet) -> i64 {
        let known = {
            let numbers = self.next_numbers.lock().await;
            match sheet {
                Sheet::Personnel => numbers.personnel,
                Sheet::Savings => numbers.savings,
            }
        };
        match known {
            Some(no) => no,
            None => self.refresh_next_number(sheet).await,
        }
    }

    /// Recompute the next number of `sheet` from a fresh fetch, falling back to
    /// the store snapshot
    pub async fn refresh_next_number(&self, sheet: Sheet) -> i64 {
        let no = match sheet {
            Sheet::Personnel => {
                let snapshot = self.personnel().await;
                self.personnel_service.next_number(&snapshot).await
            }
            Sheet::Savings => {
                let snapshot = self.savings().await;
                self.savings_service.next_number(&snapshot).await
            }
        };

        let mut numbers = self.next_numbers.lock().await;
        match sheet {
            Sheet::Personnel => numbers.personnel = Some(no),
            Sheet::Savings => numbers.savings = Some(no),
        }
        debug!("🗃️ STORE: Next {} number is {}", sheet, no);
        no
    }

    pub async fn create_personnel(
        &self,
        command: CreatePersonnelCommand,
    ) -> Result<CreatePersonnelResult, ClientError> {
        let no = self.next_number(Sheet::Personnel).await;
        let personnel = self
            .personnel_service
            .create_personnel(&command, no)
            .await
            .map_err(|e| log_write_failure(Sheet::Personnel, e))?;

        info!("✅ Created personnel {} ({})", personnel.no, personnel.name);
        self.load_personnel().await;
        let next_no = self.refresh_next_number(Sheet::Personnel).await;

        Ok(CreatePersonnelResult {
            personnel,
            next_no,
            notice: notices::saved(Sheet::Personnel),
        })
    }

    pub async fn create_saving(
        &self,
        command: CreateSavingCommand,
    ) -> Result<CreateSavingResult, ClientError> {
        let no = self.next_number(Sheet::Savings).await;
        let index = self.personnel_index().await;
        let saving = self
            .savings_service
            .create_saving(&command, &index, no)
            .await
            .map_err(|e| log_write_failure(Sheet::Savings, e))?;

        info!(
            "✅ Created saving {} for {} ({})",
            saving.no, saving.person_no, saving.amount
        );
        self.load_savings().await;
        let next_no = self.refresh_next_number(Sheet::Savings).await;

        Ok(CreateSavingResult {
            saving,
            next_no,
            notice: notices::saved(Sheet::Savings),
        })
    }

    /// Dashboard figures for a Buddhist-era year, the current one by default
    pub async fn dashboard(&self, year: Option<i32>) -> DashboardResult {
        let year = year.unwrap_or_else(current_buddhist_year);
        let store = self.store.lock().await;
        let metrics =
            self.aggregator
                .dashboard_metrics(store.loaded_savings(), store.personnel_count(), year);
        info!(
            "📊 DASHBOARD: Total {:.2} from {} records for {}",
            metrics.total_savings, metrics.savings_record_count, year
        );
        DashboardResult { metrics }
    }

    /// Redraw both dashboard charts, disposing the previous ones
    pub async fn update_charts(&self, dashboard: &DashboardResult) -> anyhow::Result<Vec<ChartHandle>> {
        self.charts.lock().await.render_dashboard(&dashboard.metrics)
    }

    pub async fn dispose_charts(&self) -> anyhow::Result<()> {
        self.charts.lock().await.dispose_all()
    }

    /// Filtered report over the current savings collection. Filter values that
    /// no longer exist in the data are reset to `All` first.
    pub async fn report(&self, filter: &ReportFilter) -> ReportResult {
        let store = self.store.lock().await;
        let savings = store.savings();

        let years = distinct_years(savings);
        let persons = distinct_persons(savings);
        let filter = reconcile_filter(filter, &years, &persons);
        let filtered = apply_filter(savings, &filter);

        info!(
            "📊 REPORT: {} of {} records match year={} month={} person={}",
            filtered.len(),
            savings.len(),
            filter.year,
            filter.month,
            filter.person_no
        );

        ReportResult {
            rows: self.report_table.format_rows(&filtered),
            summary: self.report_table.summarize(&filtered),
            filter,
            years,
            persons,
        }
    }

    /// Write `report` to the output directory
    pub async fn export_report(
        &self,
        report: &ReportResult,
        format: ExportFormat,
        today: NaiveDate,
    ) -> Result<Vec<PathBuf>, ClientError> {
        let service = &self.export_service;
        let result = match format {
            ExportFormat::Csv => {
                let stem = service.file_stem(&report.filter, &report.persons);
                service
                    .export_csv(&report.rows, &self.output_dir, &stem)
                    .map(|path| vec![path])
            }
            ExportFormat::Text | ExportFormat::Svg => {
                let document = service.build_document(
                    &report.filter,
                    &report.persons,
                    &report.rows,
                    &report.summary,
                    today,
                );
                if format == ExportFormat::Text {
                    service.export_document(&document, &mut TextPageSink::new(&self.output_dir))
                } else {
                    service.export_document(&document, &mut SvgPageSink::new(&self.output_dir))
                }
            }
        };

        result.map_err(|e| {
            error!("❌ EXPORT: {:#}", e);
            ClientError::Export(format!("{:#}", e))
        })
    }

    /// Personnel table rows, newest first
    pub async fn personnel_rows(&self) -> Vec<PersonnelRow> {
        let store = self.store.lock().await;
        self.report_table.format_personnel_rows(store.personnel())
    }

    pub async fn personnel(&self) -> Vec<Personnel> {
        self.store.lock().await.personnel().to_vec()
    }

    pub async fn savings(&self) -> Vec<Saving> {
        self.store.lock().await.savings().to_vec()
    }

    pub async fn personnel_index(&self) -> HashMap<String, Personnel> {
        self.store.lock().await.personnel_index().clone()
    }

    /// `"{title} {name}"` for the savings form's person picker
    pub async fn selected_person_display(&self, person_no: &str) -> Option<String> {
        let store = self.store.lock().await;
        self.savings_service
            .selected_person_display(store.personnel_index(), person_no)
    }

    pub fn year_choices(&self) -> Vec<i32> {
        self.savings_service.year_choices(current_buddhist_year())
    }
}

fn log_write_failure(sheet: Sheet, error: ClientError) -> ClientError {
    match &error {
        ClientError::Validation(form) => {
            warn!("⚠️ Form for {} rejected at {}: {}", sheet, form.field(), form)
        }
        other => error!("❌ API: Failed to save {}: {}", sheet, other),
    }
    error
}
