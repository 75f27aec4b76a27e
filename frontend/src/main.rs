//! `savings-tracker`: terminal client for the personnel savings sheets.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, info};
use shared::{FilterValue, ReportFilter, Sheet};

use savings_tracker::backend::domain::buddhist_calendar::{
    current_buddhist_year, month_label, DateValidator,
};
use savings_tracker::backend::domain::commands::personnel::CreatePersonnelCommand;
use savings_tracker::backend::domain::commands::savings::CreateSavingCommand;
use savings_tracker::backend::domain::form_validation::TitleChoice;
use savings_tracker::backend::domain::money_format::MoneyFormatter;
use savings_tracker::backend::domain::notices;
use savings_tracker::backend::domain::sheet_values::amount_value;
use savings_tracker::backend::io::SvgChartSink;
use savings_tracker::backend::storage::{JsonFileCache, SheetsClient};
use savings_tracker::backend::{Backend, ExportFormat};
use savings_tracker::config::AppConfig;
use savings_tracker::ui::render;
use savings_tracker::ui::{Action, AppState};

/// Personnel savings tracker.
#[derive(Parser, Debug)]
#[command(name = "savings-tracker", version, about = "Personnel savings tracker")]
struct Cli {
    /// Path to the config file (default: <config_dir>/savings-tracker/config.yaml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Sheets API endpoint, overrides the config file.
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Cache directory, overrides the config file.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output directory for charts and exports, overrides the config file.
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the sheets if needed and load both collections.
    Init {
        /// Also write the effective config to the config file.
        #[arg(long)]
        write_config: bool,
    },

    /// Personnel records.
    Personnel {
        #[command(subcommand)]
        action: PersonnelAction,
    },

    /// Savings records.
    Savings {
        #[command(subcommand)]
        action: SavingsAction,
    },

    /// Totals, monthly buckets and top savers; draws the charts.
    Dashboard {
        /// Buddhist-era year (default: current year).
        #[arg(long)]
        year: Option<i32>,
    },

    /// Filtered savings report.
    Report {
        /// Buddhist-era year, or "all".
        #[arg(long)]
        year: Option<String>,
        /// Thai month name or 1-12, or "all".
        #[arg(long)]
        month: Option<String>,
        /// Person number, or "all".
        #[arg(long)]
        person: Option<String>,
        /// Write the report as paginated pages.
        #[arg(long, value_enum)]
        export: Option<PageFormat>,
        /// Write the filtered rows as CSV.
        #[arg(long)]
        csv: bool,
    },

    /// Check a D/M/YYYY Buddhist-era date.
    ValidateDate {
        value: String,
    },

    /// Reload both collections from the API.
    Refresh,
}

#[derive(Subcommand, Debug)]
enum PersonnelAction {
    /// Show the personnel table.
    List,

    /// Register a person.
    Add {
        /// นาย, นาง, นางสาว or "custom".
        #[arg(long, default_value = "นาย")]
        title: String,
        /// Title text used with --title custom.
        #[arg(long, default_value = "")]
        custom_title: String,
        #[arg(long)]
        name: String,
        /// D/M/YYYY, Buddhist era.
        #[arg(long, default_value = "")]
        birthday: String,
        /// D/M/YYYY, Buddhist era.
        #[arg(long, default_value = "")]
        workday: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        address: String,
        #[arg(long, default_value = "")]
        idline: String,
        #[arg(long, default_value = "")]
        fb: String,
        #[arg(long, default_value = "")]
        remark: String,
    },
}

#[derive(Subcommand, Debug)]
enum SavingsAction {
    /// Show every savings record.
    List,

    /// Record a contribution.
    Add {
        /// Person number.
        #[arg(long)]
        person: String,
        /// Thai month name or 1-12.
        #[arg(long)]
        month: String,
        /// Buddhist-era year (default: current year).
        #[arg(long)]
        year: Option<String>,
        #[arg(long)]
        amount: String,
        #[arg(long, default_value = "")]
        remark: String,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum PageFormat {
    Text,
    Svg,
}

impl From<PageFormat> for ExportFormat {
    fn from(format: PageFormat) -> Self {
        match format {
            PageFormat::Text => ExportFormat::Text,
            PageFormat::Svg => ExportFormat::Svg,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.api_url.clone() {
        config.api_url = url;
    }
    if let Some(dir) = cli.data_dir.clone() {
        config.data_dir = dir;
    }
    if let Some(dir) = cli.output_dir.clone() {
        config.output_dir = dir;
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();
    debug!("Effective config: {:?}", config);

    if let Commands::ValidateDate { value } = &cli.command {
        return validate_date(value);
    }

    let backend = build_backend(&config)?;
    let state = AppState::new();

    let state = match cli.command {
        Commands::Init { write_config } => {
            if write_config {
                let path = cli
                    .config
                    .clone()
                    .or_else(AppConfig::default_path)
                    .context("No config directory available")?;
                config.save(&path)?;
                println!("Config written to {}", path.display());
            }
            let (personnel, savings) = backend.initialize().await;
            let state = state
                .reduce(Action::from_outcome(&personnel))
                .reduce(Action::from_outcome(&savings));
            let state = with_next_numbers(&backend, state).await;
            println!(
                "บุคลากร: {:?}, การออม: {:?}",
                state.personnel_status, state.savings_status
            );
            println!(
                "ลำดับถัดไป: บุคลากร {}, การออม {}",
                state.next_personnel_no.unwrap_or(1),
                state.next_saving_no.unwrap_or(1)
            );
            state
        }
        Commands::Refresh => {
            let state = load(&backend, state).await;
            println!(
                "บุคลากร {} รายการ, การออม {} รายการ",
                backend.personnel().await.len(),
                backend.savings().await.len()
            );
            state
        }
        Commands::Personnel { action } => match action {
            PersonnelAction::List => {
                let state = load(&backend, state).await;
                let rows = backend.personnel_rows().await;
                println!("{}", render::render_personnel(&rows, state.personnel_status));
                state
            }
            PersonnelAction::Add {
                title,
                custom_title,
                name,
                birthday,
                workday,
                phone,
                address,
                idline,
                fb,
                remark,
            } => {
                let (personnel, _) = backend.initialize().await;
                let state = state.reduce(Action::from_outcome(&personnel));
                let command = CreatePersonnelCommand {
                    title: TitleChoice::from_selection(&title, &custom_title),
                    name,
                    birthday,
                    workday,
                    phone,
                    address,
                    idline,
                    fb,
                    remark,
                };
                match backend.create_personnel(command).await {
                    Ok(result) => {
                        println!("ลำดับที่ {}: {}", result.personnel.no, result.personnel.name);
                        state.reduce(Action::RecordSaved {
                            sheet: Sheet::Personnel,
                            next_no: result.next_no,
                            notice: result.notice,
                        })
                    }
                    Err(e) => state.reduce(Action::Notify(notices::write_failed(&e))),
                }
            }
        },
        Commands::Savings { action } => match action {
            SavingsAction::List => {
                let state = load(&backend, state).await;
                let report = backend.report(&ReportFilter::all()).await;
                println!("{}", render::render_report(&report, state.savings_status));
                state.reduce(Action::ReportUpdated(report))
            }
            SavingsAction::Add {
                person,
                month,
                year,
                amount,
                remark,
            } => {
                let (_, savings) = backend.initialize().await;
                let state = state.reduce(Action::from_outcome(&savings));
                if let Some(display) = backend.selected_person_display(&person).await {
                    info!("Recording savings for {}", display);
                }
                let command = CreateSavingCommand {
                    person_no: person,
                    month: resolve_month(&month),
                    year: year.unwrap_or_else(|| current_buddhist_year().to_string()),
                    amount,
                    remark,
                };
                match backend.create_saving(command).await {
                    Ok(result) => {
                        println!(
                            "ลำดับที่ {}: {} {} {} {}",
                            result.saving.no,
                            result.saving.person_name,
                            result.saving.month,
                            result.saving.year,
                            MoneyFormatter::new().format(amount_value(&result.saving.amount), true)
                        );
                        state.reduce(Action::RecordSaved {
                            sheet: Sheet::Savings,
                            next_no: result.next_no,
                            notice: result.notice,
                        })
                    }
                    Err(e) => state.reduce(Action::Notify(notices::write_failed(&e))),
                }
            }
        },
        Commands::Dashboard { year } => {
            let state = load(&backend, state).await;
            let dashboard = backend.dashboard(year).await;
            println!("{}", render::render_dashboard(&dashboard.metrics, &MoneyFormatter::new()));

            let state = match backend.update_charts(&dashboard).await {
                Ok(handles) => {
                    println!("\n{}", render::render_chart_files(&handles));
                    state
                }
                Err(e) => {
                    log::error!("📈 CHART: {:#}", e);
                    state
                }
            };
            state.reduce(Action::DashboardUpdated(dashboard.metrics))
        }
        Commands::Report {
            year,
            month,
            person,
            export,
            csv,
        } => {
            let state = load(&backend, state).await;
            let filter = ReportFilter {
                year: FilterValue::from(year),
                month: FilterValue::from(month.map(|m| resolve_month(&m))),
                person_no: FilterValue::from(person),
            };
            let state = state.reduce(Action::FilterChanged(filter));
            let report = backend.report(&state.filter).await;
            println!("{}", render::render_report(&report, state.savings_status));

            let today = chrono::Local::now().date_naive();
            let mut formats: Vec<ExportFormat> = export.map(ExportFormat::from).into_iter().collect();
            if csv {
                formats.push(ExportFormat::Csv);
            }

            let mut state = state;
            for format in formats {
                let notice = match backend.export_report(&report, format, today).await {
                    Ok(files) => notices::exported(files.as_slice()),
                    Err(_) => notices::export_failed(),
                };
                state = state.reduce(Action::Notify(notice));
            }
            state.reduce(Action::ReportUpdated(report))
        }
        Commands::ValidateDate { .. } => state,
    };

    show_notices(state);
    Ok(())
}

fn build_backend(config: &AppConfig) -> Result<Backend> {
    config.validate()?;
    info!("Using sheets API at {}", config.api_url);

    let api = Arc::new(SheetsClient::new(config.api_url.clone()));
    let cache = Arc::new(JsonFileCache::new(&config.data_dir));
    let charts = Box::new(SvgChartSink::new(config.output_dir.join("charts")));
    Ok(Backend::new(api, cache, charts, config.backend_options()))
}

async fn load(backend: &Backend, state: AppState) -> AppState {
    let state = state
        .reduce(Action::LoadStarted(Sheet::Personnel))
        .reduce(Action::LoadStarted(Sheet::Savings));
    let (personnel, savings) = backend.load_all().await;
    state
        .reduce(Action::from_outcome(&personnel))
        .reduce(Action::from_outcome(&savings))
}

async fn with_next_numbers(backend: &Backend, state: AppState) -> AppState {
    let personnel = backend.next_number(Sheet::Personnel).await;
    let savings = backend.next_number(Sheet::Savings).await;
    state
        .reduce(Action::NextNumber {
            sheet: Sheet::Personnel,
            next_no: personnel,
        })
        .reduce(Action::NextNumber {
            sheet: Sheet::Savings,
            next_no: savings,
        })
}

/// Thai month name as given, or the name of a month number
fn resolve_month(input: &str) -> String {
    input
        .trim()
        .parse::<u32>()
        .ok()
        .and_then(month_label)
        .map(str::to_string)
        .unwrap_or_else(|| input.to_string())
}

fn validate_date(value: &str) -> Result<()> {
    match DateValidator::validate(value) {
        Ok(()) => {
            println!("✅ {}", if value.is_empty() { "(ว่าง)" } else { value });
            Ok(())
        }
        Err(e) => {
            println!("❌ {}\n   {}", e.title(), e.message());
            std::process::exit(1);
        }
    }
}

fn show_notices(mut state: AppState) {
    while let Some(notice) = state.current_notice() {
        println!("\n{}", render::render_notice(notice));
        state = state.reduce(Action::DismissNotice);
    }
}
