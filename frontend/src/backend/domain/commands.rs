//! Domain-level command and result types.
//! The CLI maps its arguments to these structs; services consume them and
//! return the result types.

pub mod personnel {
    use crate::backend::domain::form_validation::TitleChoice;
    use shared::{Notice, Personnel};

    /// Input of the personnel form. `no` is assigned by the service.
    #[derive(Debug, Clone, Default)]
    pub struct CreatePersonnelCommand {
        pub title: TitleChoice,
        pub name: String,
        pub birthday: String,
        pub workday: String,
        pub phone: String,
        pub address: String,
        pub idline: String,
        pub fb: String,
        pub remark: String,
    }

    /// Result of a successful personnel create.
    #[derive(Debug, Clone)]
    pub struct CreatePersonnelResult {
        pub personnel: Personnel,
        /// Number the form shows for the next record
        pub next_no: i64,
        pub notice: Notice,
    }
}

pub mod savings {
    use shared::{Notice, Saving};

    /// Input of the savings form. `no` and `person_name` are filled in by the service.
    #[derive(Debug, Clone, Default)]
    pub struct CreateSavingCommand {
        pub person_no: String,
        pub month: String,
        pub year: String,
        pub amount: String,
        pub remark: String,
    }

    /// Result of a successful savings create.
    #[derive(Debug, Clone)]
    pub struct CreateSavingResult {
        pub saving: Saving,
        pub next_no: i64,
        pub notice: Notice,
    }
}

pub mod loading {
    use crate::backend::domain::errors::ClientError;
    use shared::Sheet;

    /// What happened during one load of a collection.
    #[derive(Debug)]
    pub struct LoadOutcome {
        pub sheet: Sheet,
        /// Records painted from the local cache before the fetch, if any
        pub cached_count: Option<usize>,
        /// Records received from the remote fetch
        pub fetched: Result<usize, ClientError>,
        /// False when a newer load had already been applied
        pub applied: bool,
    }

    impl LoadOutcome {
        pub fn is_success(&self) -> bool {
            self.fetched.is_ok()
        }
    }
}

pub mod reports {
    use shared::{DashboardMetrics, PersonOption, ReportFilter, ReportRow, ReportSummary};

    /// Result of running the report pipeline over the current snapshot.
    #[derive(Debug, Clone)]
    pub struct ReportResult {
        /// Filter actually applied, after stale values were reset
        pub filter: ReportFilter,
        pub years: Vec<String>,
        pub persons: Vec<PersonOption>,
        pub rows: Vec<ReportRow>,
        pub summary: ReportSummary,
    }

    /// Dashboard metrics for one year.
    #[derive(Debug, Clone)]
    pub struct DashboardResult {
        pub metrics: DashboardMetrics,
    }
}
