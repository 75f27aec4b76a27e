use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Reads a spreadsheet cell as a string.
///
/// The sheets API hands cells back as whatever type the spreadsheet inferred,
/// so `no`, `year` and `amount` frequently arrive as JSON numbers. Every cell is
/// normalized to its textual form; `null` and missing cells become `""`.
pub fn deserialize_cell<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(serde_json::Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    })
}

/// A personnel record as stored in the `personnel` sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Personnel {
    /// Client-assigned sequence number
    #[serde(default, deserialize_with = "deserialize_cell")]
    pub no: String,
    #[serde(default, deserialize_with = "deserialize_cell")]
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_cell")]
    pub name: String,
    /// D/M/YYYY, Buddhist-era year
    #[serde(default, deserialize_with = "deserialize_cell")]
    pub birthday: String,
    /// D/M/YYYY, Buddhist-era year
    #[serde(default, deserialize_with = "deserialize_cell")]
    pub workday: String,
    #[serde(default, deserialize_with = "deserialize_cell")]
    pub phone: String,
    #[serde(default, deserialize_with = "deserialize_cell")]
    pub address: String,
    #[serde(default, deserialize_with = "deserialize_cell")]
    pub idline: String,
    #[serde(default, deserialize_with = "deserialize_cell")]
    pub fb: String,
    /// The sheet header for this column is `remake`
    #[serde(rename = "remake", alias = "remark", default, deserialize_with = "deserialize_cell")]
    pub remark: String,
}

/// A monthly savings contribution as stored in the `savings` sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Saving {
    #[serde(default, deserialize_with = "deserialize_cell")]
    pub no: String,
    /// Foreign key into `Personnel::no`
    #[serde(default, deserialize_with = "deserialize_cell")]
    pub person_no: String,
    /// Snapshot of the person's name taken when the record was written
    #[serde(default, deserialize_with = "deserialize_cell")]
    pub person_name: String,
    /// One of the twelve Thai month labels
    #[serde(default, deserialize_with = "deserialize_cell")]
    pub month: String,
    /// Buddhist-era year
    #[serde(default, deserialize_with = "deserialize_cell")]
    pub year: String,
    /// Decimal amount in baht
    #[serde(default, deserialize_with = "deserialize_cell")]
    pub amount: String,
    #[serde(default, deserialize_with = "deserialize_cell")]
    pub remark: String,
}

/// Named collections exposed by the remote sheets API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sheet {
    Personnel,
    Savings,
}

impl Sheet {
    /// Name used in the `sheet` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            Sheet::Personnel => "personnel",
            Sheet::Savings => "savings",
        }
    }

    /// Key under which the last fetched collection is mirrored locally
    pub fn cache_key(&self) -> &'static str {
        match self {
            Sheet::Personnel => "personnelData",
            Sheet::Savings => "savingsData",
        }
    }
}

impl fmt::Display for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response body of a create request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiStatusResponse {
    #[serde(default, deserialize_with = "deserialize_cell")]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiStatusResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Token used for the wildcard filter value
pub const FILTER_ALL: &str = "all";

/// One dimension of the report filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FilterValue {
    /// No constraint on this dimension
    #[default]
    All,
    /// Exact string match
    Exact(String),
}

impl FilterValue {
    /// Parse a selector value; `"all"` and empty input mean no constraint
    pub fn parse(value: &str) -> Self {
        if value.is_empty() || value == FILTER_ALL {
            FilterValue::All
        } else {
            FilterValue::Exact(value.to_string())
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, FilterValue::All)
    }

    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            FilterValue::All => true,
            FilterValue::Exact(expected) => expected == candidate,
        }
    }

    pub fn as_exact(&self) -> Option<&str> {
        match self {
            FilterValue::All => None,
            FilterValue::Exact(value) => Some(value.as_str()),
        }
    }
}

impl From<Option<String>> for FilterValue {
    fn from(value: Option<String>) -> Self {
        value.map(|v| FilterValue::parse(&v)).unwrap_or_default()
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::All => f.write_str(FILTER_ALL),
            FilterValue::Exact(value) => f.write_str(value),
        }
    }
}

/// Current state of the three report selectors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    pub year: FilterValue,
    pub month: FilterValue,
    pub person_no: FilterValue,
}

impl ReportFilter {
    pub fn all() -> Self {
        Self::default()
    }
}

/// An entry of the person selector in the report view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonOption {
    pub person_no: String,
    pub person_name: String,
}

impl PersonOption {
    /// Text shown in the selector, e.g. "3 - สมชาย ใจดี"
    pub fn label(&self) -> String {
        format!("{} - {}", self.person_no, self.person_name)
    }
}

/// Labels and values handed to a chart sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub series_label: String,
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Sum of savings for one calendar month label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    pub label: String,
    pub total: f64,
}

/// Summed savings for one `(person_no, person_name)` group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonTotal {
    pub person_no: String,
    pub person_name: String,
    pub total: f64,
}

/// Headline numbers of the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub total_personnel: usize,
    pub total_savings: f64,
    pub average_per_person: f64,
    pub savings_record_count: usize,
    /// Buddhist-era year the monthly totals were computed for
    pub year: i32,
    pub monthly_totals: Vec<MonthlyTotal>,
    pub top_persons: Vec<PersonTotal>,
}

/// A savings record prepared for the report table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub no: String,
    pub person_name: String,
    pub month: String,
    pub year: String,
    pub formatted_amount: String,
    pub remark: String,
    pub raw_amount: f64,
}

/// A personnel record prepared for the personnel table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonnelRow {
    pub no: String,
    pub title: String,
    pub name: String,
    pub birthday: String,
    pub workday: String,
    pub phone: String,
    pub address: String,
    pub idline: String,
    pub fb: String,
    pub remark: String,
}

/// Summary block shown under the report table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub record_count: usize,
    pub total_amount: String,
    pub average_amount: String,
    pub raw_total: f64,
    pub raw_average: f64,
}

/// Severity of a modal notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A modal dialog: title, explanatory text and a single acknowledgment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    pub text: Option<String>,
    pub level: NoticeLevel,
}

impl Notice {
    pub fn new(level: NoticeLevel, title: impl Into<String>, text: Option<String>) -> Self {
        Self {
            title: title.into(),
            text,
            level,
        }
    }

    pub fn success(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, title, Some(text.into()))
    }

    pub fn warning(title: impl Into<String>, text: Option<String>) -> Self {
        Self::new(NoticeLevel::Warning, title, text)
    }

    pub fn error(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, title, Some(text.into()))
    }

    /// Text of the single acknowledgment button
    pub fn confirm_label(&self) -> &'static str {
        "ตกลง"
    }
}
