use std::collections::HashMap;
use std::sync::Arc;

use log::{info, warn};
use shared::{Personnel, Saving};

use crate::backend::domain::buddhist_calendar::recent_years;
use crate::backend::domain::commands::savings::CreateSavingCommand;
use crate::backend::domain::errors::ClientError;
use crate::backend::domain::form_validation::FormValidator;
use crate::backend::domain::sequence::next_sequence_number;
use crate::backend::storage::traits::SheetsApi;

/// Previous years offered next to the current one on the savings form
pub const PREVIOUS_YEAR_CHOICES: usize = 5;

/// Service for recording savings contributions through the sheets API
#[derive(Clone)]
pub struct SavingsService {
    api: Arc<dyn SheetsApi>,
}

impl SavingsService {
    pub fn new(api: Arc<dyn SheetsApi>) -> Self {
        Self { api }
    }

    /// Next savings number from a fresh fetch, or from `snapshot` when the
    /// fetch fails
    pub async fn next_number(&self, snapshot: &[Saving]) -> i64 {
        match self.api.fetch_savings().await {
            Ok(records) => next_sequence_number(&records),
            Err(e) => {
                warn!(
                    "🗃️ STORE: Falling back to {} cached savings for next number: {}",
                    snapshot.len(),
                    e
                );
                next_sequence_number(snapshot)
            }
        }
    }

    /// Current year first, then the previous ones, newest first
    pub fn year_choices(&self, current_year: i32) -> Vec<i32> {
        recent_years(current_year, PREVIOUS_YEAR_CHOICES)
    }

    /// `"{title} {name}"` of the selected person
    pub fn selected_person_display(
        &self,
        personnel_index: &HashMap<String, Personnel>,
        person_no: &str,
    ) -> Option<String> {
        personnel_index
            .get(person_no)
            .map(|p| format!("{} {}", p.title, p.name))
    }

    /// Record to post; the person's name is copied from the index at write time
    pub fn build_record(
        &self,
        command: &CreateSavingCommand,
        personnel_index: &HashMap<String, Personnel>,
        no: i64,
    ) -> Saving {
        let person_name = personnel_index
            .get(&command.person_no)
            .map(|p| p.name.clone())
            .unwrap_or_default();

        Saving {
            no: no.to_string(),
            person_no: command.person_no.clone(),
            person_name,
            month: command.month.clone(),
            year: command.year.trim().to_string(),
            amount: command.amount.trim().to_string(),
            remark: command.remark.clone(),
        }
    }

    /// Validate the form against the index, then post it as record number `no`
    pub async fn create_saving(
        &self,
        command: &CreateSavingCommand,
        personnel_index: &HashMap<String, Personnel>,
        no: i64,
    ) -> Result<Saving, ClientError> {
        FormValidator::validate_saving(command, personnel_index)?;

        let record = self.build_record(command, personnel_index, no);
        info!(
            "🌐 API: Creating saving {} for {} ({} {}, {})",
            record.no, record.person_no, record.month, record.year, record.amount
        );
        self.api.create_saving(&record).await?;
        Ok(record)
    }
}
