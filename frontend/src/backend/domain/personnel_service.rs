use std::sync::Arc;

use log::{info, warn};
use shared::Personnel;

use crate::backend::domain::commands::personnel::CreatePersonnelCommand;
use crate::backend::domain::errors::ClientError;
use crate::backend::domain::form_validation::FormValidator;
use crate::backend::domain::sequence::next_sequence_number;
use crate::backend::storage::traits::SheetsApi;

/// Service for registering personnel through the sheets API
#[derive(Clone)]
pub struct PersonnelService {
    api: Arc<dyn SheetsApi>,
}

impl PersonnelService {
    pub fn new(api: Arc<dyn SheetsApi>) -> Self {
        Self { api }
    }

    /// Next personnel number from a fresh fetch, or from `snapshot` when the
    /// fetch fails
    pub async fn next_number(&self, snapshot: &[Personnel]) -> i64 {
        match self.api.fetch_personnel().await {
            Ok(records) => next_sequence_number(&records),
            Err(e) => {
                warn!(
                    "🗃️ STORE: Falling back to {} cached personnel for next number: {}",
                    snapshot.len(),
                    e
                );
                next_sequence_number(snapshot)
            }
        }
    }

    pub fn build_record(&self, command: &CreatePersonnelCommand, no: i64) -> Personnel {
        Personnel {
            no: no.to_string(),
            title: command.title.resolve(),
            name: command.name.clone(),
            birthday: command.birthday.clone(),
            workday: command.workday.clone(),
            phone: command.phone.clone(),
            address: command.address.clone(),
            idline: command.idline.clone(),
            fb: command.fb.clone(),
            remark: command.remark.clone(),
        }
    }

    /// Validate the form, then post it as record number `no`
    pub async fn create_personnel(
        &self,
        command: &CreatePersonnelCommand,
        no: i64,
    ) -> Result<Personnel, ClientError> {
        FormValidator::validate_personnel(command)?;

        let record = self.build_record(command, no);
        info!("🌐 API: Creating personnel {} ({})", record.no, record.name);
        self.api.create_personnel(&record).await?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::form_validation::{FormError, TitleChoice};
    use crate::backend::storage::remote::fake_sheets::FakeSheets;

    fn person(no: &str) -> Personnel {
        Personnel {
            no: no.to_string(),
            name: format!("คนที่ {}", no),
            ..Default::default()
        }
    }

    fn command() -> CreatePersonnelCommand {
        CreatePersonnelCommand {
            title: TitleChoice::from_selection("custom", "  ดร. "),
            name: "สมชาย ใจดี".to_string(),
            birthday: "1/1/2539".to_string(),
            phone: "0812345678".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_next_number_from_fresh_fetch() {
        let api = Arc::new(FakeSheets::with_records(vec![person("4"), person("9")], vec![]));
        let service = PersonnelService::new(api);

        assert_eq!(service.next_number(&[person("1")]).await, 10);
    }

    #[tokio::test]
    async fn test_next_number_falls_back_to_snapshot() {
        let api = Arc::new(FakeSheets::with_records(vec![person("40")], vec![]));
        api.set_fail_fetches(true);
        let service = PersonnelService::new(api);

        assert_eq!(service.next_number(&[person("2"), person("x")]).await, 3);
        assert_eq!(service.next_number(&[]).await, 1);
    }

    #[tokio::test]
    async fn test_create_personnel_posts_resolved_title() {
        let api = Arc::new(FakeSheets::default());
        let service = PersonnelService::new(api.clone());

        let record = service.create_personnel(&command(), 7).await.unwrap();
        assert_eq!(record.no, "7");
        assert_eq!(record.title, "ดร.");
        assert_eq!(record.phone, "0812345678");
        assert_eq!(api.personnel.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_api() {
        let api = Arc::new(FakeSheets::default());
        let service = PersonnelService::new(api.clone());

        let mut bad = command();
        bad.birthday = "31/2/2540".to_string();
        let err = service.create_personnel(&bad, 1).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(FormError::InvalidDate { .. })));

        let mut bad = command();
        bad.name = "   ".to_string();
        let err = service.create_personnel(&bad, 1).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(FormError::MissingName)));

        assert!(api.personnel.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_write() {
        let api = Arc::new(FakeSheets::default());
        api.set_reject_writes(true);
        let service = PersonnelService::new(api);

        let err = service.create_personnel(&command(), 1).await.unwrap_err();
        assert!(matches!(err, ClientError::Rejected { .. }));
    }
}
