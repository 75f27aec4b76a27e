//! In-memory sheets API used by unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use shared::{ApiStatusResponse, Personnel, Saving, Sheet};

use crate::backend::domain::errors::ClientError;
use crate::backend::storage::traits::SheetsApi;

#[derive(Default)]
pub struct FakeSheets {
    pub personnel: Mutex<Vec<Personnel>>,
    pub savings: Mutex<Vec<Saving>>,
    pub initialized: Mutex<Vec<Sheet>>,
    pub fail_fetches: AtomicBool,
    pub reject_writes: AtomicBool,
    pub fetch_count: AtomicUsize,
}

impl FakeSheets {
    pub fn with_records(personnel: Vec<Personnel>, savings: Vec<Saving>) -> Self {
        Self {
            personnel: Mutex::new(personnel),
            savings: Mutex::new(savings),
            ..Default::default()
        }
    }

    pub fn set_fail_fetches(&self, fail: bool) {
        self.fail_fetches.store(fail, Ordering::SeqCst);
    }

    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    fn check_fetch(&self, action: &str) -> Result<(), ClientError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetches.load(Ordering::SeqCst) {
            return Err(ClientError::HttpStatus {
                action: action.to_string(),
                status: 500,
            });
        }
        Ok(())
    }

    fn write_status(&self) -> Result<ApiStatusResponse, ClientError> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(ClientError::Rejected {
                status: "error".to_string(),
                message: Some("sheet locked".to_string()),
            });
        }
        Ok(ApiStatusResponse {
            status: "success".to_string(),
            message: None,
        })
    }
}

#[async_trait]
impl SheetsApi for FakeSheets {
    async fn initialize_sheet(&self, sheet: Sheet) -> Result<serde_json::Value, ClientError> {
        self.initialized.lock().unwrap().push(sheet);
        Ok(serde_json::json!({ "status": "success" }))
    }

    async fn fetch_personnel(&self) -> Result<Vec<Personnel>, ClientError> {
        self.check_fetch("fetching personnel")?;
        Ok(self.personnel.lock().unwrap().clone())
    }

    async fn fetch_savings(&self) -> Result<Vec<Saving>, ClientError> {
        self.check_fetch("fetching savings")?;
        Ok(self.savings.lock().unwrap().clone())
    }

    async fn create_personnel(&self, record: &Personnel) -> Result<ApiStatusResponse, ClientError> {
        let status = self.write_status()?;
        self.personnel.lock().unwrap().push(record.clone());
        Ok(status)
    }

    async fn create_saving(&self, record: &Saving) -> Result<ApiStatusResponse, ClientError> {
        let status = self.write_status()?;
        self.savings.lock().unwrap().push(record.clone());
        Ok(status)
    }
}
