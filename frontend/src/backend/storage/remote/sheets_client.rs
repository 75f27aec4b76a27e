//! # Sheets HTTP Client
//!
//! `reqwest` implementation of [`SheetsApi`] against a single endpoint URL.
//!
//! | Operation            | Request                                   |
//! |----------------------|-------------------------------------------|
//! | initialize sheet     | `GET ?action=initialize&sheet={sheet}`     |
//! | fetch personnel      | `GET`                                      |
//! | fetch savings        | `GET ?sheet=savings`                       |
//! | create personnel     | `POST` with one JSON record               |
//! | create saving        | `POST ?sheet=savings` with one JSON record |

use async_trait::async_trait;
use log::{debug, error, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::{ApiStatusResponse, Personnel, Saving, Sheet};

use crate::backend::domain::errors::ClientError;
use crate::backend::storage::traits::SheetsApi;

#[derive(Clone)]
pub struct SheetsClient {
    http: reqwest::Client,
    endpoint: String,
}

impl SheetsClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_http_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_http_client(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Query parameters of a read; personnel is the endpoint's default sheet
    fn read_query(sheet: Sheet) -> Vec<(&'static str, &'static str)> {
        match sheet {
            Sheet::Personnel => Vec::new(),
            Sheet::Savings => vec![("sheet", Sheet::Savings.as_str())],
        }
    }

    async fn get_text(
        &self,
        query: &[(&str, &str)],
        action: &str,
    ) -> Result<String, ClientError> {
        debug!("🌐 API: GET {} {:?}", self.endpoint, query);
        let response = self
            .http
            .get(&self.endpoint)
            .query(query)
            .send()
            .await
            .map_err(|e| ClientError::transport(action, e))?;

        Self::read_body(response, action).await
    }

    async fn post_record<T: Serialize + Sync>(
        &self,
        sheet: Sheet,
        record: &T,
        action: &str,
    ) -> Result<ApiStatusResponse, ClientError> {
        debug!("🌐 API: POST {} sheet={}", self.endpoint, sheet);
        let response = self
            .http
            .post(&self.endpoint)
            .query(&Self::read_query(sheet))
            .json(record)
            .send()
            .await
            .map_err(|e| ClientError::transport(action, e))?;

        let body = Self::read_body(response, action).await?;
        let status: ApiStatusResponse = serde_json::from_str(&body)
            .map_err(|e| ClientError::malformed(action, e.to_string()))?;

        if !status.is_success() {
            error!(
                "❌ API: {} rejected with status {:?} ({:?})",
                action, status.status, status.message
            );
            return Err(ClientError::Rejected {
                status: status.status,
                message: status.message,
            });
        }
        Ok(status)
    }

    async fn read_body(response: reqwest::Response, action: &str) -> Result<String, ClientError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::HttpStatus {
                action: action.to_string(),
                status: status.as_u16(),
            });
        }
        response
            .text()
            .await
            .map_err(|e| ClientError::transport(action, e))
    }
}

/// Parse a collection body; anything other than a JSON array is malformed
pub fn parse_collection<T: DeserializeOwned>(body: &str, action: &str) -> Result<Vec<T>, ClientError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| ClientError::malformed(action, e.to_string()))?;

    if !value.is_array() {
        let kind = match value {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "a boolean",
            serde_json::Value::Number(_) => "a number",
            serde_json::Value::String(_) => "a string",
            serde_json::Value::Object(_) => "an object",
            serde_json::Value::Array(_) => "an array",
        };
        return Err(ClientError::malformed(
            action,
            format!("expected an array, got {}", kind),
        ));
    }

    serde_json::from_value(value).map_err(|e| ClientError::malformed(action, e.to_string()))
}

#[async_trait]
impl SheetsApi for SheetsClient {
    async fn initialize_sheet(&self, sheet: Sheet) -> Result<serde_json::Value, ClientError> {
        let action = format!("initializing {}", sheet);
        let body = self
            .get_text(&[("action", "initialize"), ("sheet", sheet.as_str())], &action)
            .await?;
        let ack: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| ClientError::malformed(&action, e.to_string()))?;
        info!("🌐 API: Sheet {} initialized", sheet);
        Ok(ack)
    }

    async fn fetch_personnel(&self) -> Result<Vec<Personnel>, ClientError> {
        let action = "fetching personnel";
        let body = self.get_text(&Self::read_query(Sheet::Personnel), action).await?;
        let records = parse_collection(&body, action)?;
        info!("🌐 API: Fetched {} personnel records", records.len());
        Ok(records)
    }

    async fn fetch_savings(&self) -> Result<Vec<Saving>, ClientError> {
        let action = "fetching savings";
        let body = self.get_text(&Self::read_query(Sheet::Savings), action).await?;
        let records = parse_collection(&body, action)?;
        info!("🌐 API: Fetched {} savings records", records.len());
        Ok(records)
    }

    async fn create_personnel(&self, record: &Personnel) -> Result<ApiStatusResponse, ClientError> {
        self.post_record(Sheet::Personnel, record, "creating personnel").await
    }

    async fn create_saving(&self, record: &Saving) -> Result<ApiStatusResponse, ClientError> {
        self.post_record(Sheet::Savings, record, "creating saving").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_collection_accepts_arrays() {
        let records: Vec<Saving> = parse_collection(
            r#"[{"no": 1, "person_no": "2", "amount": 300}, {"no": "2"}]"#,
            "fetching savings",
        )
        .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].amount, "300");
        assert_eq!(records[1].amount, "");
    }

    #[test]
    fn test_parse_collection_rejects_non_arrays() {
        let err = parse_collection::<Saving>(r#"{"error": "boom"}"#, "fetching savings").unwrap_err();
        assert!(matches!(err, ClientError::MalformedResponse { .. }));
        assert!(err.to_string().contains("expected an array, got an object"));

        let err = parse_collection::<Saving>("null", "fetching savings").unwrap_err();
        assert!(err.to_string().contains("got null"));

        let err = parse_collection::<Personnel>("<html>", "fetching personnel").unwrap_err();
        assert!(err.is_fetch_failure());
    }

    #[test]
    fn test_read_query() {
        assert!(SheetsClient::read_query(Sheet::Personnel).is_empty());
        assert_eq!(SheetsClient::read_query(Sheet::Savings), vec![("sheet", "savings")]);
    }
}
