//! HTTP sync gateway
//!
//! Talks to the dashboard backend. Writes are whole-set replacements:
//! `POST {pin, data}` to the endpoint for each data set, where the backend
//! deletes the stored set and inserts the payload. Reads are plain GETs
//! returning `{data: ...}`.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::result::{Error, Result};
use crate::domain::{PerformanceRecord, UnpaidInvoice, WeeklySnapshot};
use crate::ports::SyncGateway;

/// Whole-request deadline; past this the backend counts as unreachable
pub const SYNC_TIMEOUT: Duration = Duration::from_secs(15);

const PERFORMANCE_PATH: &str = "/api/sync";
const UNPAID_PATH: &str = "/api/sync-unpaid";
const WEEKLY_PATH: &str = "/api/sync-weekly";

#[derive(Serialize)]
struct WriteBody<'a, T: Serialize> {
    pin: &'a str,
    data: &'a T,
}

#[derive(Deserialize)]
struct ReadBody<T> {
    #[serde(default)]
    data: Option<T>,
}

pub struct HttpSyncGateway {
    client: Client,
    base_url: String,
    pin: String,
}

impl HttpSyncGateway {
    pub fn new(base_url: &str, pin: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(SYNC_TIMEOUT)
            .build()
            .map_err(|e| Error::upstream(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            pin: pin.to_string(),
        })
    }

    async fn put<T: Serialize + Sync>(&self, path: &str, data: &T) -> Result<()> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);
        let response = self
            .client
            .post(&url)
            .json(&WriteBody { pin: &self.pin, data })
            .send()
            .await
            .map_err(map_request_error)?;
        map_status(response.status())
    }

    async fn get<T: DeserializeOwned + Default>(&self, path: &str) -> Result<Option<T>> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(map_request_error)?;
        map_status(response.status())?;
        let body: ReadBody<T> = response
            .json()
            .await
            .map_err(|e| Error::upstream(format!("malformed backend response: {}", e)))?;
        Ok(body.data)
    }
}

#[async_trait]
impl SyncGateway for HttpSyncGateway {
    async fn put_performance_rows(&self, rows: &[PerformanceRecord]) -> Result<()> {
        self.put(PERFORMANCE_PATH, &rows).await
    }

    async fn put_unpaid_invoices(&self, invoices: &[UnpaidInvoice]) -> Result<()> {
        self.put(UNPAID_PATH, &invoices).await
    }

    async fn put_weekly_snapshot(&self, snapshot: &WeeklySnapshot) -> Result<()> {
        self.put(WEEKLY_PATH, snapshot).await
    }

    async fn fetch_performance_rows(&self) -> Result<Vec<PerformanceRecord>> {
        Ok(self.get(PERFORMANCE_PATH).await?.unwrap_or_default())
    }

    async fn fetch_unpaid_invoices(&self) -> Result<Vec<UnpaidInvoice>> {
        Ok(self.get(UNPAID_PATH).await?.unwrap_or_default())
    }

    async fn fetch_weekly_snapshot(&self) -> Result<Option<WeeklySnapshot>> {
        self.get(WEEKLY_PATH).await
    }
}

fn map_request_error(error: reqwest::Error) -> Error {
    if error.is_timeout() {
        Error::upstream("backend request timed out after 15 seconds")
    } else if error.is_connect() {
        Error::upstream("unable to reach the backend")
    } else {
        Error::upstream(format!("backend request failed: {}", error))
    }
}

/// Map a response status onto the error taxonomy: 401 means the PIN was
/// rejected, 400 means the payload was, anything else non-2xx is a
/// backend-side problem worth retrying.
fn map_status(status: StatusCode) -> Result<()> {
    if status.is_success() {
        return Ok(());
    }
    match status {
        StatusCode::UNAUTHORIZED => Err(Error::authorization(
            "backend rejected the PIN; check the editor PIN in settings",
        )),
        StatusCode::BAD_REQUEST => Err(Error::validation("backend rejected the payload")),
        status => Err(Error::upstream(format!("backend error: HTTP {}", status))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(map_status(StatusCode::OK).is_ok());
        assert!(map_status(StatusCode::NO_CONTENT).is_ok());
        assert!(matches!(
            map_status(StatusCode::UNAUTHORIZED),
            Err(Error::Authorization(_))
        ));
        assert!(matches!(
            map_status(StatusCode::BAD_REQUEST),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            map_status(StatusCode::INTERNAL_SERVER_ERROR),
            Err(Error::Upstream(_))
        ));
        assert!(map_status(StatusCode::INTERNAL_SERVER_ERROR)
            .unwrap_err()
            .is_recoverable());
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let gateway = HttpSyncGateway::new("https://dash.example.com/", "0000").unwrap();
        assert_eq!(gateway.base_url, "https://dash.example.com");
    }

    #[test]
    fn test_read_body_tolerates_missing_data_field() {
        let body: ReadBody<Vec<PerformanceRecord>> = serde_json::from_str("{}").unwrap();
        assert!(body.data.is_none());

        let body: ReadBody<Vec<PerformanceRecord>> =
            serde_json::from_str(r#"{"data": null}"#).unwrap();
        assert!(body.data.is_none());

        let body: ReadBody<WeeklySnapshot> = serde_json::from_str(
            r#"{"data": {"weekLabel": "06-09 ~ 06-15", "complete": [], "scheduled": []}}"#,
        )
        .unwrap();
        assert_eq!(body.data.unwrap().week_label, "06-09 ~ 06-15");
    }

    #[test]
    fn test_write_body_shape() {
        let rows = vec![PerformanceRecord {
            month: "2025-06".into(),
            cat1: "B2B".into(),
            cat2: "일반".into(),
            cat3: "통합".into(),
            count: 1,
            rev: 100.0,
            purchase: 0.0,
            labor: 0.0,
            sga: 0.0,
        }];
        let body = serde_json::to_value(WriteBody {
            pin: "1234",
            data: &rows,
        })
        .unwrap();
        assert_eq!(body["pin"], "1234");
        assert_eq!(body["data"][0]["month"], "2025-06");
        assert_eq!(body["data"][0]["rev"], 100.0);
    }
}
