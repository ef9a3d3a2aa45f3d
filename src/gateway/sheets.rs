//! Google Sheets v4 implementation of the gateway.
//!
//! Formulas are written with `valueInputOption=USER_ENTERED` so the service
//! evaluates them instead of storing literal text; reads return whatever the
//! service has evaluated so far, which may be nothing while computation is
//! still in flight.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::GatewayError;

use super::auth::TokenProvider;
use super::{RangeAddress, SpreadsheetGateway};

const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com";

/// Authenticated connection to one spreadsheet document.
pub struct SheetsGateway {
    http: Client,
    base_url: String,
    spreadsheet_id: String,
    auth: TokenProvider,
}

impl SheetsGateway {
    /// Create a gateway for `spreadsheet_id`, authenticating via `auth`.
    #[must_use]
    pub fn new(http: Client, spreadsheet_id: impl Into<String>, auth: TokenProvider) -> Self {
        Self {
            http,
            base_url: DEFAULT_BASE_URL.into(),
            spreadsheet_id: spreadsheet_id.into(),
            auth,
        }
    }

    /// Point the gateway at a different API host.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn values_url(&self, range: &RangeAddress) -> String {
        format!(
            "{base}/v4/spreadsheets/{id}/values/{range}",
            base = self.base_url,
            id = self.spreadsheet_id,
        )
    }

    async fn bearer(&self) -> Result<String, GatewayError> {
        self.auth.access_token().await
    }
}

/// Request body for a values write.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange {
    range: String,
    major_dimension: &'static str,
    values: Vec<Vec<Value>>,
}

/// Response body of a values read. `values` is omitted entirely while the
/// region is empty.
#[derive(Deserialize, Default)]
struct ValueRangeResponse {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(GatewayError::Status { status, body })
}

#[async_trait]
impl SpreadsheetGateway for SheetsGateway {
    async fn write_formulas(
        &self,
        range: &RangeAddress,
        formulas: &[String],
    ) -> Result<(), GatewayError> {
        let token = self.bearer().await?;
        let body = ValueRange {
            range: range.to_string(),
            major_dimension: "ROWS",
            values: formulas
                .iter()
                .map(|formula| vec![Value::String(formula.clone())])
                .collect(),
        };

        debug!(range = %range, rows = formulas.len(), "Writing formulas");

        let response = self
            .http
            .put(self.values_url(range))
            .query(&[("valueInputOption", "USER_ENTERED")])
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }

    async fn read_values(&self, range: &RangeAddress) -> Result<Vec<Vec<Value>>, GatewayError> {
        let token = self.bearer().await?;

        debug!(range = %range, "Reading evaluated values");

        let response = self
            .http
            .get(self.values_url(range))
            .bearer_auth(token)
            .send()
            .await?;

        let body: ValueRangeResponse = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(format!("bad values payload: {e}")))?;

        Ok(body.values)
    }

    async fn clear_values(&self, range: &RangeAddress) -> Result<(), GatewayError> {
        let token = self.bearer().await?;

        debug!(range = %range, "Clearing range");

        let response = self
            .http
            .post(format!("{}:clear", self.values_url(range)))
            .bearer_auth(token)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }
}
