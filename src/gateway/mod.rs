//! Spreadsheet service boundary.
//!
//! The orchestration core only needs three capabilities from the remote
//! sheet: write a column of formulas, read the evaluated values back, and
//! clear the region. [`SpreadsheetGateway`] is that seam; [`sheets`] holds
//! the Google Sheets implementation and [`auth`] the service-account token
//! exchange it authenticates with.

pub mod auth;
pub mod sheets;

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::GatewayError;
use crate::pool::Column;

/// A1-notation address of one write region.
///
/// Rendered as `<sheet>!<Col>1:<Col><row_count>`. The row count always
/// covers the full batch that triggered the write, matching the region
/// sizing the remote service expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeAddress {
    sheet: String,
    column: Column,
    row_count: usize,
}

impl RangeAddress {
    #[must_use]
    pub fn new(sheet: impl Into<String>, column: Column, row_count: usize) -> Self {
        Self {
            sheet: sheet.into(),
            column,
            row_count,
        }
    }

    #[must_use]
    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    #[must_use]
    pub fn column(&self) -> Column {
        self.column
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_count
    }
}

impl fmt::Display for RangeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{sheet}!{col}1:{col}{rows}",
            sheet = self.sheet,
            col = self.column,
            rows = self.row_count
        )
    }
}

/// The three remote capabilities the core consumes.
///
/// Implementations must insert formulas in an evaluating mode (the service
/// computes them rather than storing literal text), and may legitimately
/// return an empty result from [`read_values`](Self::read_values) while the
/// service is still computing.
#[async_trait]
pub trait SpreadsheetGateway: Send + Sync {
    /// Upsert one formula per row into the region, starting at row 1.
    async fn write_formulas(
        &self,
        range: &RangeAddress,
        formulas: &[String],
    ) -> Result<(), GatewayError>;

    /// Read the evaluated cell values of the region, as rows of cells.
    ///
    /// An empty result means "not ready yet", not "no data".
    async fn read_values(&self, range: &RangeAddress) -> Result<Vec<Vec<Value>>, GatewayError>;

    /// Remove all cell contents (formulas and values) from the region.
    async fn clear_values(&self, range: &RangeAddress) -> Result<(), GatewayError>;
}
