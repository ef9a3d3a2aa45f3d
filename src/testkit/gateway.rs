//! Scripted in-memory spreadsheet gateway.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::StatusCode;
use serde_json::Value;

use crate::error::GatewayError;
use crate::gateway::{RangeAddress, SpreadsheetGateway};

/// One scripted outcome for a read call.
#[derive(Debug, Clone)]
pub enum ReadScript {
    /// Return these evaluated rows.
    Rows(Vec<Vec<Value>>),
    /// The service has not evaluated anything yet.
    Empty,
    /// The read itself fails.
    Fail,
}

/// Every gateway interaction, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    Write {
        range: String,
        formulas: Vec<String>,
    },
    Read {
        range: String,
    },
    Clear {
        range: String,
    },
}

/// [`SpreadsheetGateway`] fake driven by a queue of scripted read outcomes.
///
/// Reads consume the queue front to back; once the queue runs dry every
/// further read reports an empty (not-yet-evaluated) region. Writes and
/// clears succeed unless failure is armed. All calls are recorded for
/// assertions.
#[derive(Default)]
pub struct ScriptedGateway {
    reads: Mutex<VecDeque<ReadScript>>,
    fail_writes: AtomicBool,
    fail_clears: AtomicBool,
    calls: Mutex<Vec<GatewayCall>>,
}

impl ScriptedGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one read outcome to the script.
    pub fn script_read(&self, script: ReadScript) -> &Self {
        self.reads.lock().push_back(script);
        self
    }

    /// Script a read returning one single-cell row per string.
    pub fn script_read_cells(&self, cells: &[&str]) -> &Self {
        let rows = cells
            .iter()
            .map(|cell| vec![Value::String((*cell).to_owned())])
            .collect();
        self.script_read(ReadScript::Rows(rows))
    }

    /// Make every subsequent write fail.
    pub fn fail_writes(&self) -> &Self {
        self.fail_writes.store(true, Ordering::SeqCst);
        self
    }

    /// Make every subsequent clear fail.
    pub fn fail_clears(&self) -> &Self {
        self.fail_clears.store(true, Ordering::SeqCst);
        self
    }

    /// Snapshot of all recorded calls.
    #[must_use]
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().clone()
    }

    #[must_use]
    pub fn write_count(&self) -> usize {
        self.count(|call| matches!(call, GatewayCall::Write { .. }))
    }

    #[must_use]
    pub fn read_count(&self) -> usize {
        self.count(|call| matches!(call, GatewayCall::Read { .. }))
    }

    #[must_use]
    pub fn clear_count(&self) -> usize {
        self.count(|call| matches!(call, GatewayCall::Clear { .. }))
    }

    fn count(&self, pred: impl Fn(&GatewayCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|call| pred(call)).count()
    }

    fn record(&self, call: GatewayCall) {
        self.calls.lock().push(call);
    }

    fn scripted_failure(kind: &str) -> GatewayError {
        GatewayError::Status {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: format!("scripted {kind} failure"),
        }
    }
}

#[async_trait]
impl SpreadsheetGateway for ScriptedGateway {
    async fn write_formulas(
        &self,
        range: &RangeAddress,
        formulas: &[String],
    ) -> Result<(), GatewayError> {
        self.record(GatewayCall::Write {
            range: range.to_string(),
            formulas: formulas.to_vec(),
        });

        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::scripted_failure("write"));
        }
        Ok(())
    }

    async fn read_values(&self, range: &RangeAddress) -> Result<Vec<Vec<Value>>, GatewayError> {
        self.record(GatewayCall::Read {
            range: range.to_string(),
        });

        match self.reads.lock().pop_front() {
            Some(ReadScript::Rows(rows)) => Ok(rows),
            Some(ReadScript::Empty) | None => Ok(Vec::new()),
            Some(ReadScript::Fail) => Err(Self::scripted_failure("read")),
        }
    }

    async fn clear_values(&self, range: &RangeAddress) -> Result<(), GatewayError> {
        self.record(GatewayCall::Clear {
            range: range.to_string(),
        });

        if self.fail_clears.load(Ordering::SeqCst) {
            return Err(Self::scripted_failure("clear"));
        }
        Ok(())
    }
}
