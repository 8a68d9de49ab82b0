//! Saved calculations and JSON export.

use crate::error::CalcError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One calculation as handed to a history store or an export
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub calculator: String,
    pub inputs: Value,
    pub results: Value,
}

impl ExportRecord {
    pub fn to_json(&self) -> Result<String, CalcError> {
        serde_json::to_string_pretty(self).map_err(|e| CalcError::invalid("export", e.to_string()))
    }

    pub fn from_json(text: &str) -> Result<Self, CalcError> {
        serde_json::from_str(text).map_err(|e| CalcError::invalid("export", e.to_string()))
    }
}

/// Serializes a calculator's inputs and results into an export record
pub fn prepare_export_data<I, R>(calculator: &str, inputs: &I, results: &R) -> Result<ExportRecord, CalcError>
where
    I: Serialize + ?Sized,
    R: Serialize + ?Sized,
{
    let to_value = |what: &str, val: Result<Value, serde_json::Error>| {
        val.map_err(|e| CalcError::invalid(what, e.to_string()))
    };
    Ok(ExportRecord {
        calculator: calculator.to_string(),
        inputs: to_value("inputs", serde_json::to_value(inputs))?,
        results: to_value("results", serde_json::to_value(results))?,
    })
}

/// Store for saved calculations
pub trait CalculationHistory {
    /// Appends a record and returns its index
    fn push(&mut self, record: ExportRecord) -> usize;

    fn records(&self) -> &[ExportRecord];

    fn clear(&mut self);

    fn save_calculation<I, R>(&mut self, calculator: &str, inputs: &I, results: &R) -> Result<usize, CalcError>
    where
        Self: Sized,
        I: Serialize + ?Sized,
        R: Serialize + ?Sized,
    {
        let record = prepare_export_data(calculator, inputs, results)?;
        Ok(self.push(record))
    }

    fn len(&self) -> usize {
        self.records().len()
    }

    fn is_empty(&self) -> bool {
        self.records().is_empty()
    }

    /// All records as a JSON array
    fn export(&self) -> Result<String, CalcError> {
        serde_json::to_string_pretty(self.records()).map_err(|e| CalcError::invalid("export", e.to_string()))
    }
}

/// In-memory history, oldest records dropped past `capacity`
#[derive(Clone, Debug, Default)]
pub struct MemoryHistory {
    records: Vec<ExportRecord>,
    capacity: Option<usize>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        MemoryHistory {
            records: Vec::with_capacity(capacity),
            capacity: Some(capacity),
        }
    }

    pub fn latest(&self) -> Option<&ExportRecord> {
        self.records.last()
    }

    pub fn by_calculator<'a>(&'a self, calculator: &'a str) -> impl Iterator<Item = &'a ExportRecord> + 'a {
        self.records.iter().filter(move |r| r.calculator == calculator)
    }
}

impl CalculationHistory for MemoryHistory {
    fn push(&mut self, record: ExportRecord) -> usize {
        if let Some(cap) = self.capacity {
            if cap == 0 {
                return 0;
            }
            if self.records.len() == cap {
                self.records.remove(0);
            }
        }
        tracing::trace!(calculator = %record.calculator, "calculation saved");
        self.records.push(record);
        self.records.len() - 1
    }

    fn records(&self) -> &[ExportRecord] {
        &self.records
    }

    fn clear(&mut self) {
        self.records.clear();
    }
}
