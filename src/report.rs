use crate::error::CalcError;
use serde::Serialize;

/// What a calculator hands to its display: either a full result or a
/// message, never both.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Report<T> {
    Ready(T),
    Failed { message: String },
}

impl<T> Report<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Report::Ready(_))
    }

    pub fn result(&self) -> Option<&T> {
        match self {
            Report::Ready(val) => Some(val),
            Report::Failed { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Report::Ready(_) => None,
            Report::Failed { message } => Some(message),
        }
    }
}

impl<T> From<Result<T, CalcError>> for Report<T> {
    fn from(res: Result<T, CalcError>) -> Self {
        match res {
            Ok(val) => Report::Ready(val),
            Err(err) => {
                tracing::debug!(error = %err, "calculation failed");
                Report::Failed {
                    message: err.to_string(),
                }
            }
        }
    }
}

/// Runs a calculator and wraps its outcome
pub fn run<C, T, F>(config: &C, calc: F) -> Report<T>
where
    F: FnOnce(&C) -> Result<T, CalcError>,
{
    Report::from(calc(config))
}
