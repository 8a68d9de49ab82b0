use serde::Serialize;
use simple_error::SimpleError;
use std::fmt;

/// Port of a two-port matching problem
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Port {
    Source,
    Load,
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Port::Source => write!(f, "source"),
            Port::Load => write!(f, "load"),
        }
    }
}

/// Dimension of a cable table lookup
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum LookupDimension {
    Insulation,
    Armour,
    Arrangement,
    Category,
    Method,
    Conductors,
    Formation,
    Size,
}

impl fmt::Display for LookupDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupDimension::Insulation => write!(f, "insulation"),
            LookupDimension::Armour => write!(f, "armour"),
            LookupDimension::Arrangement => write!(f, "arrangement"),
            LookupDimension::Category => write!(f, "table category"),
            LookupDimension::Method => write!(f, "installation method"),
            LookupDimension::Conductors => write!(f, "conductor count"),
            LookupDimension::Formation => write!(f, "formation"),
            LookupDimension::Size => write!(f, "cable size"),
        }
    }
}

/// A table lookup that found no entry
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LookupMiss {
    pub dimension: LookupDimension,
    pub path: String,
}

impl fmt::Display for LookupMiss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no table entry for {} (path: {})", self.dimension, self.path)
    }
}

/// Error types for all calculators
#[derive(Debug)]
pub enum CalcError {
    InvalidInput { field: String, reason: String },
    Parse(SimpleError),
    NonPositiveResistance { port: Port, value: f64 },
    InsufficientQ { min_q: f64, q: f64 },
    DegenerateElement { position: String },
    NonFinite { what: String },
    NoSolution { reason: String },
    LookupMiss(LookupMiss),
}

impl CalcError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CalcError::InvalidInput { field, reason } => {
                write!(f, "Invalid input for {}: {}", field, reason)
            }
            CalcError::Parse(err) => write!(f, "Could not parse input: {}", err),
            CalcError::NonPositiveResistance { port, value } => write!(
                f,
                "The {} resistance must be greater than zero (got {} Ω)",
                port, value
            ),
            CalcError::InsufficientQ { min_q, q } => write!(
                f,
                "Q must be at least {:.3} for these impedances (got {:.3})",
                min_q, q
            ),
            CalcError::DegenerateElement { position } => write!(
                f,
                "The {} element would need an infinite value (zero denominator)",
                position
            ),
            CalcError::NonFinite { what } => {
                write!(f, "Calculation produced a non-finite {}", what)
            }
            CalcError::NoSolution { reason } => write!(f, "No valid solution: {}", reason),
            CalcError::LookupMiss(miss) => write!(f, "Lookup failed: {}", miss),
        }
    }
}

impl std::error::Error for CalcError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CalcError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SimpleError> for CalcError {
    fn from(err: SimpleError) -> Self {
        CalcError::Parse(err)
    }
}

impl From<LookupMiss> for CalcError {
    fn from(miss: LookupMiss) -> Self {
        CalcError::LookupMiss(miss)
    }
}

/// Checks that a field holds a finite number
pub fn require_finite(field: &str, val: f64) -> Result<f64, CalcError> {
    if val.is_finite() {
        Ok(val)
    } else {
        Err(CalcError::invalid(field, "must be a finite number"))
    }
}

/// Checks that a field holds a finite number greater than zero
pub fn require_positive(field: &str, val: f64) -> Result<f64, CalcError> {
    require_finite(field, val)?;
    if val > 0.0 {
        Ok(val)
    } else {
        Err(CalcError::invalid(field, "must be greater than zero"))
    }
}
