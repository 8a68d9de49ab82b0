use crate::cable::Insulation;
use crate::error::{require_finite, CalcError};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Ambient temperature correction, (ambient °C, Ca), 30 °C reference
const CA_PVC: [(f64, f64); 11] = [
    (10.0, 1.22),
    (15.0, 1.17),
    (20.0, 1.12),
    (25.0, 1.06),
    (30.0, 1.00),
    (35.0, 0.94),
    (40.0, 0.87),
    (45.0, 0.79),
    (50.0, 0.71),
    (55.0, 0.61),
    (60.0, 0.50),
];

const CA_XLPE: [(f64, f64); 15] = [
    (10.0, 1.15),
    (15.0, 1.12),
    (20.0, 1.08),
    (25.0, 1.04),
    (30.0, 1.00),
    (35.0, 0.96),
    (40.0, 0.91),
    (45.0, 0.87),
    (50.0, 0.82),
    (55.0, 0.76),
    (60.0, 0.71),
    (65.0, 0.65),
    (70.0, 0.58),
    (75.0, 0.50),
    (80.0, 0.41),
];

/// Grouping correction, (circuits, Cg)
const CG_BUNCHED: [(u32, f64); 12] = [
    (1, 1.00),
    (2, 0.80),
    (3, 0.70),
    (4, 0.65),
    (5, 0.60),
    (6, 0.57),
    (7, 0.54),
    (8, 0.52),
    (9, 0.50),
    (12, 0.45),
    (16, 0.41),
    (20, 0.38),
];

const CG_SINGLE_LAYER: [(u32, f64); 9] = [
    (1, 1.00),
    (2, 0.85),
    (3, 0.79),
    (4, 0.75),
    (5, 0.73),
    (6, 0.72),
    (7, 0.72),
    (8, 0.71),
    (9, 0.70),
];

/// How grouped circuits are laid
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grouping {
    /// Bunched in air, on a surface, embedded or enclosed
    #[default]
    Bunched,
    /// Single layer clipped to a wall or floor
    SingleLayer,
}

impl Grouping {
    pub fn to_str(&self) -> &str {
        match self {
            Grouping::Bunched => "bunched",
            Grouping::SingleLayer => "single_layer",
        }
    }
}

impl FromStr for Grouping {
    type Err = Box<dyn std::error::Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bunched" | "Bunched" => Ok(Grouping::Bunched),
            "single_layer" | "single-layer" | "SingleLayer" => Ok(Grouping::SingleLayer),
            _ => Err("Grouping not recognized".to_string().into()),
        }
    }
}

impl fmt::Display for Grouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// Ambient temperature factor Ca.
///
/// Uses the first tabulated temperature at or above `ambient`; below the
/// table the 10 °C value applies.
pub fn temperature_factor(insulation: Insulation, ambient: f64) -> Result<f64, CalcError> {
    require_finite("ambient temperature", ambient)?;
    let table: &[(f64, f64)] = match insulation {
        Insulation::Pvc => &CA_PVC,
        Insulation::Xlpe => &CA_XLPE,
    };
    match table.iter().find(|(temp, _)| *temp >= ambient) {
        Some((_, ca)) => Ok(*ca),
        None => Err(CalcError::invalid(
            "ambient temperature",
            format!(
                "{} °C is above the {} °C limit for {} insulation",
                ambient,
                table[table.len() - 1].0,
                insulation.to_str()
            ),
        )),
    }
}

/// Grouping factor Cg for `circuits` circuits.
///
/// Uses the first tabulated count at or above `circuits`; larger groups
/// take the last entry.
pub fn grouping_factor(grouping: Grouping, circuits: u32) -> Result<f64, CalcError> {
    if circuits == 0 {
        return Err(CalcError::invalid("circuits", "must be at least one"));
    }
    let table: &[(u32, f64)] = match grouping {
        Grouping::Bunched => &CG_BUNCHED,
        Grouping::SingleLayer => &CG_SINGLE_LAYER,
    };
    let cg = table
        .iter()
        .find(|(count, _)| *count >= circuits)
        .unwrap_or(&table[table.len() - 1])
        .1;

    Ok(cg)
}

/// Thermal insulation factor Ci, 0 < Ci ≤ 1
pub fn insulation_factor(ci: f64) -> Result<f64, CalcError> {
    require_finite("thermal insulation factor", ci)?;
    if ci <= 0.0 || ci > 1.0 {
        return Err(CalcError::invalid(
            "thermal insulation factor",
            "must be greater than 0 and at most 1",
        ));
    }
    Ok(ci)
}
